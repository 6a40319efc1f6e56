use std::fs;
use std::path::PathBuf;

use sb60_terminal::play::Grade;
use sb60_terminal::supabase_fetch::parse_play_rows;
use sb60_terminal::transform::transform_rows;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_supabase_rows_fixture() {
    let raw = read_fixture("supabase_rows.json");
    let plays = parse_play_rows(&raw).expect("fixture should parse");
    assert_eq!(plays.len(), 3);

    assert_eq!(plays[0].quarter, 1);
    assert_eq!(plays[0].yards_to_go, 8);
    assert_eq!(plays[0].field_position, "SEA 44");
    assert_eq!(plays[0].score_differential, -3);
    assert_eq!(plays[0].win_prob_pct, Some(38.0));
    assert!(plays[0].punt_attempt);
}

#[test]
fn text_scores_coerce_to_zero() {
    let raw = read_fixture("supabase_rows.json");
    let plays = parse_play_rows(&raw).expect("fixture should parse");

    // "n/a" offense score coerces to 0, so the differential still computes.
    assert_eq!(plays[1].offense_score, 0);
    assert_eq!(plays[1].score_differential, -12);
    assert_eq!(plays[1].grade, Grade::Terrible);
}

#[test]
fn missing_side_of_field_never_renders_nan() {
    let raw = read_fixture("supabase_rows.json");
    let plays = parse_play_rows(&raw).expect("fixture should parse");

    assert_eq!(plays[1].field_position, "41");
    assert!(!plays[1].field_position.contains("nan"));
    assert!(!plays[1].field_position.contains("null"));
}

#[test]
fn unparseable_percentages_become_missing() {
    let raw = read_fixture("supabase_rows.json");
    let plays = parse_play_rows(&raw).expect("fixture should parse");

    assert_eq!(plays[2].win_prob_pct, None);
    assert_eq!(plays[2].wpa_pct, None);
    assert!(!plays[2].punt_attempt);
    assert_eq!(plays[2].grade, Grade::Ok);
}

#[test]
fn punt_flag_matches_play_type() {
    let raw = read_fixture("supabase_rows.json");
    let plays = parse_play_rows(&raw).expect("fixture should parse");
    for play in &plays {
        assert_eq!(play.punt_attempt, play.play_type == "punt");
    }
}

#[test]
fn row_count_is_preserved() {
    let raw = read_fixture("supabase_rows.json");
    let rows: Vec<serde_json::Value> = serde_json::from_str(&raw).expect("fixture json");
    assert_eq!(transform_rows(&rows).len(), rows.len());
}

#[test]
fn transform_is_idempotent() {
    let raw = read_fixture("supabase_rows.json");
    let rows: Vec<serde_json::Value> = serde_json::from_str(&raw).expect("fixture json");
    assert_eq!(transform_rows(&rows), transform_rows(&rows));
}

#[test]
fn null_and_empty_bodies_parse_to_no_rows() {
    assert!(parse_play_rows("null").expect("null should parse").is_empty());
    assert!(parse_play_rows("  ").expect("blank should parse").is_empty());
    assert!(parse_play_rows("[]").expect("empty list should parse").is_empty());
}

#[test]
fn malformed_body_is_an_error() {
    assert!(parse_play_rows("{not json").is_err());
}
