use sb60_terminal::analysis::{grade_tally, key_play, summary_metrics, win_prob_series};
use sb60_terminal::fallback::fallback_plays;
use sb60_terminal::play::{grade_play, Grade};
use sb60_terminal::supabase_fetch::{fetch_fourth_downs, FetchOutcome};

#[test]
fn fallback_shape_matches_the_game() {
    let plays = fallback_plays();
    assert_eq!(plays.len(), 8);

    let lead = &plays[0];
    assert_eq!(lead.quarter, 1);
    assert_eq!(lead.yards_to_go, 8);
    assert_eq!(lead.field_position, "SEA 44");
    assert!(plays.iter().all(|p| p.punt_attempt));
}

#[test]
fn missing_config_substitutes_the_fallback() {
    // No credentials means no network attempt and the fixed dataset back.
    let outcome = fetch_fourth_downs(None);
    assert!(outcome.is_fallback());
    assert_eq!(outcome.plays(), fallback_plays().as_slice());
    match outcome {
        FetchOutcome::Fallback { reason, .. } => {
            assert!(reason.contains("not configured"));
        }
        FetchOutcome::Live(_) => unreachable!(),
    }
}

#[test]
fn key_play_is_the_q3_short_yardage_punt() {
    let plays = fallback_plays();
    let key = key_play(&plays).expect("fallback is never empty");

    assert_eq!(key.quarter, 3);
    assert_eq!(key.yards_to_go, 1);
    assert_eq!(key.score_differential, -12);
    assert!(key.description.contains("4th & 1 PUNT from own 41"));
    assert_eq!(key.grade, Grade::Terrible);
}

#[test]
fn fallback_grades_are_stable_under_regrading() {
    let plays = fallback_plays();
    for play in &plays {
        assert_eq!(play.grade, grade_play(play));
    }
}

#[test]
fn summary_metrics_over_fallback() {
    let metrics = summary_metrics(&fallback_plays());
    assert_eq!(metrics.punts, 8);
    assert_eq!(metrics.flagged, 2);
    assert!((metrics.total_wpa - -21.2).abs() < 1e-9);
    assert!((metrics.total_epa - -3.8).abs() < 1e-9);
}

#[test]
fn grade_tally_over_fallback() {
    let tally = grade_tally(&fallback_plays());
    assert_eq!(tally.red, 1);
    assert_eq!(tally.yellow, 1);
    assert_eq!(tally.green, 6);
}

#[test]
fn win_prob_series_is_sequenced() {
    let series = win_prob_series(&fallback_plays());
    assert_eq!(series.len(), 8);
    assert_eq!(series[0], ("1".to_string(), 38));
    assert_eq!(series[4], ("5".to_string(), 12));
}
