use serde_json::Value;

use crate::play::{grade_play, Grade, PlayRecord, PUNT_PLAY_TYPE};

/// Maps raw play-by-play rows into graded records. Total: every input row
/// produces exactly one output row, and unparseable fields degrade to
/// defaults instead of failing.
pub fn transform_rows(rows: &[Value]) -> Vec<PlayRecord> {
    rows.iter().map(transform_row).collect()
}

fn transform_row(row: &Value) -> PlayRecord {
    let offense_score = coerce_i64(row.get("posteam_score")).unwrap_or(0);
    let defense_score = coerce_i64(row.get("defteam_score")).unwrap_or(0);
    let play_type = coerce_string(row.get("play_type"));
    let side = coerce_string(row.get("side_of_field"));
    let yardline = coerce_string(row.get("yardline_100"));

    let mut record = PlayRecord {
        play_id: coerce_i64(row.get("play_id")).unwrap_or(0),
        quarter: coerce_i64(row.get("qtr")).unwrap_or(0).clamp(0, u8::MAX as i64) as u8,
        clock: String::new(),
        yards_to_go: coerce_i64(row.get("ydstogo")).unwrap_or(0).max(0) as u32,
        offense_score,
        defense_score,
        score_differential: (offense_score - defense_score) as i32,
        win_prob_pct: coerce_f64(row.get("wp")).map(|v| v * 100.0),
        wpa_pct: coerce_f64(row.get("wpa")).map(|v| v * 100.0),
        epa: coerce_f64(row.get("epa")),
        punt_attempt: play_type == PUNT_PLAY_TYPE,
        play_type,
        description: coerce_string(row.get("desc")),
        field_position: join_field_position(&side, &yardline),
        grade: Grade::Ok,
    };
    record.grade = grade_play(&record);
    record
}

// The hosted table stores numbers as TEXT, so every numeric column may arrive
// as a JSON string.
fn coerce_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn coerce_string(value: Option<&Value>) -> String {
    let raw = match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    // Missing parts must render empty, not as a placeholder word.
    if raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("null") {
        String::new()
    } else {
        raw
    }
}

fn join_field_position(side: &str, yardline: &str) -> String {
    match (side.is_empty(), yardline.is_empty()) {
        (true, true) => String::new(),
        (true, false) => yardline.to_string(),
        (false, true) => side.to_string(),
        (false, false) => format!("{side} {yardline}"),
    }
}
