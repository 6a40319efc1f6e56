use crate::play::{grade_play, Grade, PlayRecord, PUNT_PLAY_TYPE};

/// Built-in dataset used whenever the hosted source is unreachable, rejects
/// the credentials, or returns no rows. Eight Patriots punts from Super Bowl
/// LX, so the dashboard always has something to render.
pub fn fallback_plays() -> Vec<PlayRecord> {
    vec![
        punt(1, 1, "10:23", 8, "SEA 44", 0, 3, 38.0, -3.0, -0.5, "Punt to SEA 20"),
        punt(2, 1, "5:45", 15, "NE 35", 0, 3, 35.0, -2.0, -0.3, "Punt downed at SEA 15"),
        punt(3, 2, "9:30", 17, "NE 28", 0, 6, 25.0, -3.0, -0.4, "Punt to SEA 25"),
        punt(
            4,
            2,
            "2:15",
            6,
            "SEA 38",
            0,
            6,
            22.0,
            -2.5,
            -0.6,
            "Punt into end zone, touchback",
        ),
        punt(
            5,
            3,
            "8:40",
            1,
            "OWN 41",
            0,
            12,
            12.0,
            -4.2,
            -0.8,
            "4th & 1 PUNT from own 41 - THE KEY PLAY",
        ),
        punt(6, 3, "2:30", 8, "NE 23", 0, 12, 8.0, -2.0, -0.3, "Punt to SEA 45"),
        punt(7, 4, "12:05", 11, "NE 19", 6, 19, 5.0, -1.5, -0.2, "Punt to SEA 35"),
        punt(
            8,
            4,
            "5:20",
            4,
            "SEA 48",
            13,
            22,
            6.0,
            -3.0,
            -0.7,
            "Punt with 5 min left, down 9",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn punt(
    play_id: i64,
    quarter: u8,
    clock: &str,
    yards_to_go: u32,
    field_position: &str,
    offense_score: i64,
    defense_score: i64,
    win_prob_pct: f64,
    wpa_pct: f64,
    epa: f64,
    description: &str,
) -> PlayRecord {
    let mut record = PlayRecord {
        play_id,
        quarter,
        clock: clock.to_string(),
        yards_to_go,
        offense_score,
        defense_score,
        score_differential: (offense_score - defense_score) as i32,
        win_prob_pct: Some(win_prob_pct),
        wpa_pct: Some(wpa_pct),
        epa: Some(epa),
        play_type: PUNT_PLAY_TYPE.to_string(),
        description: description.to_string(),
        field_position: field_position.to_string(),
        punt_attempt: true,
        grade: Grade::Ok,
    };
    record.grade = grade_play(&record);
    record
}
