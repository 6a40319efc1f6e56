pub const PUNT_PLAY_TYPE: &str = "punt";

// Grading thresholds. These are the analyst's heuristics, kept in one place
// so they can be tuned without touching the rule order.
pub const TERRIBLE_YTG_MAX: u32 = 1;
pub const TERRIBLE_DIFF_MAX: i32 = -10;
pub const BAD_YTG_MAX: u32 = 2;
pub const BAD_DIFF_MAX: i32 = -7;
pub const QUESTIONABLE_YTG_MAX: u32 = 4;
pub const QUESTIONABLE_DIFF_MAX: i32 = -9;
pub const QUESTIONABLE_WPA_MAX: f64 = -3.0;

/// One 4th-down play for the team of interest, with derived columns filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayRecord {
    pub play_id: i64,
    pub quarter: u8,
    // Game clock at the snap ("10:23"). Empty when the source does not carry it.
    pub clock: String,
    pub yards_to_go: u32,
    pub offense_score: i64,
    pub defense_score: i64,
    pub score_differential: i32,
    // Percentages are stored x100 from the fractional source form; None when
    // the source value did not parse.
    pub win_prob_pct: Option<f64>,
    pub wpa_pct: Option<f64>,
    pub epa: Option<f64>,
    pub play_type: String,
    pub description: String,
    pub field_position: String,
    pub punt_attempt: bool,
    pub grade: Grade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Terrible,
    Bad,
    Questionable,
    Ok,
}

impl Grade {
    pub fn label(self) -> &'static str {
        match self {
            Grade::Terrible => "TERRIBLE",
            Grade::Bad => "BAD",
            Grade::Questionable => "QUESTIONABLE",
            Grade::Ok => "OK",
        }
    }

    pub fn is_flagged(self) -> bool {
        self != Grade::Ok
    }
}

/// Grades a punt decision. Rules are checked in strict priority order and the
/// first match wins; non-punt plays always grade OK. A missing WPA never
/// satisfies the WPA rule.
pub fn grade_play(play: &PlayRecord) -> Grade {
    if !play.punt_attempt {
        return Grade::Ok;
    }
    if play.yards_to_go <= TERRIBLE_YTG_MAX && play.score_differential <= TERRIBLE_DIFF_MAX {
        return Grade::Terrible;
    }
    if play.yards_to_go <= BAD_YTG_MAX && play.score_differential <= BAD_DIFF_MAX {
        return Grade::Bad;
    }
    if play.yards_to_go <= QUESTIONABLE_YTG_MAX && play.score_differential <= QUESTIONABLE_DIFF_MAX
    {
        return Grade::Questionable;
    }
    if play
        .wpa_pct
        .is_some_and(|wpa| wpa < QUESTIONABLE_WPA_MAX)
    {
        return Grade::Questionable;
    }
    Grade::Ok
}
