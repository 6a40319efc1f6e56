use crate::play::{Grade, PlayRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    pub punts: usize,
    pub flagged: usize,
    pub total_wpa: f64,
    pub total_epa: f64,
}

/// Headline numbers for the metrics strip. WPA/EPA sums cover punt attempts
/// only and skip missing values.
pub fn summary_metrics(plays: &[PlayRecord]) -> SummaryMetrics {
    let punts = plays.iter().filter(|p| p.punt_attempt).count();
    let flagged = plays.iter().filter(|p| p.grade.is_flagged()).count();
    let total_wpa = plays
        .iter()
        .filter(|p| p.punt_attempt)
        .filter_map(|p| p.wpa_pct)
        .sum();
    let total_epa = plays
        .iter()
        .filter(|p| p.punt_attempt)
        .filter_map(|p| p.epa)
        .sum();

    SummaryMetrics {
        punts,
        flagged,
        total_wpa,
        total_epa,
    }
}

/// The play with the shortest distance to gain; earliest in play order on a
/// tie.
pub fn key_play(plays: &[PlayRecord]) -> Option<&PlayRecord> {
    let min_ytg = plays.iter().map(|p| p.yards_to_go).min()?;
    plays.iter().find(|p| p.yards_to_go == min_ytg)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GradeTally {
    pub red: usize,
    pub yellow: usize,
    pub green: usize,
}

pub fn grade_tally(plays: &[PlayRecord]) -> GradeTally {
    let mut tally = GradeTally::default();
    for play in plays {
        match play.grade {
            Grade::Terrible | Grade::Bad => tally.red += 1,
            Grade::Questionable => tally.yellow += 1,
            Grade::Ok => tally.green += 1,
        }
    }
    tally
}

/// Win probability by play sequence for the bar chart; missing values chart
/// as zero.
pub fn win_prob_series(plays: &[PlayRecord]) -> Vec<(String, u64)> {
    plays
        .iter()
        .enumerate()
        .map(|(idx, play)| {
            let wp = play.win_prob_pct.unwrap_or(0.0).clamp(0.0, 100.0);
            (format!("{}", idx + 1), wp.round() as u64)
        })
        .collect()
}
