use std::env;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::fallback::fallback_plays;
use crate::http_client::http_client;
use crate::play::PlayRecord;
use crate::transform::transform_rows;

pub const DEFAULT_GAME_ID: &str = "2025_22_SEA_NE";
pub const DEFAULT_POSTEAM: &str = "NE";
pub const FOURTH_DOWN: u8 = 4;

const PLAY_TABLE: &str = "play_by_play_2025";
const SELECT_COLUMNS: &str = "play_id,qtr,down,ydstogo,posteam,defteam,posteam_score,\
                              defteam_score,wp,wpa,epa,play_type,desc,side_of_field,yardline_100";

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
    pub game_id: String,
    pub posteam: String,
}

impl SupabaseConfig {
    /// Reads the connection from the environment. Returns None when either
    /// credential is absent, which callers treat as "run on fallback data".
    pub fn from_env() -> Option<Self> {
        let url = non_empty_env("SUPABASE_URL")?;
        let key = non_empty_env("SUPABASE_KEY")?;
        Some(Self {
            url,
            key,
            game_id: non_empty_env("GAME_ID").unwrap_or_else(|| DEFAULT_GAME_ID.to_string()),
            posteam: non_empty_env("POSTEAM").unwrap_or_else(|| DEFAULT_POSTEAM.to_string()),
        })
    }
}

/// Outcome of one fetch cycle. The pipeline never sees an error or an empty
/// dataset: every failure path carries the fallback plays plus the reason.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Live(Vec<PlayRecord>),
    Fallback { plays: Vec<PlayRecord>, reason: String },
}

impl FetchOutcome {
    pub fn plays(&self) -> &[PlayRecord] {
        match self {
            FetchOutcome::Live(plays) => plays,
            FetchOutcome::Fallback { plays, .. } => plays,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FetchOutcome::Fallback { .. })
    }
}

/// Single-attempt fetch of the team's 4th-down plays. No retries; any
/// connectivity, credential, or empty-result failure substitutes the
/// fallback dataset.
pub fn fetch_fourth_downs(cfg: Option<&SupabaseConfig>) -> FetchOutcome {
    let Some(cfg) = cfg else {
        return FetchOutcome::Fallback {
            plays: fallback_plays(),
            reason: "Supabase credentials not configured".to_string(),
        };
    };

    match request_rows(cfg) {
        Ok(plays) if !plays.is_empty() => FetchOutcome::Live(plays),
        Ok(_) => FetchOutcome::Fallback {
            plays: fallback_plays(),
            reason: "query returned no rows".to_string(),
        },
        Err(err) => FetchOutcome::Fallback {
            plays: fallback_plays(),
            reason: format!("{err:#}"),
        },
    }
}

fn request_rows(cfg: &SupabaseConfig) -> Result<Vec<PlayRecord>> {
    let client = http_client()?;
    let url = format!("{}/rest/v1/{PLAY_TABLE}", cfg.url.trim_end_matches('/'));
    let query = [
        ("select", SELECT_COLUMNS.to_string()),
        ("game_id", format!("eq.{}", cfg.game_id)),
        ("down", format!("eq.{FOURTH_DOWN}")),
        ("posteam", format!("eq.{}", cfg.posteam)),
        ("order", "play_id".to_string()),
    ];

    let resp = client
        .get(&url)
        .query(&query)
        .header("apikey", &cfg.key)
        .bearer_auth(&cfg.key)
        .send()
        .context("request failed")?;

    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {}: {}", status, body));
    }
    parse_play_rows(&body)
}

/// Parses a PostgREST response body into graded play records. Empty and null
/// bodies parse to an empty set rather than an error.
pub fn parse_play_rows(raw: &str) -> Result<Vec<PlayRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let rows: Vec<Value> = serde_json::from_str(trimmed).context("invalid play rows json")?;
    Ok(transform_rows(&rows))
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
