use std::env;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::chat_gateway::{self, ChatSession};
use crate::completion::{CompletionClient, GroqClient};
use crate::state::{Delta, ProviderCommand, SourceStatus};
use crate::supabase_fetch::{self, FetchOutcome, SupabaseConfig};

// Fetched plays are reused for this window; `r` forces a refetch.
const PLAYS_CACHE_SECS: u64 = 600;

/// Worker thread owning the session context: the data-source config, the
/// cached dataset, and the conversation state. The UI thread never blocks on
/// the network.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let cfg = SupabaseConfig::from_env();
        let groq = GroqClient::from_env();
        let cache_window = Duration::from_secs(
            env::var("PLAYS_CACHE_SECS")
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(PLAYS_CACHE_SECS)
                .max(30),
        );

        let mut session = ChatSession::new();
        let mut outcome = refresh_plays(cfg.as_ref(), &tx);
        let mut fetched_at = Instant::now();

        if groq.is_none() {
            let _ = tx.send(Delta::Log(
                "[INFO] GROQ_API_KEY not set; chat will answer with a notice".to_string(),
            ));
        }

        for cmd in cmd_rx.iter() {
            match cmd {
                ProviderCommand::RefreshPlays { force } => {
                    if !force && fetched_at.elapsed() < cache_window {
                        continue;
                    }
                    outcome = refresh_plays(cfg.as_ref(), &tx);
                    fetched_at = Instant::now();
                }
                ProviderCommand::Ask(question) => {
                    let client = groq.as_ref().map(|c| c as &dyn CompletionClient);
                    let reply =
                        chat_gateway::answer(&question, outcome.plays(), &mut session, client);
                    let _ = tx.send(Delta::ChatExchange {
                        question,
                        answer: reply,
                        questions_left: session.questions_left(),
                    });
                }
            }
        }
    });
}

fn refresh_plays(cfg: Option<&SupabaseConfig>, tx: &Sender<Delta>) -> FetchOutcome {
    let outcome = supabase_fetch::fetch_fourth_downs(cfg);
    let source = match &outcome {
        FetchOutcome::Live(plays) => {
            let _ = tx.send(Delta::Log(format!(
                "[INFO] Loaded {} plays from Supabase",
                plays.len()
            )));
            SourceStatus::Connected
        }
        FetchOutcome::Fallback { reason, .. } => {
            let _ = tx.send(Delta::Log(format!(
                "[WARN] Using fallback data: {reason}"
            )));
            SourceStatus::Fallback {
                reason: reason.clone(),
            }
        }
    };
    let _ = tx.send(Delta::SetPlays {
        plays: outcome.plays().to_vec(),
        source,
    });
    outcome
}
