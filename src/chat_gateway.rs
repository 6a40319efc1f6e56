use crate::completion::CompletionClient;
use crate::play::PlayRecord;

pub const QUESTION_LIMIT: u32 = 10;
pub const LIMIT_MESSAGE: &str =
    "You've reached the limit of 10 questions per session. Restart to start a new session.";
pub const NOT_CONFIGURED_MESSAGE: &str =
    "Groq API key not configured. Set GROQ_API_KEY in your environment or .env file.";

const MAX_ANSWER_TOKENS: u32 = 500;
const ERROR_PREVIEW_CHARS: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

/// Conversation state for one run of the program: the ordered transcript plus
/// the question counter the quota is enforced against.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    pub messages: Vec<ChatMessage>,
    pub question_count: u32,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn questions_left(&self) -> u32 {
        QUESTION_LIMIT.saturating_sub(self.question_count)
    }
}

/// Answers one question against the current dataset. The quota is checked
/// before the counter moves: at the limit the fixed message comes back with
/// no increment and no dispatch. Otherwise the counter increments, the call
/// goes out once, and any dispatch failure becomes a short error string. The
/// question and the returned answer are appended to the transcript in order.
pub fn answer(
    question: &str,
    plays: &[PlayRecord],
    session: &mut ChatSession,
    client: Option<&dyn CompletionClient>,
) -> String {
    if session.question_count >= QUESTION_LIMIT {
        let reply = LIMIT_MESSAGE.to_string();
        push_exchange(session, question, &reply);
        return reply;
    }
    session.question_count += 1;

    let Some(client) = client else {
        let reply = NOT_CONFIGURED_MESSAGE.to_string();
        push_exchange(session, question, &reply);
        return reply;
    };

    let system = build_system_prompt(plays);
    let reply = match client.complete(&system, question, MAX_ANSWER_TOKENS) {
        Ok(text) => text,
        Err(err) => format!("Error: {}", error_preview(&err)),
    };
    push_exchange(session, question, &reply);
    reply
}

fn push_exchange(session: &mut ChatSession, question: &str, reply: &str) {
    session.messages.push(ChatMessage {
        role: Role::User,
        text: question.to_string(),
    });
    session.messages.push(ChatMessage {
        role: Role::Assistant,
        text: reply.to_string(),
    });
}

fn error_preview(err: &anyhow::Error) -> String {
    format!("{err:#}").chars().take(ERROR_PREVIEW_CHARS).collect()
}

/// System instruction carrying the full dataset and the fixed domain facts.
pub fn build_system_prompt(plays: &[PlayRecord]) -> String {
    format!(
        "You are an NFL analytics expert analyzing the Patriots' 4th down decisions \
in Super Bowl LX (Seahawks 29, Patriots 13).\n\n\
Here is the data on all Patriots 4th down plays:\n{}\n\n\
Key facts:\n\
- NFL 4th & 1 conversion rate is 72%\n\
- The Patriots punted on 4th & 1 from their own 41 while down 12-0 in Q3\n\
- WPA = Win Probability Added (negative means the decision hurt their chances)\n\
- EPA = Expected Points Added\n\n\
Answer questions concisely and reference specific plays from the data.",
        render_play_table(plays)
    )
}

/// Plain-text table of the dataset for prompt embedding; missing numbers
/// render as "-".
pub fn render_play_table(plays: &[PlayRecord]) -> String {
    let mut lines = vec![format!(
        "{:<4} {:<6} {:<5} {:<10} {:<7} {:<5} {:<6} {:<6} {:<6} {:<12} DESCRIPTION",
        "QTR", "CLOCK", "YTG", "FIELD_POS", "SCORE", "DIFF", "WP%", "WPA%", "EPA", "GRADE"
    )];
    for play in plays {
        lines.push(format!(
            "{:<4} {:<6} {:<5} {:<10} {:<7} {:<5} {:<6} {:<6} {:<6} {:<12} {}",
            play.quarter,
            play.clock,
            play.yards_to_go,
            play.field_position,
            format!("{}-{}", play.offense_score, play.defense_score),
            play.score_differential,
            fmt_opt(play.win_prob_pct, 1),
            fmt_opt(play.wpa_pct, 1),
            fmt_opt(play.epa, 2),
            play.grade.label(),
            play.description,
        ));
    }
    lines.join("\n")
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "-".to_string(),
    }
}
