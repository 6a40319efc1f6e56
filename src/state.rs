use std::collections::VecDeque;

use chrono::Local;

use crate::chat_gateway::{ChatMessage, Role, QUESTION_LIMIT};
use crate::play::PlayRecord;

const LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Plays,
    Analysis,
}

impl Tab {
    pub fn next(self) -> Tab {
        match self {
            Tab::Overview => Tab::Plays,
            Tab::Plays => Tab::Analysis,
            Tab::Analysis => Tab::Overview,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Connected,
    Fallback { reason: String },
}

/// Commands the UI thread sends to the provider worker.
#[derive(Debug, Clone)]
pub enum ProviderCommand {
    RefreshPlays { force: bool },
    Ask(String),
}

/// Updates the provider worker sends back to the UI thread.
#[derive(Debug, Clone)]
pub enum Delta {
    SetPlays {
        plays: Vec<PlayRecord>,
        source: SourceStatus,
    },
    ChatExchange {
        question: String,
        answer: String,
        questions_left: u32,
    },
    Log(String),
}

pub struct AppState {
    pub tab: Tab,
    pub plays: Vec<PlayRecord>,
    pub source: SourceStatus,
    pub selected_play: usize,
    pub transcript: Vec<ChatMessage>,
    pub pending_question: Option<String>,
    pub questions_left: u32,
    // Some while the chat input line is active.
    pub input: Option<String>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tab: Tab::Overview,
            plays: Vec::new(),
            source: SourceStatus::Fallback {
                reason: "no data loaded yet".to_string(),
            },
            selected_play: 0,
            transcript: Vec::new(),
            pending_question: None,
            questions_left: QUESTION_LIMIT,
            input: None,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        let stamped = format!("{} {}", Local::now().format("%H:%M:%S"), line.into());
        if self.logs.len() >= LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(stamped);
    }

    pub fn select_next(&mut self) {
        if !self.plays.is_empty() {
            self.selected_play = (self.selected_play + 1).min(self.plays.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_play = self.selected_play.saturating_sub(1);
    }

    pub fn chat_busy(&self) -> bool {
        self.pending_question.is_some()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetPlays { plays, source } => {
            state.plays = plays;
            state.source = source;
            if state.selected_play >= state.plays.len() {
                state.selected_play = state.plays.len().saturating_sub(1);
            }
        }
        Delta::ChatExchange {
            question,
            answer,
            questions_left,
        } => {
            state.transcript.push(ChatMessage {
                role: Role::User,
                text: question,
            });
            state.transcript.push(ChatMessage {
                role: Role::Assistant,
                text: answer,
            });
            state.questions_left = questions_left;
            state.pending_question = None;
        }
        Delta::Log(line) => state.push_log(line),
    }
}
