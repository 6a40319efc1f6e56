use std::cell::Cell;

use anyhow::{anyhow, Result};

use sb60_terminal::chat_gateway::{
    answer, build_system_prompt, ChatSession, Role, LIMIT_MESSAGE, NOT_CONFIGURED_MESSAGE,
    QUESTION_LIMIT,
};
use sb60_terminal::completion::CompletionClient;
use sb60_terminal::fallback::fallback_plays;

struct MockClient {
    calls: Cell<u32>,
    fail_with: Option<String>,
}

impl MockClient {
    fn ok() -> Self {
        Self {
            calls: Cell::new(0),
            fail_with: None,
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            calls: Cell::new(0),
            fail_with: Some(message.to_string()),
        }
    }
}

impl CompletionClient for MockClient {
    fn complete(&self, _system: &str, _user: &str, _max_tokens: u32) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        match &self.fail_with {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok("They should have gone for it.".to_string()),
        }
    }
}

#[test]
fn quota_blocks_the_eleventh_question() {
    let plays = fallback_plays();
    let client = MockClient::ok();
    let mut session = ChatSession::new();

    for _ in 0..QUESTION_LIMIT {
        let reply = answer("Why punt?", &plays, &mut session, Some(&client));
        assert_ne!(reply, LIMIT_MESSAGE);
    }
    assert_eq!(client.calls.get(), QUESTION_LIMIT);
    assert_eq!(session.question_count, QUESTION_LIMIT);
    assert_eq!(session.questions_left(), 0);

    let reply = answer("One more?", &plays, &mut session, Some(&client));
    assert_eq!(reply, LIMIT_MESSAGE);
    // No dispatch and no further increment past the guard.
    assert_eq!(client.calls.get(), QUESTION_LIMIT);
    assert_eq!(session.question_count, QUESTION_LIMIT);
}

#[test]
fn dispatch_failure_becomes_a_short_answer() {
    let plays = fallback_plays();
    let long_error = "network down ".repeat(40);
    let client = MockClient::failing(&long_error);
    let mut session = ChatSession::new();

    let reply = answer("Why punt?", &plays, &mut session, Some(&client));
    assert!(reply.starts_with("Error: "));
    assert!(reply.chars().count() <= 160);
    // The increment applied before dispatch stands.
    assert_eq!(session.question_count, 1);
}

#[test]
fn missing_credential_degrades_to_notice() {
    let plays = fallback_plays();
    let mut session = ChatSession::new();

    let reply = answer("Why punt?", &plays, &mut session, None);
    assert_eq!(reply, NOT_CONFIGURED_MESSAGE);
    assert_eq!(session.question_count, 1);
}

#[test]
fn transcript_keeps_question_then_answer_order() {
    let plays = fallback_plays();
    let client = MockClient::ok();
    let mut session = ChatSession::new();

    let reply = answer("Why punt?", &plays, &mut session, Some(&client));
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[0].role, Role::User);
    assert_eq!(session.messages[0].text, "Why punt?");
    assert_eq!(session.messages[1].role, Role::Assistant);
    assert_eq!(session.messages[1].text, reply);
}

#[test]
fn system_prompt_embeds_dataset_and_facts() {
    let plays = fallback_plays();
    let prompt = build_system_prompt(&plays);

    assert!(prompt.contains("conversion rate is 72%"));
    assert!(prompt.contains("SEA 44"));
    assert!(prompt.contains("4th & 1 PUNT from own 41 - THE KEY PLAY"));
    assert!(prompt.contains("TERRIBLE"));
}
