use sb60_terminal::chat_gateway::Role;
use sb60_terminal::fallback::fallback_plays;
use sb60_terminal::state::{apply_delta, AppState, Delta, SourceStatus};

#[test]
fn set_plays_updates_source_and_clamps_selection() {
    let mut state = AppState::new();
    state.selected_play = 20;

    apply_delta(
        &mut state,
        Delta::SetPlays {
            plays: fallback_plays(),
            source: SourceStatus::Fallback {
                reason: "request failed".to_string(),
            },
        },
    );

    assert_eq!(state.plays.len(), 8);
    assert_eq!(state.selected_play, 7);
    assert!(matches!(state.source, SourceStatus::Fallback { .. }));
}

#[test]
fn chat_exchange_appends_in_order_and_clears_pending() {
    let mut state = AppState::new();
    state.pending_question = Some("Why punt?".to_string());

    apply_delta(
        &mut state,
        Delta::ChatExchange {
            question: "Why punt?".to_string(),
            answer: "They were scared.".to_string(),
            questions_left: 9,
        },
    );

    assert_eq!(state.transcript.len(), 2);
    assert_eq!(state.transcript[0].role, Role::User);
    assert_eq!(state.transcript[0].text, "Why punt?");
    assert_eq!(state.transcript[1].role, Role::Assistant);
    assert_eq!(state.transcript[1].text, "They were scared.");
    assert_eq!(state.questions_left, 9);
    assert!(!state.chat_busy());
}

#[test]
fn logs_are_timestamped_and_bounded() {
    let mut state = AppState::new();
    for i in 0..60 {
        apply_delta(&mut state, Delta::Log(format!("[INFO] line {i}")));
    }

    assert_eq!(state.logs.len(), 50);
    let last = state.logs.back().expect("logs are non-empty");
    assert!(last.ends_with("[INFO] line 59"));
    // "HH:MM:SS " prefix from the console clock.
    assert_eq!(last.as_bytes()[2], b':');
}
