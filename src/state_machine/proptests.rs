//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::*;
use crate::api::{ChatRequest, ChatResponse, Message};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> ChatContext {
    ChatContext::new("test-conv").with_persona("Eon", "27")
}

fn requests_in(effects: &[Effect]) -> Vec<ChatRequest> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::RequestCompletion { request } => Some(request.clone()),
            _ => None,
        })
        .collect()
}

/// Event template; timestamps are filled in by the driver so they stay unique
#[derive(Debug, Clone)]
enum Step {
    Send(String),
    Retry,
    Reply(String),
    ErrorFlag(String),
    Fail(String, ErrorKind),
    Dismiss,
    Reset,
}

impl Step {
    fn into_event(self, clock: i64) -> Event {
        match self {
            Step::Send(text) => Event::user_message(text, clock),
            Step::Retry => Event::Retry,
            Step::Reply(text) => Event::GatewayReply {
                response: ChatResponse {
                    message: text,
                    timestamp: clock,
                    is_error: false,
                },
            },
            Step::ErrorFlag(text) => Event::GatewayReply {
                response: ChatResponse {
                    message: text,
                    timestamp: clock,
                    is_error: true,
                },
            },
            Step::Fail(text, kind) => Event::failure(text, kind),
            Step::Dismiss => Event::DismissError,
            Step::Reset => Event::Reset,
        }
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_error_kind() -> impl Strategy<Value = ErrorKind> {
    prop_oneof![
        Just(ErrorKind::Network),
        Just(ErrorKind::InvalidRequest),
        Just(ErrorKind::Auth),
        Just(ErrorKind::Timeout),
        Just(ErrorKind::Server),
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    "[ a-zA-Z0-9!?]{0,20}"
}

fn arb_non_blank_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{1,10}( [a-zA-Z0-9!?]{1,10}){0,3}"
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => arb_text().prop_map(Step::Send),
        2 => Just(Step::Retry),
        3 => arb_text().prop_map(Step::Reply),
        1 => arb_text().prop_map(Step::ErrorFlag),
        2 => (arb_text(), arb_error_kind()).prop_map(|(t, k)| Step::Fail(t, k)),
        1 => Just(Step::Dismiss),
        1 => Just(Step::Reset),
    ]
}

fn arb_log() -> impl Strategy<Value = Vec<Message>> {
    proptest::collection::vec(arb_non_blank_text(), 0..6).prop_map(|texts| {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let ts = i64::try_from(i).unwrap();
                if i % 2 == 0 {
                    Message::user(text, ts)
                } else {
                    Message::assistant(text, ts)
                }
            })
            .collect()
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn send_appends_one_message_and_one_request(log in arb_log(), text in arb_non_blank_text()) {
        let result = transition(
            &ChatState::Idle,
            &log,
            &test_context(),
            Event::user_message(text.clone(), 1_000),
        ).unwrap();

        let appended: Vec<_> = result.effects.iter()
            .filter(|e| matches!(e, Effect::AppendMessage { .. }))
            .collect();
        prop_assert_eq!(appended.len(), 1);

        let reqs = requests_in(&result.effects);
        prop_assert_eq!(reqs.len(), 1);
        prop_assert_eq!(&reqs[0].history, &log);
        prop_assert_eq!(&reqs[0].message, text.trim());
    }

    #[test]
    fn failure_restores_the_pre_send_log(
        log in arb_log(),
        text in arb_non_blank_text(),
        reason in arb_text(),
        kind in arb_error_kind(),
    ) {
        let mut conv = Conversation::new(test_context());
        for m in &log {
            // Seed the log through the state machine
            if let Some(ts) = m.timestamp {
                conv.handle(Event::user_message(m.content.clone(), ts * 2)).unwrap();
                conv.handle(Event::GatewayReply {
                    response: ChatResponse {
                        message: "ok".into(),
                        timestamp: ts * 2 + 1,
                        is_error: false,
                    },
                }).unwrap();
            }
        }
        let before = conv.messages().to_vec();

        let first = requests_in(&conv.handle(Event::user_message(text, 10_000)).unwrap());
        conv.handle(Event::failure(reason, kind)).unwrap();

        prop_assert_eq!(conv.messages(), before.as_slice());
        prop_assert!(conv.state().failed_message().is_some());

        let replay = requests_in(&conv.handle(Event::Retry).unwrap());
        prop_assert_eq!(replay, first);
    }

    #[test]
    fn successful_reply_appends_exactly_the_returned_text(
        text in arb_non_blank_text(),
        answer in arb_non_blank_text(),
    ) {
        let mut conv = Conversation::new(test_context());
        conv.handle(Event::user_message(text, 1)).unwrap();
        let before = conv.messages().len();

        conv.handle(Event::GatewayReply {
            response: ChatResponse { message: answer.clone(), timestamp: 2, is_error: false },
        }).unwrap();

        prop_assert_eq!(conv.messages().len(), before + 1);
        prop_assert_eq!(conv.messages().last(), Some(&Message::assistant(answer, 2)));
    }

    #[test]
    fn blank_input_never_issues_a_request(blank in "[ \t\n]{0,8}", log in arb_log()) {
        let result = transition(
            &ChatState::Idle,
            &log,
            &test_context(),
            Event::user_message(blank, 1),
        ).unwrap();
        prop_assert_eq!(result.new_state, ChatState::Idle);
        prop_assert!(result.effects.is_empty());
    }

    /// Random sequences keep the structural invariants:
    /// - Pending: log == snapshot + [message]
    /// - Error: the failed message is not in the log
    /// - every issued request excludes the message it answers
    /// - at most one request is outstanding
    #[test]
    fn invariants_hold_over_random_sequences(
        steps in proptest::collection::vec(arb_step(), 1..40),
    ) {
        let mut conv = Conversation::new(test_context());
        let mut outstanding = 0u32;

        for (i, step) in steps.into_iter().enumerate() {
            let clock = i64::try_from(i).unwrap() + 1;
            let was_pending = conv.state().is_pending();
            let before = conv.messages().to_vec();

            match conv.handle(step.into_event(clock)) {
                Ok(effects) => {
                    let reqs = requests_in(&effects);
                    prop_assert!(reqs.len() <= 1);
                    if let Some(req) = reqs.first() {
                        prop_assert!(!was_pending);
                        outstanding += 1;
                        let ChatState::Pending { message, .. } = conv.state() else {
                            return Err(TestCaseError::fail("request issued outside Pending"));
                        };
                        prop_assert!(
                            !req.history.iter().any(|m| m.is(message.role, message.timestamp))
                        );
                        prop_assert_eq!(&req.message, &message.content);
                    }
                    if was_pending && !conv.state().is_pending() {
                        outstanding -= 1;
                    }
                }
                Err(_) => {
                    prop_assert_eq!(conv.messages(), before.as_slice());
                }
            }

            prop_assert!(outstanding <= 1);
            match conv.state() {
                ChatState::Pending { snapshot, message } => {
                    let mut expected = snapshot.clone();
                    expected.push(message.clone());
                    prop_assert_eq!(conv.messages(), expected.as_slice());
                }
                ChatState::Error { message, .. } => {
                    prop_assert!(
                        !conv.messages().iter().any(|m| m.is(message.role, message.timestamp))
                    );
                }
                ChatState::Idle => {
                    prop_assert_eq!(outstanding, 0);
                }
            }
        }
    }
}
