//! Pure state transition function
//!
//! Given the same state, log, context and event this always produces the
//! same result, with no I/O.

use super::{ChatContext, ChatState, Effect, ErrorKind, Event};
use crate::api::{ChatResponse, Message};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("A request is already in flight, wait for it to finish")]
    RequestInFlight,
    #[error("There is no failed message to retry")]
    NothingToRetry,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

pub fn transition(
    state: &ChatState,
    log: &[Message],
    context: &ChatContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Sending
        // ============================================================

        // Blank input never leaves the current state
        (_, Event::UserMessage { text, .. }) if text.trim().is_empty() => {
            Ok(TransitionResult::new(state.clone()))
        }

        // Idle/Error + UserMessage -> Pending (a new send drops any failed message)
        (ChatState::Idle | ChatState::Error { .. }, Event::UserMessage { text, timestamp }) => {
            let message = Message::user(text.trim(), timestamp);
            Ok(begin_turn(log.to_vec(), context, message))
        }

        // Error + Retry -> Pending, replaying the failed message as-is
        (ChatState::Error { message, .. }, Event::Retry) => {
            let snapshot = log
                .iter()
                .filter(|m| !m.is(message.role, message.timestamp))
                .cloned()
                .collect();
            Ok(begin_turn(snapshot, context, message.clone()))
        }

        (ChatState::Pending { .. }, Event::UserMessage { .. } | Event::Retry | Event::Reset) => {
            Err(TransitionError::RequestInFlight)
        }

        (ChatState::Idle, Event::Retry) => Err(TransitionError::NothingToRetry),

        // ============================================================
        // Gateway outcomes
        // ============================================================

        (ChatState::Pending { message, .. }, Event::GatewayReply { response }) => {
            Ok(settle_reply(message, response))
        }

        (
            ChatState::Pending { message, .. },
            Event::GatewayFailure {
                message: reason,
                error_kind,
            },
        ) => Ok(rollback(message, reason.clone(), error_kind)
            .with_effect(Effect::NotifyError { message: reason })),

        (_, Event::GatewayReply { .. } | Event::GatewayFailure { .. }) => Err(
            TransitionError::InvalidTransition("gateway outcome with no request in flight".into()),
        ),

        // ============================================================
        // Housekeeping
        // ============================================================

        (ChatState::Error { .. }, Event::DismissError) => {
            Ok(TransitionResult::new(ChatState::Idle))
        }

        (ChatState::Idle | ChatState::Error { .. }, Event::Reset) => {
            Ok(TransitionResult::new(ChatState::Idle).with_effect(Effect::ClearLog))
        }

        (_, Event::DismissError) => Err(TransitionError::InvalidTransition(
            "no error to dismiss".into(),
        )),
    }
}

/// Optimistically append `message` and issue exactly one request whose
/// history is `snapshot`
fn begin_turn(snapshot: Vec<Message>, context: &ChatContext, message: Message) -> TransitionResult {
    let request = context.request_for(&message, snapshot.clone());
    TransitionResult::new(ChatState::Pending {
        snapshot,
        message: message.clone(),
    })
    .with_effect(Effect::append(message))
    .with_effect(Effect::RequestCompletion { request })
}

fn settle_reply(message: &Message, response: ChatResponse) -> TransitionResult {
    if response.is_error {
        let reason = if response.message.trim().is_empty() {
            "The assistant reported an error".to_string()
        } else {
            response.message
        };
        return rollback(message, reason, ErrorKind::Application);
    }

    if response.message.trim().is_empty() {
        return rollback(message, "No response from AI".to_string(), ErrorKind::EmptyReply);
    }

    TransitionResult::new(ChatState::Idle).with_effect(Effect::append(Message::assistant(
        response.message,
        response.timestamp,
    )))
}

/// Pending -> Error: take the optimistic message back out of the log
fn rollback(message: &Message, reason: String, error_kind: ErrorKind) -> TransitionResult {
    TransitionResult::new(ChatState::Error {
        message: message.clone(),
        reason,
        error_kind,
    })
    .with_effect(Effect::remove(message))
}
