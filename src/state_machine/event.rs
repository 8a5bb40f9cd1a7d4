//! Events that can occur in a conversation

use super::state::ErrorKind;
use crate::api::ChatResponse;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserMessage {
        text: String,
        /// Becomes the message timestamp, and with it the rollback identity
        timestamp: i64,
    },
    Retry,
    DismissError,
    Reset,

    // Gateway events
    GatewayReply {
        response: ChatResponse,
    },
    GatewayFailure {
        message: String,
        error_kind: ErrorKind,
    },
}

impl Event {
    pub fn user_message(text: impl Into<String>, timestamp: i64) -> Self {
        Event::UserMessage {
            text: text.into(),
            timestamp,
        }
    }

    pub fn failure(message: impl Into<String>, error_kind: ErrorKind) -> Self {
        Event::GatewayFailure {
            message: message.into(),
            error_kind,
        }
    }
}
