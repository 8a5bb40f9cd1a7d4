//! Effects produced by state transitions

use crate::api::{ChatRequest, Message};
use crate::llm::MessageRole;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the visible log
    AppendMessage { message: Message },

    /// Remove the message with this identity from the visible log
    RemoveMessage {
        role: MessageRole,
        timestamp: Option<i64>,
    },

    /// Empty the visible log
    ClearLog,

    /// Send a request to the gateway
    RequestCompletion { request: ChatRequest },

    /// Surface a transient error notice (the inline error lives in the state)
    NotifyError { message: String },
}

impl Effect {
    pub fn append(message: Message) -> Self {
        Effect::AppendMessage { message }
    }

    pub fn remove(message: &Message) -> Self {
        Effect::RemoveMessage {
            role: message.role,
            timestamp: message.timestamp,
        }
    }

    /// Whether the effect touches only the in-memory log
    pub fn is_log_edit(&self) -> bool {
        matches!(
            self,
            Effect::AppendMessage { .. } | Effect::RemoveMessage { .. } | Effect::ClearLog
        )
    }
}
