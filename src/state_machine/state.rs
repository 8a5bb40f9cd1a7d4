//! Conversation state types

use crate::api::{ChatRequest, Message};
use crate::system_prompt::DEFAULT_SYSTEM_PROMPT;
use serde::{Deserialize, Serialize};

/// Why a turn was rolled back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The gateway could not be reached or the body could not be read
    Network,
    /// Gateway rejected the request shape (400)
    InvalidRequest,
    /// Provider credentials are wrong (401)
    Auth,
    /// Provider did not answer in time (504)
    Timeout,
    /// Any other non-success status
    Server,
    /// 2xx reply carrying the error flag
    Application,
    /// 2xx reply without usable text
    EmptyReply,
}

/// Conversation state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatState {
    /// Ready for user input, no request in flight
    #[default]
    Idle,

    /// Request in flight; `message` is optimistically in the log
    Pending {
        /// Log as it was before `message` was appended
        snapshot: Vec<Message>,
        message: Message,
    },

    /// Last turn was rolled back; `message` can be replayed
    Error {
        message: Message,
        reason: String,
        error_kind: ErrorKind,
    },
}

impl ChatState {
    pub fn is_pending(&self) -> bool {
        matches!(self, ChatState::Pending { .. })
    }

    /// The message a retry would replay
    pub fn failed_message(&self) -> Option<&Message> {
        match self {
            ChatState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn error_reason(&self) -> Option<&str> {
        match self {
            ChatState::Error { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Persona settings for a conversation, editable between turns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatContext {
    pub conversation_id: String,
    pub system_prompt: String,
    pub name: Option<String>,
    pub age: Option<String>,
}

impl ChatContext {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            name: None,
            age: None,
        }
    }

    pub fn with_persona(mut self, name: impl Into<String>, age: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.age = Some(age.into());
        self
    }

    /// Build the wire request for one turn
    pub fn request_for(&self, message: &Message, history: Vec<Message>) -> ChatRequest {
        ChatRequest {
            message: message.content.clone(),
            history,
            system_prompt: Some(self.system_prompt.clone()),
            name: self.name.clone(),
            age: self.age.clone(),
        }
    }
}
