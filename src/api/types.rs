//! API request and response types
//!
//! These are shared by the server handlers and the HTTP gateway client, so
//! both sides agree on the JSON shape of `/api/chat`.

use crate::llm::MessageRole;
use serde::{Deserialize, Serialize};

/// A chat message as it travels over the wire and sits in the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    /// Milliseconds since the epoch; identifies the message for rollback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Message {
    pub fn user(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: Some(timestamp),
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Some(timestamp),
        }
    }

    /// Whether this message carries the given `(role, timestamp)` identity
    pub fn is(&self, role: MessageRole, timestamp: Option<i64>) -> bool {
        self.role == role && self.timestamp == timestamp
    }
}

/// Request to `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
}

/// Successful reply from `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    pub timestamp: i64,
    /// Application-level failure flag; `message` then holds the error text
    #[serde(default)]
    pub is_error: bool,
}

/// A suggested persona shown before the first message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaInfo {
    pub label: String,
    pub prompt: String,
}

/// Response for persona list
#[derive(Debug, Serialize, Deserialize)]
pub struct PersonasResponse {
    pub personas: Vec<PersonaInfo>,
    pub default_prompt: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
