//! Mock implementations for testing
//!
//! These mocks enable runtime testing without real I/O.

use super::traits::{ClientError, GatewayClient};
use crate::api::{ChatRequest, ChatResponse};
use crate::state_machine::ErrorKind;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Mock gateway that returns queued replies
pub struct MockGatewayClient {
    replies: Mutex<VecDeque<Result<ChatResponse, ClientError>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<ChatRequest>>,
    /// When set, each call parks until notified
    gate: Option<Arc<Notify>>,
}

impl MockGatewayClient {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Calls block until `gate.notify_one()`
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, message: impl Into<String>, timestamp: i64) {
        self.replies.lock().unwrap().push_back(Ok(ChatResponse {
            message: message.into(),
            timestamp,
            is_error: false,
        }));
    }

    /// Queue a 2xx reply carrying the error flag
    pub fn queue_flagged(&self, message: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(ChatResponse {
            message: message.into(),
            timestamp: 0,
            is_error: true,
        }));
    }

    /// Queue a client-side failure
    pub fn queue_error(&self, kind: ErrorKind, message: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(ClientError::new(kind, message)));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockGatewayClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GatewayClient for MockGatewayClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::new(ErrorKind::Network, "No mock reply queued")))
    }
}
