//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the runtime with mock implementations.

use crate::api::{ChatRequest, ChatResponse};
use crate::state_machine::ErrorKind;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Client-side failure of one gateway call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClientError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ClientError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Client for the completion gateway
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// Send one chat turn.
    ///
    /// A 2xx reply is returned as-is, error flag included; everything else
    /// (transport failures, non-2xx, unreadable bodies) is a [`ClientError`].
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError>;
}

#[async_trait]
impl<T: GatewayClient + ?Sized> GatewayClient for Arc<T> {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        (**self).chat(request).await
    }
}
