//! HTTP API for the chat relay

mod handlers;
mod types;

pub use handlers::create_router;
pub use types::*;

use crate::gateway::CompletionGateway;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<CompletionGateway>,
}

impl AppState {
    pub fn new(gateway: CompletionGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}
