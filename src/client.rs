//! HTTP client for `POST /api/chat`

use crate::api::{ChatRequest, ChatResponse, ErrorResponse};
use crate::runtime::{ClientError, GatewayClient};
use crate::state_machine::ErrorKind;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

const FALLBACK_ERROR: &str = "API request failed unexpectedly";

pub struct HttpGatewayClient {
    client: Client,
    endpoint: String,
}

impl HttpGatewayClient {
    /// `base_url` is the server origin, e.g. `http://localhost:5000`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ClientError::new(ErrorKind::Network, format!("Failed to create HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        })
    }

    fn classify_status(status: StatusCode, body: &str) -> ClientError {
        let parsed = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .filter(|e| !e.error.trim().is_empty());
        let message = match parsed {
            Some(ErrorResponse {
                error,
                message: Some(detail),
            }) if !detail.trim().is_empty() => format!("{error}: {detail}"),
            Some(e) => e.error,
            None => FALLBACK_ERROR.to_string(),
        };

        let kind = match status {
            StatusCode::BAD_REQUEST => ErrorKind::InvalidRequest,
            StatusCode::UNAUTHORIZED => ErrorKind::Auth,
            StatusCode::GATEWAY_TIMEOUT => ErrorKind::Timeout,
            _ => ErrorKind::Server,
        };
        ClientError::new(kind, message)
    }
}

fn transport_error(e: &reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::new(ErrorKind::Timeout, format!("Request timed out: {e}"))
    } else {
        ClientError::new(ErrorKind::Network, format!("Failed to reach the chat server: {e}"))
    }
}

#[async_trait]
impl GatewayClient for HttpGatewayClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| transport_error(&e))?;

        if !status.is_success() {
            return Err(Self::classify_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            ClientError::new(
                ErrorKind::EmptyReply,
                format!("Chat server sent an unusable reply: {e}"),
            )
        })
    }
}
