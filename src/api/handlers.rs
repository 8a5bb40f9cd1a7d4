//! HTTP request handlers

use super::types::{ChatRequest, ChatResponse, ErrorResponse, PersonaInfo, PersonasResponse};
use super::AppState;
use crate::gateway::GatewayError;
use crate::persona::PRESETS;
use crate::system_prompt::DEFAULT_SYSTEM_PROMPT;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/personas", get(list_personas))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Chat
// ============================================================

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    match state.gateway.handle(&request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!(error = %e, detail = ?e.detail(), "Chat API error");
            Err(e.into())
        }
    }
}

// ============================================================
// Personas
// ============================================================

async fn list_personas() -> Json<PersonasResponse> {
    Json(PersonasResponse {
        personas: PRESETS
            .iter()
            .map(|p| PersonaInfo {
                label: p.label.to_string(),
                prompt: p.prompt.to_string(),
            })
            .collect(),
        default_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
    })
}

async fn get_version() -> &'static str {
    concat!("persona-chat ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Unauthorized { error: String, detail: String },
    GatewayTimeout { error: String, detail: String },
    Internal(String),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Validation(msg) => AppError::BadRequest(msg),
            GatewayError::Auth(ref e) => AppError::Unauthorized {
                error: err.to_string(),
                detail: e.message.clone(),
            },
            GatewayError::Timeout(ref e) => AppError::GatewayTimeout {
                error: err.to_string(),
                detail: e.message.clone(),
            },
            GatewayError::Upstream(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            AppError::Unauthorized { error, detail } => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new(error).with_message(detail),
            ),
            AppError::GatewayTimeout { error, detail } => (
                StatusCode::GATEWAY_TIMEOUT,
                ErrorResponse::new(error).with_message(detail),
            ),
            AppError::Internal(msg) => {
                let msg = if msg.is_empty() {
                    "An unexpected error occurred.".to_string()
                } else {
                    msg
                };
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(msg))
            }
        };

        (status, Json(body)).into_response()
    }
}
