//! Completion gateway
//!
//! Stateless relay: validate a chat request, compose the prompt sequence
//! `[system, ...history, user]`, call the provider once, and shape the reply.
//! Every failure comes back as a classified [`GatewayError`].

use crate::api::{ChatRequest, ChatResponse};
use crate::llm::{LlmError, LlmErrorKind, LlmMessage, LlmRequest, LlmService};
use crate::system_prompt::{build_system_prompt, Persona};
use std::sync::Arc;
use thiserror::Error;

/// Classified gateway failure
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed or empty request; never worth retrying unchanged
    #[error("{0}")]
    Validation(String),
    /// Provider rejected our credentials
    #[error("Authentication with the AI provider failed")]
    Auth(#[source] LlmError),
    /// Provider did not answer within the configured bound
    #[error("The AI provider did not respond in time")]
    Timeout(#[source] LlmError),
    /// Any other provider or transport failure, including empty completions
    #[error("{0}")]
    Upstream(#[source] LlmError),
}

impl GatewayError {
    /// Detail from the provider, when there is one beyond the summary
    pub fn detail(&self) -> Option<&str> {
        match self {
            GatewayError::Auth(e) | GatewayError::Timeout(e) => Some(&e.message),
            GatewayError::Validation(_) | GatewayError::Upstream(_) => None,
        }
    }
}

impl From<LlmError> for GatewayError {
    fn from(err: LlmError) -> Self {
        match err.kind {
            LlmErrorKind::Auth => GatewayError::Auth(err),
            LlmErrorKind::Timeout => GatewayError::Timeout(err),
            _ => GatewayError::Upstream(err),
        }
    }
}

/// Relays chat requests to the completion provider
pub struct CompletionGateway {
    llm: Arc<dyn LlmService>,
}

impl CompletionGateway {
    pub fn new(llm: Arc<dyn LlmService>) -> Self {
        Self { llm }
    }

    pub fn model_id(&self) -> &str {
        self.llm.model_id()
    }

    /// Handle one chat turn
    pub async fn handle(&self, request: &ChatRequest) -> Result<ChatResponse, GatewayError> {
        validate(request)?;

        let prompt = build_prompt(request);
        tracing::debug!(
            history = request.history.len(),
            prompt_messages = prompt.messages.len(),
            "Relaying chat turn"
        );

        let response = self.llm.complete(&prompt).await?;
        if response.text.trim().is_empty() {
            return Err(GatewayError::Upstream(LlmError::empty_response(
                "No response from AI",
            )));
        }

        Ok(ChatResponse {
            message: response.text,
            timestamp: chrono::Utc::now().timestamp_millis(),
            is_error: false,
        })
    }
}

fn validate(request: &ChatRequest) -> Result<(), GatewayError> {
    if request.message.trim().is_empty() {
        return Err(GatewayError::Validation(
            "Message cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Compose the ordered prompt sequence for a request
pub fn build_prompt(request: &ChatRequest) -> LlmRequest {
    let persona = Persona::new(request.name.as_deref(), request.age.as_deref());
    let system = build_system_prompt(request.system_prompt.as_deref(), persona);

    let mut messages = Vec::with_capacity(request.history.len() + 2);
    messages.push(LlmMessage::system(system));
    messages.extend(request.history.iter().map(|m| LlmMessage {
        role: m.role,
        content: m.content.clone(),
    }));
    messages.push(LlmMessage::user(request.message.clone()));

    LlmRequest::new(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Message;
    use crate::llm::testing::MockLlmService;
    use crate::llm::MessageRole;
    use crate::system_prompt::DEFAULT_SYSTEM_PROMPT;

    fn request(message: &str, history: Vec<Message>) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            history,
            system_prompt: None,
            name: None,
            age: None,
        }
    }

    fn gateway_with(mock: &Arc<MockLlmService>) -> CompletionGateway {
        CompletionGateway::new(mock.clone())
    }

    #[tokio::test]
    async fn hello_with_empty_history() {
        let mock = Arc::new(MockLlmService::new("test-model"));
        mock.queue_text("Hi there!");
        let gateway = gateway_with(&mock);

        let before = chrono::Utc::now().timestamp_millis();
        let reply = gateway.handle(&request("Hello", vec![])).await.unwrap();

        assert_eq!(reply.message, "Hi there!");
        assert!(!reply.is_error);
        assert!(reply.timestamp >= before);

        let sent = mock.recorded_requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].messages,
            vec![
                LlmMessage::system(DEFAULT_SYSTEM_PROMPT),
                LlmMessage::user("Hello"),
            ]
        );
    }

    #[test]
    fn history_sits_between_system_and_user() {
        let mut req = request(
            "And you?",
            vec![Message::user("Hi", 1), Message::assistant("Hello!", 2)],
        );
        req.system_prompt = Some("A friendly AI chatbot".to_string());
        req.name = Some("Eon".to_string());
        req.age = Some("27".to_string());

        let prompt = build_prompt(&req);
        let roles: Vec<MessageRole> = prompt.messages.iter().map(|m| m.role).collect();

        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User
            ]
        );
        assert_eq!(
            prompt.messages[0].content,
            "A friendly AI chatbot\n\nYou are a chatbot named Eon and you are 27 years old."
        );
        assert_eq!(prompt.messages[3].content, "And you?");
    }

    #[tokio::test]
    async fn blank_message_is_rejected_without_calling_provider() {
        let mock = Arc::new(MockLlmService::new("test-model"));
        let gateway = gateway_with(&mock);

        let err = gateway.handle(&request("  \n", vec![])).await.unwrap_err();

        assert!(matches!(err, GatewayError::Validation(_)));
        assert_eq!(err.to_string(), "Message cannot be empty");
        assert!(mock.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn provider_errors_are_classified() {
        let mock = Arc::new(MockLlmService::new("test-model"));
        mock.queue_error(LlmError::auth("Authentication failed: bad key"));
        mock.queue_error(LlmError::timeout("Request timeout"));
        mock.queue_error(LlmError::server_error("Server error: boom"));
        let gateway = gateway_with(&mock);
        let req = request("Hello", vec![]);

        let auth = gateway.handle(&req).await.unwrap_err();
        assert!(matches!(auth, GatewayError::Auth(_)));
        assert_eq!(auth.detail(), Some("Authentication failed: bad key"));

        let timeout = gateway.handle(&req).await.unwrap_err();
        assert!(matches!(timeout, GatewayError::Timeout(_)));

        let upstream = gateway.handle(&req).await.unwrap_err();
        assert!(matches!(upstream, GatewayError::Upstream(_)));
        assert_eq!(upstream.to_string(), "Server error: boom");
    }

    #[tokio::test]
    async fn whitespace_completion_is_a_failure() {
        let mock = Arc::new(MockLlmService::new("test-model"));
        mock.queue_text("   ");
        let gateway = gateway_with(&mock);

        let err = gateway.handle(&request("Hello", vec![])).await.unwrap_err();

        assert!(matches!(err, GatewayError::Upstream(_)));
        assert_eq!(err.to_string(), "No response from AI");
    }
}
