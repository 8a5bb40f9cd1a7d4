//! Conversation runtime executor
//!
//! Drives a [`Conversation`] through one turn at a time: run the event
//! through the state machine, perform the gateway call the effects ask for,
//! and feed the outcome back in.

use super::single_flight::SingleFlight;
use super::traits::GatewayClient;
use crate::api::{ChatRequest, Message};
use crate::persona::PersonaPreset;
use crate::state_machine::{
    ChatContext, ChatState, Conversation, Effect, ErrorKind, Event, TransitionError,
};
use rand::Rng;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const CANCELLED: &str = "Request cancelled";

/// How a turn ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Reply appended to the log
    Committed { reply: Message },
    /// User message taken back out; `failed` can be retried
    RolledBack {
        failed: Message,
        reason: String,
        error_kind: ErrorKind,
    },
    /// Blank input; nothing was sent
    Ignored,
}

/// Conversation runtime generic over the gateway transport
pub struct ConversationRuntime<G: GatewayClient> {
    conversation: Mutex<Conversation>,
    gateway: G,
    flights: Arc<SingleFlight<String>>,
}

impl<G: GatewayClient> ConversationRuntime<G> {
    pub fn new(context: ChatContext, gateway: G) -> Self {
        Self::with_flights(context, gateway, Arc::new(SingleFlight::new()))
    }

    /// Share a single-flight registry with other runtimes
    pub fn with_flights(
        context: ChatContext,
        gateway: G,
        flights: Arc<SingleFlight<String>>,
    ) -> Self {
        Self {
            conversation: Mutex::new(Conversation::new(context)),
            gateway,
            flights,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Conversation> {
        lock(&self.conversation)
    }

    /// Copy of the current log, state and persona
    pub fn snapshot(&self) -> Conversation {
        self.lock().clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages().to_vec()
    }

    pub fn state(&self) -> ChatState {
        self.lock().state().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().state().is_pending()
    }

    /// Send user text; blank text is ignored
    pub async fn send(&self, text: &str) -> Result<TurnOutcome, TransitionError> {
        let timestamp = self.next_timestamp();
        self.run_turn(Event::user_message(text, timestamp)).await
    }

    /// Replay the last failed message
    pub async fn retry(&self) -> Result<TurnOutcome, TransitionError> {
        self.run_turn(Event::Retry).await
    }

    pub fn dismiss_error(&self) -> Result<(), TransitionError> {
        self.lock().handle(Event::DismissError).map(|_| ())
    }

    /// Start a new chat with the same persona
    pub fn reset(&self) -> Result<(), TransitionError> {
        self.lock().handle(Event::Reset).map(|_| ())
    }

    pub fn set_system_prompt(&self, prompt: impl Into<String>) {
        self.lock().context_mut().system_prompt = prompt.into();
    }

    pub fn set_persona(&self, name: Option<String>, age: Option<String>) {
        let mut conv = self.lock();
        let context = conv.context_mut();
        context.name = name;
        context.age = age;
    }

    /// Adopt a suggested persona with a freshly drawn name and age
    pub fn apply_preset<R: Rng + ?Sized>(&self, preset: &PersonaPreset, rng: &mut R) {
        let choice = preset.pick(rng);
        let mut conv = self.lock();
        let context = conv.context_mut();
        context.system_prompt = choice.system_prompt;
        context.name = Some(choice.name);
        context.age = Some(choice.age);
    }

    /// Wall clock in ms, bumped past every timestamp already in the log so
    /// rollback identity stays unique
    fn next_timestamp(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let conv = self.lock();
        let latest = conv
            .messages()
            .iter()
            .filter_map(|m| m.timestamp)
            .chain(conv.state().failed_message().and_then(|m| m.timestamp))
            .max();
        match latest {
            Some(ts) if ts >= now => ts + 1,
            _ => now,
        }
    }

    async fn run_turn(&self, event: Event) -> Result<TurnOutcome, TransitionError> {
        let conversation_id = self.lock().context().conversation_id.clone();
        let Some(_flight) = self.flights.try_acquire(conversation_id.clone()) else {
            tracing::debug!(conv_id = %conversation_id, "Turn rejected, request in flight");
            return Err(TransitionError::RequestInFlight);
        };

        let effects = self.lock().handle(event)?;
        let Some(request) = take_request(effects) else {
            return Ok(TurnOutcome::Ignored);
        };
        // Declared after `_flight` so a cancelled turn rolls back before the
        // key is released
        let mut in_flight = InFlightTurn::arm(&self.conversation, &conversation_id);

        tracing::info!(
            conv_id = %conversation_id,
            history = request.history.len(),
            "Sending chat turn"
        );

        let outcome = match self.gateway.chat(&request).await {
            Ok(response) => Event::GatewayReply { response },
            Err(e) => Event::failure(e.message, e.kind),
        };

        let mut conv = self.lock();
        in_flight.disarm();
        for effect in conv.handle(outcome)? {
            if let Effect::NotifyError { message } = effect {
                tracing::warn!(conv_id = %conversation_id, error = %message, "Chat turn failed");
            }
        }

        Ok(match conv.state() {
            ChatState::Error {
                message,
                reason,
                error_kind,
            } => TurnOutcome::RolledBack {
                failed: message.clone(),
                reason: reason.clone(),
                error_kind: *error_kind,
            },
            ChatState::Idle | ChatState::Pending { .. } => match conv.messages().last() {
                Some(reply) => TurnOutcome::Committed {
                    reply: reply.clone(),
                },
                None => TurnOutcome::Ignored,
            },
        })
    }
}

fn lock(conversation: &Mutex<Conversation>) -> MutexGuard<'_, Conversation> {
    conversation.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Rolls the turn back if the caller drops it before the gateway answers
/// (timeout, `select!`, aborted task), so the conversation can't stay Pending
struct InFlightTurn<'a> {
    conversation: &'a Mutex<Conversation>,
    conversation_id: &'a str,
    armed: bool,
}

impl<'a> InFlightTurn<'a> {
    fn arm(conversation: &'a Mutex<Conversation>, conversation_id: &'a str) -> Self {
        Self {
            conversation,
            conversation_id,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightTurn<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut conv = lock(self.conversation);
        if !conv.state().is_pending() {
            return;
        }
        tracing::warn!(conv_id = %self.conversation_id, "Chat turn cancelled before a reply");
        if let Err(e) = conv.handle(Event::failure(CANCELLED, ErrorKind::Network)) {
            tracing::error!(
                conv_id = %self.conversation_id,
                error = %e,
                "Failed to roll back cancelled turn"
            );
        }
    }
}

fn take_request(effects: Vec<Effect>) -> Option<ChatRequest> {
    effects.into_iter().find_map(|e| match e {
        Effect::RequestCompletion { request } => Some(request),
        _ => None,
    })
}
