//! Explicit conversation state object
//!
//! Holds the visible log, the turn state and the persona context. Events go
//! through [`transition`]; log edits are applied here and the remaining
//! effects are handed back for the caller to execute.

use super::{transition, ChatContext, ChatState, Effect, Event, TransitionError};
use crate::api::Message;

#[derive(Debug, Clone)]
pub struct Conversation {
    context: ChatContext,
    state: ChatState,
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(context: ChatContext) -> Self {
        Self {
            context,
            state: ChatState::Idle,
            messages: Vec::new(),
        }
    }

    pub fn context(&self) -> &ChatContext {
        &self.context
    }

    /// Persona settings apply from the next turn on
    pub fn context_mut(&mut self) -> &mut ChatContext {
        &mut self.context
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Run one event through the state machine.
    ///
    /// Returns the effects that need I/O; log edits are already applied.
    /// On error nothing changes.
    pub fn handle(&mut self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        let result = transition(&self.state, &self.messages, &self.context, event)?;
        self.state = result.new_state;

        let mut outward = Vec::new();
        for effect in result.effects {
            if effect.is_log_edit() {
                self.apply_log_edit(effect);
            } else {
                outward.push(effect);
            }
        }
        Ok(outward)
    }

    fn apply_log_edit(&mut self, effect: Effect) {
        match effect {
            Effect::AppendMessage { message } => self.messages.push(message),
            Effect::RemoveMessage { role, timestamp } => {
                self.messages.retain(|m| !m.is(role, timestamp));
            }
            Effect::ClearLog => self.messages.clear(),
            Effect::RequestCompletion { .. } | Effect::NotifyError { .. } => {
                tracing::warn!(?effect, "Not a log edit");
            }
        }
    }
}
