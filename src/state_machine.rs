//! Client-side conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! events go in, a new state and a list of effects come out. The caller
//! applies the effects (log edits, the outbound request) afterwards.

mod conversation;
mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use conversation::Conversation;
pub use effect::Effect;
pub use event::Event;
pub use state::{ChatContext, ChatState, ErrorKind};
pub use transition::{transition, TransitionError, TransitionResult};
