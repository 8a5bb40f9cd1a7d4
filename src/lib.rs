//! Persona Chat - persona-driven chat over an OpenAI-compatible provider
//!
//! The server side is a stateless completion gateway behind `POST /api/chat`.
//! The client side is a conversation state machine with optimistic updates,
//! rollback on failure and retry of the failed message.

pub mod api;
pub mod client;
pub mod config;
pub mod gateway;
pub mod llm;
pub mod persona;
pub mod runtime;
pub mod state_machine;
pub mod system_prompt;
