//! Runtime for driving conversations against the gateway

mod executor;
pub mod single_flight;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{ConversationRuntime, TurnOutcome};
pub use single_flight::{FlightGuard, SingleFlight};
pub use traits::*;

use crate::client::HttpGatewayClient;

/// Runtime wired to the HTTP gateway client
pub type HttpRuntime = ConversationRuntime<HttpGatewayClient>;
