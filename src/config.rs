//! Server configuration from the environment

use crate::llm::LlmConfig;

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub llm: LlmConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = parse_port(std::env::var("PORT").ok().as_deref());
        Self {
            port,
            llm: LlmConfig::from_env(port),
        }
    }
}

fn parse_port(raw: Option<&str>) -> u16 {
    raw.and_then(|p| p.trim().parse().ok())
        .unwrap_or(DEFAULT_PORT)
}
