//! Provider configuration

use std::time::Duration;

/// `OpenRouter` speaks the `OpenAI` chat completions dialect
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

pub const DEFAULT_MODEL: &str = "cognitivecomputations/dolphin-mistral-24b-venice-edition:free";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const APP_TITLE: &str = "Persona Chat";

/// Configuration for the completion provider
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    /// Sent as `HTTP-Referer` so the provider can attribute traffic
    pub referer: String,
    pub title: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            referer: "http://localhost:5000".to_string(),
            title: APP_TITLE.to_string(),
        }
    }
}

impl LlmConfig {
    pub fn from_env(port: u16) -> Self {
        let defaults = Self::default();

        let timeout = std::env::var("PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(defaults.timeout, Duration::from_secs);

        let referer = std::env::var("REPLIT_DOMAINS")
            .ok()
            .as_deref()
            .and_then(referer_from_domains)
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        Self {
            api_key: std::env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("OPENROUTER_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("CHAT_MODEL").unwrap_or(defaults.model),
            timeout,
            referer,
            title: defaults.title,
        }
    }
}

/// First entry of a comma-separated domain list, as an https origin
fn referer_from_domains(domains: &str) -> Option<String> {
    domains
        .split(',')
        .map(str::trim)
        .find(|d| !d.is_empty())
        .map(|d| format!("https://{d}"))
}
