//! Persona Chat server
//!
//! Serves the stateless completion gateway on `POST /api/chat`.

use persona_chat::api::{create_router, AppState};
use persona_chat::config::AppConfig;
use persona_chat::gateway::CompletionGateway;
use persona_chat::llm::{LoggingService, OpenAIService};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "persona_chat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = AppConfig::from_env();

    if config.llm.api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY is not set. Chat requests will fail to authenticate.");
    }

    let provider = OpenAIService::new(&config.llm)?;
    let llm = Arc::new(LoggingService::new(Arc::new(provider)));
    tracing::info!(
        model = %config.llm.model,
        base_url = %config.llm.base_url,
        timeout_secs = config.llm.timeout.as_secs(),
        "Completion provider configured"
    );

    let state = AppState::new(CompletionGateway::new(llm));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Persona Chat server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
