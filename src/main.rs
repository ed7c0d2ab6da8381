//! Aarogya - patient-facing chat assistant backend
//!
//! Serves an in-memory chat store over HTTP and relays each user message
//! to the Gemini API through a single shared conversation.

mod api;
mod chat;
mod gateway;
mod llm;
mod surface;

use api::{create_router, AppState};
use gateway::AiGateway;
use llm::LlmConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use surface::ChatSurface;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aarogya=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let port: u16 = std::env::var("AAROGYA_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5001);

    let llm_config = LlmConfig::from_env();
    if llm_config.api_key().is_some() {
        tracing::info!(
            model = %llm_config.model,
            gateway = ?llm_config.gateway,
            timeout_secs = llm_config.timeout.as_secs(),
            "AI provider configured"
        );
    } else {
        tracing::warn!("GEMINI_API_KEY is not set; chat replies will report a configuration error");
    }

    let model = llm_config.model.clone();
    let gateway = Arc::new(AiGateway::from_config(llm_config));
    let state = AppState::new(ChatSurface::new(gateway), &model);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new().gzip(true).br(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Aarogya server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
