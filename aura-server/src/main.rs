//! aura-server service entry point.

use anyhow::{Context, Result};
use aura_analysis::{OpenAIProvider, SentimentAnalyzer};
use aura_common::config::Config;
use aura_common::logging::init_logging;
use aura_server::{build_router, cors_layer, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let startup_start = std::time::Instant::now();

    let config = Config::load_with_env()?;
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    tracing::info!("Sentiment Aura v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e).context("Configuration validation failed");
    }

    let api_key = config.llm.api_key().unwrap_or_default();
    let provider = Arc::new(OpenAIProvider::with_base_url(api_key, &config.llm.base_url));
    let analyzer = Arc::new(SentimentAnalyzer::from_config(provider, &config));

    tracing::info!(
        model = %config.llm.model,
        timeout_secs = config.llm.timeout_secs,
        max_attempts = analyzer.policy().max_attempts,
        "Analyzer ready"
    );

    let state = AppState::new(analyzer, &config);
    let app = build_router(state).layer(cors_layer(&config.cors.origins));

    let addr = config.server.bind_address();

    let startup_duration = startup_start.elapsed();
    tracing::info!(
        duration_ms = startup_duration.as_millis() as u64,
        "Service initialized in {:?}",
        startup_duration
    );

    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
