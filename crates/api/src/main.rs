mod config;
mod metrics;
mod routes;

use anyhow::{Context, Result};
use evidence::{DuckDuckGoSearch, TrustFilter};
use extract::GeminiClient;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use verify::VerificationPipeline;

use config::{AppConfig, LogFormat};
use metrics::Metrics;
use routes::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    // Initialize tracing
    init_tracing(config.log_format);

    config.validate()?;

    let reasoner = GeminiClient::new(
        config.reasoning.base_url.clone(),
        config.reasoning.model.clone(),
        config.reasoning.api_key.clone(),
        config.reasoning.timeout(),
    )?;

    let search = DuckDuckGoSearch::new(config.search.timeout(), config.search.user_agent.clone())?;

    let trust = TrustFilter::with_extra(&config.blocked_domains);
    tracing::info!(
        blocked_domains = trust.blocked_domains().count(),
        model = %reasoner.model(),
        "pipeline configured"
    );

    let pipeline = VerificationPipeline::new(Arc::new(reasoner), Arc::new(search), Arc::new(trust));

    let state = Arc::new(AppState {
        pipeline,
        metrics: Metrics::new(),
    });

    // Build router
    let app = routes::build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;

    tracing::info!("Server listening on http://{}", config.server.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
