use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use evidence::SearchProvider;
use extract::ReasoningService;
use judge::ClaimResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;
use verify::VerificationPipeline;

use crate::metrics::{Endpoint, Metrics, MetricsSnapshot, TimedOperation};

pub struct AppState<R, S> {
    pub pipeline: VerificationPipeline<R, S>,
    pub metrics: Arc<Metrics>,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    text: String,
    #[serde(default)]
    user_bad_domains: Vec<String>,
}

#[derive(Deserialize)]
pub struct ContextVerifyRequest {
    claim_text: String,
    page_context: String,
    #[serde(default)]
    user_bad_domains: Vec<String>,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    claims: Vec<ClaimResult>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub fn build_router<R, S>(state: Arc<AppState<R, S>>) -> Router
where
    R: ReasoningService + 'static,
    S: SearchProvider + 'static,
{
    Router::new()
        .route("/verify", post(verify_simple::<R, S>))
        .route("/verify_with_context", post(verify_with_context::<R, S>))
        .route("/health", get(health_check))
        .route("/stats", get(get_stats::<R, S>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn verify_simple<R, S>(
    State(state): State<Arc<AppState<R, S>>>,
    Json(req): Json<VerifyRequest>,
) -> Json<VerifyResponse>
where
    R: ReasoningService,
    S: SearchProvider,
{
    let span = tracing::info_span!("verify", request_id = %Uuid::new_v4(), endpoint = "/verify");

    async move {
        let timer = TimedOperation::start();
        let claims = state
            .pipeline
            .verify_simple(&req.text, &req.user_bad_domains)
            .await;

        state
            .metrics
            .record_request(Endpoint::Simple, &claims, timer.elapsed());
        tracing::info!(claims = claims.len(), elapsed_ms = timer.elapsed().as_millis() as u64, "request complete");

        Json(VerifyResponse { claims })
    }
    .instrument(span)
    .await
}

async fn verify_with_context<R, S>(
    State(state): State<Arc<AppState<R, S>>>,
    Json(req): Json<ContextVerifyRequest>,
) -> Json<VerifyResponse>
where
    R: ReasoningService,
    S: SearchProvider,
{
    let span = tracing::info_span!(
        "verify",
        request_id = %Uuid::new_v4(),
        endpoint = "/verify_with_context"
    );

    async move {
        let timer = TimedOperation::start();
        let claims = state
            .pipeline
            .verify_with_context(&req.claim_text, &req.page_context, &req.user_bad_domains)
            .await;

        state
            .metrics
            .record_request(Endpoint::Context, &claims, timer.elapsed());
        tracing::info!(claims = claims.len(), elapsed_ms = timer.elapsed().as_millis() as u64, "request complete");

        Json(VerifyResponse { claims })
    }
    .instrument(span)
    .await
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn get_stats<R, S>(State(state): State<Arc<AppState<R, S>>>) -> Json<MetricsSnapshot>
where
    R: ReasoningService,
    S: SearchProvider,
{
    Json(state.metrics.snapshot())
}
