//! Observability HTTP Routes
//!
//! Health check and service counters.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::observability::MetricsRegistry;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check route at root level
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

/// Counters at `/metrics`
pub fn observability_routes(metrics: Arc<MetricsRegistry>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

async fn metrics_handler(State(metrics): State<Arc<MetricsRegistry>>) -> impl IntoResponse {
    (StatusCode::OK, Json(metrics.snapshot()))
}
