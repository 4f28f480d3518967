//! Run HTTP Routes
//!
//! `POST /run`: evaluate a change with North and explain the decision.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Serialize;

use crate::orchestrator::{Orchestrator, RunRequest, RunResponse};

/// Error body: `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Create run routes
pub fn run_routes(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new()
        .route("/run", post(run_handler))
        .with_state(orchestrator)
}

async fn run_handler(
    State(orchestrator): State<Arc<Orchestrator>>,
    Json(request): Json<RunRequest>,
) -> Result<Json<RunResponse>, (StatusCode, Json<ErrorResponse>)> {
    let outcome = orchestrator.run(request.change).await.map_err(|e| {
        let status =
            StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
        (status, Json(ErrorResponse { detail: e.detail() }))
    })?;

    Ok(Json(outcome.into_response()))
}
