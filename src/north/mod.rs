//! # North Decision Fetcher
//!
//! Forwards a change to the North policy evaluator and returns its decision
//! verbatim. This crate never interprets the decision beyond the fields the
//! explanation formatter reads.
//!
//! Failure here is fatal for the request (see [`RemoteEvaluationError`]).

mod client;
mod decision;
mod errors;

pub use client::NorthClient;
pub use decision::{Change, Decision, PolicyOutcome, PolicyView};
pub use errors::{EvaluationResult, RemoteEvaluationError};

use async_trait::async_trait;

/// Source of authoritative decisions for a change
#[async_trait]
pub trait DecisionSource: Send + Sync {
    /// Evaluate `change` with a single attempt.
    async fn evaluate(&self, change: &Change) -> EvaluationResult<Decision>;
}
