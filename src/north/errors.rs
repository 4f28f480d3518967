//! # Evaluation Errors

use thiserror::Error;

/// Result type for North evaluation
pub type EvaluationResult<T> = Result<T, RemoteEvaluationError>;

/// The call to the North evaluator did not produce a decision.
///
/// Always fatal for the request: no decision means no explanation.
#[derive(Debug, Clone, Error)]
pub enum RemoteEvaluationError {
    #[error("request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("North returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid decision body: {0}")]
    InvalidBody(String),
}

impl RemoteEvaluationError {
    /// HTTP status reported to our own caller
    pub fn status_code(&self) -> u16 {
        502
    }

    /// Caller-facing detail string
    pub fn detail(&self) -> String {
        format!("Erro chamando EvaluateNorth: {}", self)
    }
}
