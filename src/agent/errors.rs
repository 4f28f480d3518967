//! # Model Errors

use thiserror::Error;

/// Result type for model calls
pub type ModelResult<T> = Result<T, ModelUnavailableError>;

/// The model tier could not produce usable text.
///
/// Never surfaced as a request failure; the resolver falls back to the
/// deterministic explanation and reports the message as `llmError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelUnavailableError {
    #[error("model call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("model transport error: {0}")]
    Transport(String),

    #[error("model API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected model response: {0}")]
    InvalidResponse(String),

    #[error("model returned an empty response")]
    EmptyResponse,
}
