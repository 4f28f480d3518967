//! # Explanation Resolver
//!
//! Turns a North decision into text for the end user. Two tiers:
//!
//! 1. **Model**: only when an agent is configured. Any failure (timeout, API
//!    error, blank text) is absorbed into a [`ModelUnavailableError`].
//! 2. **Deterministic**: [`format_explanation`], always available.
//!
//! [`explain`] never fails and always yields non-empty text. The choice
//! between tiers is made by the pure [`select`] function.

mod fallback;
mod prompt;

pub use fallback::{format_explanation, ABSENT, MITIGATION_CHECKLIST};
pub use prompt::{build_prompt, GOVERNANCE_INSTRUCTIONS};

use crate::agent::{AgentHandle, ModelUnavailableError};
use crate::north::{Change, Decision};

/// What happened in the model tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOutcome {
    /// No agent configured; the tier was not attempted
    NotConfigured,
    /// The agent returned text (possibly blank)
    Completed(String),
    /// The agent call failed
    Failed(ModelUnavailableError),
}

/// The explanation handed back to the caller, tagged by origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Explanation {
    Model(String),
    Deterministic(String),
}

impl Explanation {
    pub fn text(&self) -> &str {
        match self {
            Explanation::Model(text) | Explanation::Deterministic(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Explanation::Model(text) | Explanation::Deterministic(text) => text,
        }
    }

    pub fn is_model(&self) -> bool {
        matches!(self, Explanation::Model(_))
    }

    /// Short label for logs
    pub fn source(&self) -> &'static str {
        match self {
            Explanation::Model(_) => "model",
            Explanation::Deterministic(_) => "deterministic",
        }
    }
}

/// Result of resolving an explanation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub explanation: Explanation,
    /// Set only when the model tier was attempted and failed
    pub model_error: Option<ModelUnavailableError>,
}

impl Resolution {
    pub fn text(&self) -> &str {
        self.explanation.text()
    }
}

/// Pick the explanation for `decision` given the model tier's outcome.
pub fn select(outcome: ModelOutcome, decision: &Decision) -> Resolution {
    match outcome {
        ModelOutcome::Completed(text) if !text.trim().is_empty() => Resolution {
            explanation: Explanation::Model(text),
            model_error: None,
        },
        ModelOutcome::Completed(_) => Resolution {
            explanation: Explanation::Deterministic(format_explanation(decision)),
            model_error: Some(ModelUnavailableError::EmptyResponse),
        },
        ModelOutcome::Failed(err) => Resolution {
            explanation: Explanation::Deterministic(format_explanation(decision)),
            model_error: Some(err),
        },
        ModelOutcome::NotConfigured => Resolution {
            explanation: Explanation::Deterministic(format_explanation(decision)),
            model_error: None,
        },
    }
}

/// Run the model tier (if configured) and resolve the explanation.
pub async fn explain(
    agent: Option<&AgentHandle>,
    decision: &Decision,
    change: &Change,
) -> Resolution {
    let outcome = match agent {
        None => ModelOutcome::NotConfigured,
        Some(agent) => match agent.run(&build_prompt(decision, change)).await {
            Ok(text) => ModelOutcome::Completed(text),
            Err(err) => ModelOutcome::Failed(err),
        },
    };

    select(outcome, decision)
}
