//! Observable events emitted by the agent service
//!
//! Events are explicit and typed; the log line carries `as_str()`.

use std::fmt;

/// Lifecycle and pipeline events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Process startup begins
    BootStart,
    /// Configuration resolved from the environment
    ConfigLoaded,
    /// Model agent constructed
    AgentConfigured,
    /// Model settings incomplete, deterministic-only mode
    AgentDisabled,
    /// HTTP listener bound
    Serving,
    /// Graceful shutdown complete
    ShutdownComplete,

    // Pipeline
    /// `/run` request accepted
    RunReceived,
    /// North returned a decision
    EvaluationComplete,
    /// North call failed; request aborted
    EvaluationFailed,
    /// Model produced the explanation
    ModelExplanation,
    /// Model tier failed; deterministic fallback used
    ModelFallback,
    /// Deterministic explanation used without attempting the model
    DeterministicExplanation,
    /// Pipeline finished with a response
    RunComplete,
}

impl Event {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "BOOT_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::AgentConfigured => "AGENT_CONFIGURED",
            Event::AgentDisabled => "AGENT_DISABLED",
            Event::Serving => "SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::RunReceived => "RUN_RECEIVED",
            Event::EvaluationComplete => "EVALUATION_COMPLETE",
            Event::EvaluationFailed => "EVALUATION_FAILED",
            Event::ModelExplanation => "MODEL_EXPLANATION",
            Event::ModelFallback => "MODEL_FALLBACK",
            Event::DeterministicExplanation => "DETERMINISTIC_EXPLANATION",
            Event::RunComplete => "RUN_COMPLETE",
        }
    }

    /// Whether the event reports a failure that aborted work
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::EvaluationFailed)
    }

    /// Whether the event reports degraded (but successful) operation
    pub fn is_degraded(&self) -> bool {
        matches!(self, Event::AgentDisabled | Event::ModelFallback)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
