//! Service counters
//!
//! - Counters only, monotonic, reset on process start
//! - Lock-free (relaxed atomics); shared across request tasks

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for the decision/explanation pipeline
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// `/run` requests accepted
    runs_received: AtomicU64,
    /// Decisions successfully fetched from North
    decisions_fetched: AtomicU64,
    /// North calls that failed (request answered with 502)
    evaluation_failures: AtomicU64,
    /// Explanations produced by the model
    model_explanations: AtomicU64,
    /// Model attempts that failed and fell back
    model_failures: AtomicU64,
    /// Explanations produced by the deterministic formatter
    deterministic_explanations: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_runs_received(&self) {
        self.runs_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_decisions_fetched(&self) {
        self.decisions_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_evaluation_failures(&self) {
        self.evaluation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_model_explanations(&self) {
        self.model_explanations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_model_failures(&self) {
        self.model_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_deterministic_explanations(&self) {
        self.deterministic_explanations
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Get all counters as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            runs_received: self.runs_received.load(Ordering::Relaxed),
            decisions_fetched: self.decisions_fetched.load(Ordering::Relaxed),
            evaluation_failures: self.evaluation_failures.load(Ordering::Relaxed),
            model_explanations: self.model_explanations.load(Ordering::Relaxed),
            model_failures: self.model_failures.load(Ordering::Relaxed),
            deterministic_explanations: self.deterministic_explanations.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub runs_received: u64,
    pub decisions_fetched: u64,
    pub evaluation_failures: u64,
    pub model_explanations: u64,
    pub model_failures: u64,
    pub deterministic_explanations: u64,
}
