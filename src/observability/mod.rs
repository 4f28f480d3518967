//! Observability for the agent service
//!
//! - Structured JSON logging (one line per event)
//! - Typed lifecycle and pipeline events
//! - Atomic counters exposed on `/metrics`
//!
//! Observability never influences the pipeline: logging failures are
//! swallowed and counters are fire-and-forget.
//!
//! ```ignore
//! use north_agent::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::RunReceived, &[("run_id", "...")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Severity an event is logged at
fn severity_for(event: Event) -> Severity {
    if event.is_failure() {
        Severity::Error
    } else if event.is_degraded() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(severity_for(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}
