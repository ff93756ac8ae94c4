//! Observability subsystem
//!
//! - Structured logging (JSON)
//! - Deterministic metrics
//! - Lifecycle event tracing
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on request handling
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use herokusql::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! // Log an event
//! log_event_with_fields(Event::ProvisionComplete, &[("instance", "app123")]);
//!
//! // Track metrics
//! let metrics = MetricsRegistry::new();
//! metrics.increment_provisions_completed();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event at its default severity
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
///
/// ERROR-level events go to stderr, everything else to stdout.
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = event.severity();
    if severity >= Severity::Error {
        Logger::log_stderr(severity, event.as_str(), fields);
    } else {
        Logger::log(severity, event.as_str(), fields);
    }
}
