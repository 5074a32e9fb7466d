//! Observability subsystem for syncguard
//!
//! Structured JSON logging of pipeline events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on the write decision
//! 3. No background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use syncguard::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::TypeResolved, &[("doc_type", "book")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a pipeline event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a pipeline event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
