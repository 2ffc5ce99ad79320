//! Observability for record construction and validation
//!
//! - Structured logging (JSON lines through the `log` facade)
//! - Typed lifecycle events
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on construction or validation
//! 3. Deterministic output
//!
//! # Usage
//!
//! ```
//! use dynrecord::observability::{log_event_with_fields, Event, Logger, Severity};
//!
//! log_event_with_fields(Event::RecordValidated, &[("record_type", "Point")]);
//!
//! let line = Logger::render(Severity::Info, "DECLARATIONS_DEFINED", &[("count", "3")]);
//! assert_eq!(line, r#"{"event":"DECLARATIONS_DEFINED","severity":"INFO","count":"3"}"#);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity, LOG_TARGET};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
