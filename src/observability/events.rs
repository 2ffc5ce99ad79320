//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events in the record lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Constructor inputs merged into a record
    RecordLoaded,
    /// A record passed schema validation
    RecordValidated,
    /// A record failed schema validation
    RecordValidationFailed,
    /// A record type was built
    RecordTypeDefined,
    /// A batch of declarations defined in a registry
    DeclarationsDefined,
}

impl Event {
    /// Returns the event name as logged
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RecordLoaded => "RECORD_LOADED",
            Event::RecordValidated => "RECORD_VALIDATED",
            Event::RecordValidationFailed => "RECORD_VALIDATION_FAILED",
            Event::RecordTypeDefined => "RECORD_TYPE_DEFINED",
            Event::DeclarationsDefined => "DECLARATIONS_DEFINED",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::RecordLoaded | Event::RecordValidated | Event::RecordTypeDefined => {
                Severity::Trace
            }
            Event::RecordValidationFailed => Severity::Warn,
            Event::DeclarationsDefined => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
