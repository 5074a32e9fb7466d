//! Observability events for syncguard
//!
//! Every step of the write pipeline that completes (or refuses a write)
//! maps to exactly one event.

use std::fmt;

use super::logger::Severity;

/// Observable events in the write pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Startup
    /// Schema file parsed and built
    SchemaLoaded,

    // Type resolution
    /// A document definition matched the write
    TypeResolved,
    /// No definition matched a non-delete write
    TypeUnresolved,
    /// A delete with no resolvable type was let through
    UnknownTypeDeleteAccepted,

    // Authorization
    AuthorizationGranted,
    AuthorizationDenied,

    // Validation
    ValidationFailed,
    ValidationPassed,

    // Assignment
    /// Channel access or role membership granted
    AccessAssigned,
    /// Channels assigned to the document
    ChannelsAssigned,

    // Failures outside the data path
    /// A custom action refused the write
    CustomActionRejected,
    /// The schema itself is broken
    ConfigurationError,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SchemaLoaded => "SCHEMA_LOADED",

            Event::TypeResolved => "TYPE_RESOLVED",
            Event::TypeUnresolved => "TYPE_UNRESOLVED",
            Event::UnknownTypeDeleteAccepted => "UNKNOWN_TYPE_DELETE_ACCEPTED",

            Event::AuthorizationGranted => "AUTHORIZATION_GRANTED",
            Event::AuthorizationDenied => "AUTHORIZATION_DENIED",

            Event::ValidationFailed => "VALIDATION_FAILED",
            Event::ValidationPassed => "VALIDATION_PASSED",

            Event::AccessAssigned => "ACCESS_ASSIGNED",
            Event::ChannelsAssigned => "CHANNELS_ASSIGNED",

            Event::CustomActionRejected => "CUSTOM_ACTION_REJECTED",
            Event::ConfigurationError => "CONFIGURATION_ERROR",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigurationError => Severity::Error,
            Event::TypeUnresolved
            | Event::AuthorizationDenied
            | Event::ValidationFailed
            | Event::CustomActionRejected => Severity::Warn,
            Event::TypeResolved | Event::AuthorizationGranted | Event::ValidationPassed => {
                Severity::Trace
            }
            _ => Severity::Info,
        }
    }

    /// Returns true if the event refuses the write
    pub fn is_rejection(&self) -> bool {
        self.severity() >= Severity::Warn
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
