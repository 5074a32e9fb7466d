//! # Sync Errors
//!
//! Every way a write can be refused. All variants except `Configuration`
//! are "forbidden" outcomes: the write is rejected and the caller told why.
//! `Configuration` means the schema itself is broken.

use thiserror::Error;

use super::actions::LifecycleEvent;
use crate::access::AccessError;
use crate::schema::SchemaError;

/// Result type for pipeline operations
pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// No document definition matched a non-delete write
    #[error("Unknown document type")]
    UnknownDocumentType,

    /// The host refused the caller
    #[error("{0}")]
    AuthorizationDenied(#[from] AccessError),

    /// Every data-validation failure for the document
    #[error("Invalid {doc_type} document: {}", .errors.join("; "))]
    ValidationFailed {
        doc_type: String,
        errors: Vec<String>,
    },

    /// The schema is misconfigured
    #[error("{0}")]
    Configuration(#[from] SchemaError),

    /// A custom action refused the write
    #[error("{message}")]
    ActionRejected {
        event: LifecycleEvent,
        message: String,
    },
}

impl SyncError {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SyncError::UnknownDocumentType => "SYNC_UNKNOWN_DOCUMENT_TYPE",
            SyncError::AuthorizationDenied(e) => e.code(),
            SyncError::ValidationFailed { .. } => "SYNC_VALIDATION_FAILED",
            SyncError::Configuration(e) => e.code().code(),
            SyncError::ActionRejected { .. } => "SYNC_ACTION_REJECTED",
        }
    }

    /// Whether the write was refused, as opposed to the schema failing
    pub fn is_forbidden(&self) -> bool {
        !matches!(self, SyncError::Configuration(_))
    }

    /// The collected messages of a validation failure
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            SyncError::ValidationFailed { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failed_joins_messages() {
        let err = SyncError::ValidationFailed {
            doc_type: "book".into(),
            errors: vec!["first".into(), "second".into()],
        };
        assert_eq!(err.to_string(), "Invalid book document: first; second");
        assert_eq!(err.validation_errors().map(<[String]>::len), Some(2));
        assert!(err.is_forbidden());
    }

    #[test]
    fn test_access_error_converts() {
        let err: SyncError = AccessError::MissingRole.into();
        assert_eq!(err.to_string(), "missing role");
        assert_eq!(err.code(), "SYNC_ACCESS_MISSING_ROLE");
    }

    #[test]
    fn test_configuration_is_not_forbidden() {
        let err: SyncError = SchemaError::missing_predefined_values("status").into();
        assert!(!err.is_forbidden());
        assert_eq!(err.code(), "SYNC_SCHEMA_MISCONFIGURED");
    }

    #[test]
    fn test_unknown_type_message() {
        assert_eq!(SyncError::UnknownDocumentType.to_string(), "Unknown document type");
    }
}
