//! Schema error types
//!
//! Error codes:
//! - SYNC_SCHEMA_MALFORMED (FATAL)
//! - SYNC_SCHEMA_UNKNOWN_TYPE (FATAL)
//! - SYNC_SCHEMA_DUPLICATE_TYPE (FATAL)
//! - SYNC_SCHEMA_MISCONFIGURED (FATAL)
//!
//! Schema errors describe authoring mistakes, never bad document data. They
//! are raised immediately and are not collected with validation failures.

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Request rejected, schema still usable
    Reject,
    /// Schema cannot be used until it is fixed
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema source could not be read or parsed
    SyncSchemaMalformed,
    /// A validator names a type that does not exist
    SyncSchemaUnknownType,
    /// Two document definitions share a type id
    SyncSchemaDuplicateType,
    /// A validator is structurally incomplete (found while validating)
    SyncSchemaMisconfigured,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SyncSchemaMalformed => "SYNC_SCHEMA_MALFORMED",
            SchemaErrorCode::SyncSchemaUnknownType => "SYNC_SCHEMA_UNKNOWN_TYPE",
            SchemaErrorCode::SyncSchemaDuplicateType => "SYNC_SCHEMA_DUPLICATE_TYPE",
            SchemaErrorCode::SyncSchemaMisconfigured => "SYNC_SCHEMA_MISCONFIGURED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    /// Document type id if applicable
    type_id: Option<String>,
    /// Path of the offending validator if applicable
    item_path: Option<String>,
}

impl SchemaError {
    /// Create an error for an unreadable or unparseable schema source
    pub fn malformed_schema(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::SyncSchemaMalformed,
            message: format!("Malformed schema '{}': {}", source.into(), reason.into()),
            type_id: None,
            item_path: None,
        }
    }

    /// Create an error for a validator whose type name is not recognized
    pub fn unknown_validator_type(
        type_id: impl Into<String>,
        item_path: impl Into<String>,
        type_name: &str,
    ) -> Self {
        let path = item_path.into();
        Self {
            code: SchemaErrorCode::SyncSchemaUnknownType,
            message: format!(
                "No data type defined for validator of item \"{}\" (got '{}')",
                path, type_name
            ),
            type_id: Some(type_id.into()),
            item_path: Some(path),
        }
    }

    /// Create an error for a repeated document type id
    pub fn duplicate_type(type_id: impl Into<String>) -> Self {
        let id = type_id.into();
        Self {
            code: SchemaErrorCode::SyncSchemaDuplicateType,
            message: format!("Document type '{}' is defined more than once", id),
            type_id: Some(id),
            item_path: None,
        }
    }

    /// Create an error for an enum validator without predefined values
    pub fn missing_predefined_values(item_path: impl Into<String>) -> Self {
        let path = item_path.into();
        Self {
            code: SchemaErrorCode::SyncSchemaMisconfigured,
            message: format!("Item \"{}\" is missing its predefined values", path),
            type_id: None,
            item_path: Some(path),
        }
    }

    /// Create an error for a range bound that cannot be compared
    pub fn invalid_bound(item_path: impl Into<String>, bound: impl fmt::Display) -> Self {
        let path = item_path.into();
        Self {
            code: SchemaErrorCode::SyncSchemaMisconfigured,
            message: format!("Item \"{}\" has an incomparable range bound {}", path, bound),
            type_id: None,
            item_path: Some(path),
        }
    }

    /// Attach the document type id the error was raised under
    pub fn for_type(mut self, type_id: impl Into<String>) -> Self {
        self.type_id = Some(type_id.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the document type id if applicable
    pub fn type_id(&self) -> Option<&str> {
        self.type_id.as_deref()
    }

    /// Returns the validator path if applicable
    pub fn item_path(&self) -> Option<&str> {
        self.item_path.as_deref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
