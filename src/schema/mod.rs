//! Schema subsystem for syncguard
//!
//! A schema is the ordered list of document definitions a write is checked
//! against. It is built once, from JSON or in code, and never mutated.
//!
//! # Design Principles
//!
//! - Every constraint may be static or computed from the write
//! - Validator types form a closed set
//! - Authoring mistakes are FATAL errors, never validation messages

mod constraint;
mod document;
mod errors;
mod loader;
mod types;

pub use constraint::{Constraint, DynamicFn};
pub use document::{
    attachment_content_type, attachment_length, attachments, doc_id, effective_old_doc,
    file_extension, is_deleted, is_missing_or_deleted, is_reserved, RESERVED_PROPERTIES,
    REVISION_PROPERTIES,
};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use loader::SchemaLoader;
pub use types::{
    AccessAssignment, AttachmentConstraints, AttachmentReferenceRules, AuthorizationMap,
    CustomValidation, CustomValidationFn, DocumentDefinition, DocumentSchema,
    HashtableKeyValidator, Operation, PropertyValidator, TypeFilter, TypeFilterFn, ValidatorKind,
};
