//! Per-pass validation state

use std::collections::HashMap;

use serde_json::Value;

/// Which document-wide attachment rules an attachmentReference overrides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachmentOverrides {
    pub extensions: bool,
    pub content_types: bool,
    pub maximum_size: bool,
}

impl AttachmentOverrides {
    fn merge(self, other: AttachmentOverrides) -> Self {
        Self {
            extensions: self.extensions || other.extensions,
            content_types: self.content_types || other.content_types,
            maximum_size: self.maximum_size || other.maximum_size,
        }
    }
}

/// Accumulates failures for one document.
///
/// Nothing short-circuits: every violation found is recorded in the order it
/// was encountered.
#[derive(Debug)]
pub struct ValidationContext<'v> {
    doc: &'v Value,
    old_doc: Option<&'v Value>,
    errors: Vec<String>,
    references: HashMap<String, AttachmentOverrides>,
}

impl<'v> ValidationContext<'v> {
    /// `old_doc` must already be the effective old document
    pub fn new(doc: &'v Value, old_doc: Option<&'v Value>) -> Self {
        Self {
            doc,
            old_doc,
            errors: Vec::new(),
            references: HashMap::new(),
        }
    }

    pub fn doc(&self) -> &'v Value {
        self.doc
    }

    pub fn old_doc(&self) -> Option<&'v Value> {
        self.old_doc
    }

    pub fn push(&mut self, message: String) {
        self.errors.push(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = String>) {
        self.errors.extend(messages);
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// Note that an attachmentReference property names `attachment`
    pub fn record_reference(&mut self, attachment: &str, overrides: AttachmentOverrides) {
        let merged = self
            .references
            .get(attachment)
            .map_or(overrides, |existing| existing.merge(overrides));
        self.references.insert(attachment.to_string(), merged);
    }

    /// Overrides recorded for an attachment, if any property references it
    pub fn reference(&self, attachment: &str) -> Option<AttachmentOverrides> {
        self.references.get(attachment).copied()
    }
}
