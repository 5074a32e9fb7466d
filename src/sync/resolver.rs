//! Type resolver

use serde_json::Value;

use crate::schema::{effective_old_doc, is_deleted, DocumentDefinition, DocumentSchema};

/// First definition, in declaration order, whose filter matches the write.
///
/// A delete with no live stored revision never resolves: there is nothing
/// left to identify it by.
pub fn resolve_type<'s>(
    schema: &'s DocumentSchema,
    doc: &Value,
    old_doc: Option<&Value>,
) -> Option<&'s DocumentDefinition> {
    let old_doc = effective_old_doc(old_doc);
    if is_deleted(doc) && old_doc.is_none() {
        return None;
    }

    schema
        .definitions()
        .iter()
        .find(|d| d.type_filter.matches(doc, old_doc, &d.type_id))
}
