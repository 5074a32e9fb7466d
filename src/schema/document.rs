//! Document shape helpers
//!
//! Documents are JSON objects. Keys starting with an underscore in
//! [`RESERVED_PROPERTIES`] belong to the store, everything else is defined by
//! the schema.

use serde_json::{Map, Value};

/// Store-owned keys that are never reported as unsupported at the root
pub const RESERVED_PROPERTIES: [&str; 5] = ["_id", "_rev", "_deleted", "_revisions", "_attachments"];

/// Keys ignored when deciding whether a replacement changed anything
pub const REVISION_PROPERTIES: [&str; 2] = ["_rev", "_revisions"];

/// Returns true if the key is store-owned
pub fn is_reserved(key: &str) -> bool {
    RESERVED_PROPERTIES.contains(&key)
}

/// Returns true if the document is a deletion tombstone
pub fn is_deleted(doc: &Value) -> bool {
    doc.get("_deleted").and_then(Value::as_bool).unwrap_or(false)
}

/// Absent, null, or a tombstone
pub fn is_missing_or_deleted(doc: Option<&Value>) -> bool {
    match doc {
        None | Some(Value::Null) => true,
        Some(doc) => is_deleted(doc),
    }
}

/// The old revision as seen by filters and validators: `None` when it does
/// not exist or was itself deleted
pub fn effective_old_doc(old_doc: Option<&Value>) -> Option<&Value> {
    if is_missing_or_deleted(old_doc) {
        None
    } else {
        old_doc
    }
}

/// The document id, if it has a string one
pub fn doc_id(doc: &Value) -> Option<&str> {
    doc.get("_id").and_then(Value::as_str)
}

/// The attachment collection, if present
pub fn attachments(doc: &Value) -> Option<&Map<String, Value>> {
    doc.get("_attachments").and_then(Value::as_object)
}

/// Declared size of one attachment entry
pub fn attachment_length(entry: &Value) -> u64 {
    entry.get("length").and_then(Value::as_u64).unwrap_or(0)
}

/// Declared content type of one attachment entry
pub fn attachment_content_type(entry: &Value) -> Option<&str> {
    entry.get("content_type").and_then(Value::as_str)
}

/// Extension after the final dot, or the empty string
pub fn file_extension(name: &str) -> &str {
    name.rfind('.').map_or("", |dot| &name[dot + 1..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deleted_detection() {
        assert!(is_deleted(&json!({ "_deleted": true })));
        assert!(!is_deleted(&json!({ "_deleted": false })));
        assert!(!is_deleted(&json!({ "_id": "x" })));
    }

    #[test]
    fn test_effective_old_doc_drops_tombstones() {
        let tombstone = json!({ "_id": "x", "_deleted": true });
        let live = json!({ "_id": "x" });
        assert!(effective_old_doc(Some(&tombstone)).is_none());
        assert!(effective_old_doc(Some(&Value::Null)).is_none());
        assert_eq!(effective_old_doc(Some(&live)), Some(&live));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("foo.pdf"), "pdf");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("README"), "");
    }
}
