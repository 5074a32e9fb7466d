//! Immutability comparator
//!
//! Deep structural equality between a new and an old value. `None` stands
//! for an absent item. In loose mode absent and null are the same thing; in
//! strict mode they differ. Array order matters, object key order does not.

use serde_json::{Map, Number, Value};

use super::formats::StringFormat;
use crate::schema::REVISION_PROPERTIES;

/// Compare two items.
///
/// `format` canonicalizes top-level strings (dates, UUIDs, ...); nested
/// values are compared structurally.
pub fn items_equal(
    new: Option<&Value>,
    old: Option<&Value>,
    strict: bool,
    format: Option<StringFormat>,
) -> bool {
    let (new, old) = if strict {
        (new, old)
    } else {
        (loosen(new), loosen(old))
    };

    match (new, old) {
        (None, None) => true,
        (Some(a), Some(b)) => present_equal(a, b, strict, format),
        _ => false,
    }
}

/// Structural equality without any string canonicalization
pub fn values_equal(new: Option<&Value>, old: Option<&Value>, strict: bool) -> bool {
    items_equal(new, old, strict, None)
}

/// Whole-document equality for replacement checks.
///
/// Revision bookkeeping (`_rev`, `_revisions`) is ignored; `_attachments`
/// is compared like any other hashtable.
pub fn documents_equal(new: &Value, old: &Value) -> bool {
    match (new.as_object(), old.as_object()) {
        (Some(a), Some(b)) => a
            .keys()
            .chain(b.keys())
            .filter(|key| !REVISION_PROPERTIES.contains(&key.as_str()))
            .all(|key| items_equal(a.get(key), b.get(key), false, None)),
        _ => values_equal(Some(new), Some(old), false),
    }
}

fn loosen(value: Option<&Value>) -> Option<&Value> {
    match value {
        Some(Value::Null) => None,
        other => other,
    }
}

fn present_equal(a: &Value, b: &Value, strict: bool, format: Option<StringFormat>) -> bool {
    match (a, b) {
        (Value::String(x), Value::String(y)) => match format {
            Some(format) => format.canonical_eq(x, y),
            None => x == y,
        },
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .zip(y)
                    .all(|(a, b)| items_equal(Some(a), Some(b), strict, None))
        }
        (Value::Object(x), Value::Object(y)) => objects_equal(x, y, strict),
        _ => a == b,
    }
}

fn objects_equal(a: &Map<String, Value>, b: &Map<String, Value>, strict: bool) -> bool {
    if strict && a.len() != b.len() {
        return false;
    }
    a.keys()
        .chain(b.keys())
        .all(|key| items_equal(a.get(key), b.get(key), strict, None))
}

/// Numeric equality across integer and float representations (1 == 1.0)
pub fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
