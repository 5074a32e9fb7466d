//! Validation message formatter
//!
//! Every data-validation failure is rendered here, so that callers and tests
//! agree on the exact wording.

use std::fmt::Display;

use regex::Regex;
use serde_json::Value;

/// Render a schema value the way it appears inside messages.
///
/// Strings are shown bare, everything else as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn join_values(values: &[Value]) -> String {
    values.iter().map(display_value).collect::<Vec<_>>().join(",")
}

pub fn required_value(path: &str) -> String {
    format!("required item \"{}\" is missing", path)
}

/// `expected` reads as a noun phrase: "a string", "an integer", ...
pub fn type_constraint(path: &str, expected: &str) -> String {
    format!("item \"{}\" must be {}", path, expected)
}

pub fn date_format_invalid(path: &str) -> String {
    format!(
        "item \"{}\" must be an ISO 8601 date string with no time or time zone components",
        path
    )
}

pub fn datetime_format_invalid(path: &str) -> String {
    format!(
        "item \"{}\" must be an ISO 8601 date string with optional time and time zone components",
        path
    )
}

pub fn time_format_invalid(path: &str) -> String {
    format!(
        "item \"{}\" must be an ISO 8601 time string with no date or time zone components",
        path
    )
}

pub fn timezone_format_invalid(path: &str) -> String {
    format!("item \"{}\" must be an ISO 8601 time zone string", path)
}

pub fn uuid_format_invalid(path: &str) -> String {
    format!("item \"{}\" must be a UUID string", path)
}

pub fn enum_predefined_value(path: &str, predefined: &[Value]) -> String {
    format!(
        "item \"{}\" must be one of the predefined values: {}",
        path,
        join_values(predefined)
    )
}

pub fn regex_pattern(path: &str, pattern: &Regex) -> String {
    format!("item \"{}\" must conform to expected format /{}/", path, pattern.as_str())
}

pub fn must_not_be_empty(path: &str) -> String {
    format!("item \"{}\" must not be empty", path)
}

pub fn minimum_value(path: &str, bound: &Value) -> String {
    format!("item \"{}\" must not be less than {}", path, display_value(bound))
}

pub fn minimum_value_exclusive(path: &str, bound: &Value) -> String {
    format!("item \"{}\" must be greater than {}", path, display_value(bound))
}

pub fn maximum_value(path: &str, bound: &Value) -> String {
    format!("item \"{}\" must not be greater than {}", path, display_value(bound))
}

pub fn maximum_value_exclusive(path: &str, bound: &Value) -> String {
    format!("item \"{}\" must be less than {}", path, display_value(bound))
}

pub fn minimum_length(path: &str, bound: usize) -> String {
    format!("length of item \"{}\" must not be less than {}", path, bound)
}

pub fn maximum_length(path: &str, bound: usize) -> String {
    format!("length of item \"{}\" must not be greater than {}", path, bound)
}

pub fn immutable_item(path: &str) -> String {
    format!("value of item \"{}\" may not be modified", path)
}

pub fn must_equal(path: &str, expected: &Value) -> String {
    format!("value of item \"{}\" must equal {}", path, expected)
}

pub fn unsupported_property(path: &str) -> String {
    format!("property \"{}\" is not supported", path)
}

pub fn hashtable_key_empty(hashtable_path: &str) -> String {
    format!("empty hashtable key in item \"{}\" is not allowed", hashtable_path)
}

pub fn hashtable_key_pattern(key_path: &str, pattern: &Regex) -> String {
    format!(
        "hashtable key \"{}\" does not conform to expected format /{}/",
        key_path,
        pattern.as_str()
    )
}

pub fn attachment_reference_extension(path: &str, supported: &[String]) -> String {
    format!(
        "attachment reference \"{}\" must have a supported file extension ({})",
        path,
        supported.join(",")
    )
}

pub fn attachment_reference_content_type(path: &str, supported: &[String]) -> String {
    format!(
        "attachment reference \"{}\" must have a supported content type ({})",
        path,
        supported.join(",")
    )
}

pub fn attachment_reference_size(path: &str, maximum: impl Display) -> String {
    format!(
        "attachment reference \"{}\" must not be larger than {} bytes",
        path, maximum
    )
}

pub fn cannot_replace_document() -> String {
    "documents of this type cannot be replaced".to_string()
}

pub fn cannot_delete_document() -> String {
    "documents of this type cannot be deleted".to_string()
}

pub fn immutable_document() -> String {
    "documents of this type cannot be replaced or deleted".to_string()
}

pub fn attachments_not_allowed() -> String {
    "document type does not support attachments".to_string()
}

pub fn maximum_attachment_count(maximum: usize) -> String {
    format!("the total number of attachments must not exceed {}", maximum)
}

pub fn maximum_individual_attachment_size(name: &str, maximum: u64) -> String {
    format!("attachment {} must not exceed {} bytes", name, maximum)
}

pub fn maximum_total_attachment_size(maximum: u64) -> String {
    format!("the total size of all attachments must not exceed {} bytes", maximum)
}

pub fn attachment_extension(name: &str, supported: &[String]) -> String {
    format!(
        "attachment {} must have a supported file extension ({})",
        name,
        supported.join(",")
    )
}

pub fn attachment_content_type(name: &str, supported: &[String]) -> String {
    format!(
        "attachment {} must have a supported content type ({})",
        name,
        supported.join(",")
    )
}

pub fn attachment_reference_required(name: &str) -> String {
    format!(
        "attachment {} must have a corresponding attachment reference property",
        name
    )
}
