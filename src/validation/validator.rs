//! Recursive document validator
//!
//! Walks a document alongside its validator tree. For each item:
//! 1. custom validation
//! 2. immutability against the old document (only if the parent existed)
//! 3. if present: emptiness, ranges, lengths, equality, type dispatch
//! 4. if absent: required check
//!
//! Objects additionally report keys that have no validator. All data
//! failures are collected; only schema mistakes (see [`SchemaError`]) abort
//! the walk.

use serde_json::Value;

use super::attachments::{check_attachments, content_type_supported, extension_supported};
use super::comparator::{documents_equal, items_equal, values_equal};
use super::constraints::{check_bound, item_length, Bound, IncomparableBound, RangeKind};
use super::context::{AttachmentOverrides, ValidationContext};
use super::formats::StringFormat;
use super::item_stack::{is_present, property_path, ItemFrame, ItemName};
use super::messages;
use crate::schema::{
    attachment_content_type, attachment_length, attachments, effective_old_doc, is_deleted,
    is_reserved, AttachmentReferenceRules, DocumentDefinition, HashtableKeyValidator,
    PropertyValidator, SchemaError, SchemaResult, ValidatorKind,
};

/// Validates writes against one document definition.
///
/// The validator does not mutate documents and is deterministic.
pub struct DocumentValidator<'d> {
    definition: &'d DocumentDefinition,
}

impl<'d> DocumentValidator<'d> {
    pub fn new(definition: &'d DocumentDefinition) -> Self {
        Self { definition }
    }

    /// Validate a write, returning every data failure found.
    ///
    /// Deletions are only checked against the document-level replace/delete
    /// rules; their content is not validated.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the validator tree is misconfigured.
    pub fn validate(&self, doc: &Value, old_doc: Option<&Value>) -> SchemaResult<Vec<String>> {
        let mut ctx = ValidationContext::new(doc, effective_old_doc(old_doc));

        self.check_document_mutability(&mut ctx);

        if !is_deleted(doc) {
            self.validate_contents(&mut ctx)
                .map_err(|e| e.for_type(&self.definition.type_id))?;
        }

        Ok(ctx.into_errors())
    }

    fn check_document_mutability(&self, ctx: &mut ValidationContext<'_>) {
        let doc = ctx.doc();
        let Some(old_doc) = ctx.old_doc() else {
            return;
        };
        let definition = self.definition;
        let immutable = definition.immutable.is_set(doc, Some(old_doc));

        if is_deleted(doc) {
            if immutable {
                ctx.push(messages::immutable_document());
            } else if definition.cannot_delete.is_set(doc, Some(old_doc)) {
                ctx.push(messages::cannot_delete_document());
            }
        } else if !documents_equal(doc, old_doc) {
            if immutable {
                ctx.push(messages::immutable_document());
            } else if definition.cannot_replace.is_set(doc, Some(old_doc)) {
                ctx.push(messages::cannot_replace_document());
            }
        }
    }

    fn validate_contents(&self, ctx: &mut ValidationContext<'_>) -> SchemaResult<()> {
        let (doc, old_doc) = (ctx.doc(), ctx.old_doc());
        let definition = self.definition;

        let root = ItemFrame::root(doc, old_doc);
        let validators = definition.property_validators.resolve(doc, old_doc);
        let allow_unknown = definition.allow_unknown_properties.is_set(doc, old_doc);
        validate_properties(ctx, &validators, allow_unknown, &root)?;

        check_attachments(ctx, definition);
        Ok(())
    }
}

/// Validate the declared properties of an object, then report undeclared keys
fn validate_properties(
    ctx: &mut ValidationContext<'_>,
    validators: &[PropertyValidator],
    allow_unknown: bool,
    frame: &ItemFrame<'_>,
) -> SchemaResult<()> {
    let object = frame.value().and_then(Value::as_object);
    let old_object = frame.old_value().and_then(Value::as_object);

    for validator in validators {
        let name = validator.name.as_str();
        let child = frame.child(
            ItemName::Property(name),
            object.and_then(|o| o.get(name)),
            old_object.and_then(|o| o.get(name)),
        );
        validate_item(ctx, validator, &child)?;
    }

    if allow_unknown {
        return Ok(());
    }

    if let Some(object) = object {
        let is_root = frame.parent().is_none();
        let object_path = frame.path();
        for key in object.keys() {
            if is_root && is_reserved(key) {
                continue;
            }
            if !validators.iter().any(|v| v.name == *key) {
                ctx.push(messages::unsupported_property(&property_path(&object_path, key)));
            }
        }
    }

    Ok(())
}

/// Validate a single item against its validator
fn validate_item(
    ctx: &mut ValidationContext<'_>,
    validator: &PropertyValidator,
    frame: &ItemFrame<'_>,
) -> SchemaResult<()> {
    let (doc, old_doc) = (ctx.doc(), ctx.old_doc());

    if let Some(custom) = &validator.custom_validation {
        ctx.extend(custom.call(doc, old_doc, frame));
    }

    check_immutability(ctx, validator, frame);

    let value = match frame.value() {
        Some(value) if !value.is_null() => value,
        _ => {
            if validator.required.is_set(doc, old_doc) {
                ctx.push(messages::required_value(&frame.path()));
            }
            return Ok(());
        }
    };

    let path = frame.path();

    if validator.must_not_be_empty.is_set(doc, old_doc) && item_length(value) == Some(0) {
        ctx.push(messages::must_not_be_empty(&path));
    }

    check_ranges(ctx, validator, value, &path)?;
    check_lengths(ctx, validator, value, &path);
    check_equality(ctx, validator, value, &path);
    check_type(ctx, validator, value, frame, &path)
}

fn check_immutability(
    ctx: &mut ValidationContext<'_>,
    validator: &PropertyValidator,
    frame: &ItemFrame<'_>,
) {
    let (doc, old_doc) = (ctx.doc(), ctx.old_doc());
    if old_doc.is_none() || !frame.parent_existed_in_old() {
        return;
    }

    let format = validator.kind.string_format();
    // (flag, only once the old value is set, strict)
    let variants = [
        (&validator.immutable, false, false),
        (&validator.immutable_strict, false, true),
        (&validator.immutable_when_set, true, false),
        (&validator.immutable_when_set_strict, true, true),
    ];

    for (flag, only_when_set, strict) in variants {
        if !flag.is_set(doc, old_doc) {
            continue;
        }
        if only_when_set {
            let old_is_set = if strict {
                frame.old_value().is_some()
            } else {
                is_present(frame.old_value())
            };
            if !old_is_set {
                continue;
            }
        }
        if !items_equal(frame.value(), frame.old_value(), strict, format) {
            ctx.push(messages::immutable_item(&frame.path()));
            return;
        }
    }
}

fn check_ranges(
    ctx: &mut ValidationContext<'_>,
    validator: &PropertyValidator,
    value: &Value,
    path: &str,
) -> SchemaResult<()> {
    let (doc, old_doc) = (ctx.doc(), ctx.old_doc());
    let range = RangeKind::of(&validator.kind);
    let bounds = [
        (Bound::Minimum, &validator.minimum_value),
        (Bound::MinimumExclusive, &validator.minimum_value_exclusive),
        (Bound::Maximum, &validator.maximum_value),
        (Bound::MaximumExclusive, &validator.maximum_value_exclusive),
    ];

    for (bound, constraint) in bounds {
        let Some(constraint) = constraint else {
            continue;
        };
        let bound_value = constraint.resolve(doc, old_doc);
        match check_bound(value, &bound_value, bound, range) {
            Ok(true) => {}
            Ok(false) => ctx.push(bound.violation(path, &bound_value)),
            Err(IncomparableBound) => {
                return Err(SchemaError::invalid_bound(
                    path,
                    messages::display_value(&bound_value),
                ))
            }
        }
    }
    Ok(())
}

fn check_lengths(
    ctx: &mut ValidationContext<'_>,
    validator: &PropertyValidator,
    value: &Value,
    path: &str,
) {
    let (doc, old_doc) = (ctx.doc(), ctx.old_doc());
    let Some(length) = item_length(value) else {
        return;
    };

    if let Some(minimum) = &validator.minimum_length {
        let minimum = *minimum.resolve(doc, old_doc);
        if length < minimum {
            ctx.push(messages::minimum_length(path, minimum));
        }
    }
    if let Some(maximum) = &validator.maximum_length {
        let maximum = *maximum.resolve(doc, old_doc);
        if length > maximum {
            ctx.push(messages::maximum_length(path, maximum));
        }
    }
}

fn check_equality(
    ctx: &mut ValidationContext<'_>,
    validator: &PropertyValidator,
    value: &Value,
    path: &str,
) {
    let (doc, old_doc) = (ctx.doc(), ctx.old_doc());
    let format = validator.kind.string_format();

    for (constraint, strict) in [(&validator.must_equal, false), (&validator.must_equal_strict, true)] {
        if let Some(expected) = constraint {
            let expected = expected.resolve(doc, old_doc);
            if !items_equal(Some(value), Some(&expected), strict, format) {
                ctx.push(messages::must_equal(path, &expected));
            }
        }
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().map_or(false, |f| f.is_finite() && f.fract() == 0.0)
        }
        _ => false,
    }
}

fn format_violation(format: StringFormat, path: &str) -> String {
    match format {
        StringFormat::Date => messages::date_format_invalid(path),
        StringFormat::DateTime => messages::datetime_format_invalid(path),
        StringFormat::Time => messages::time_format_invalid(path),
        StringFormat::TimeZone => messages::timezone_format_invalid(path),
        StringFormat::Uuid => messages::uuid_format_invalid(path),
    }
}

/// Type-specific checks, recursing into containers
fn check_type(
    ctx: &mut ValidationContext<'_>,
    validator: &PropertyValidator,
    value: &Value,
    frame: &ItemFrame<'_>,
    path: &str,
) -> SchemaResult<()> {
    let (doc, old_doc) = (ctx.doc(), ctx.old_doc());

    match &validator.kind {
        ValidatorKind::String { regex_pattern } => match value.as_str() {
            None => ctx.push(messages::type_constraint(path, "a string")),
            Some(text) => {
                if let Some(pattern) = regex_pattern {
                    let pattern = pattern.resolve(doc, old_doc);
                    if !pattern.is_match(text) {
                        ctx.push(messages::regex_pattern(path, &pattern));
                    }
                }
            }
        },
        ValidatorKind::Integer => {
            if !is_integer(value) {
                ctx.push(messages::type_constraint(path, "an integer"));
            }
        }
        ValidatorKind::Float => {
            if !value.is_number() {
                ctx.push(messages::type_constraint(path, "a floating point or integer number"));
            }
        }
        ValidatorKind::Boolean => {
            if !value.is_boolean() {
                ctx.push(messages::type_constraint(path, "a boolean"));
            }
        }
        ValidatorKind::Date
        | ValidatorKind::DateTime
        | ValidatorKind::Time
        | ValidatorKind::TimeZone
        | ValidatorKind::Uuid => {
            if let Some(format) = validator.kind.string_format() {
                if !value.as_str().map_or(false, |s| format.is_valid(s)) {
                    ctx.push(format_violation(format, path));
                }
            }
        }
        ValidatorKind::Enum { predefined_values } => {
            let Some(predefined_values) = predefined_values else {
                return Err(SchemaError::missing_predefined_values(path));
            };
            let predefined = predefined_values.resolve(doc, old_doc);
            if !value.is_string() && !is_integer(value) {
                ctx.push(messages::type_constraint(path, "either a string or an integer"));
            } else if !predefined.iter().any(|p| values_equal(Some(value), Some(p), true)) {
                ctx.push(messages::enum_predefined_value(path, &predefined));
            }
        }
        ValidatorKind::Array { elements } => match value.as_array() {
            None => ctx.push(messages::type_constraint(path, "an array")),
            Some(items) => {
                if let Some(elements) = elements {
                    let old_items = frame.old_value().and_then(Value::as_array);
                    for (index, item) in items.iter().enumerate() {
                        let child = frame.child(
                            ItemName::Index(index),
                            Some(item),
                            old_items.and_then(|old| old.get(index)),
                        );
                        validate_item(ctx, elements, &child)?;
                    }
                }
            }
        },
        ValidatorKind::Object {
            properties,
            allow_unknown_properties,
        } => {
            if value.as_object().is_none() {
                ctx.push(messages::type_constraint(path, "an object"));
            } else if let Some(properties) = properties {
                let properties = properties.resolve(doc, old_doc);
                let allow_unknown = allow_unknown_properties.is_set(doc, old_doc);
                validate_properties(ctx, &properties, allow_unknown, frame)?;
            }
        }
        ValidatorKind::Hashtable { keys, values } => match value.as_object() {
            None => ctx.push(messages::type_constraint(path, "an object/hashtable")),
            Some(entries) => {
                let old_entries = frame.old_value().and_then(Value::as_object);
                for (key, entry) in entries {
                    let child = frame.child(
                        ItemName::Key(key),
                        Some(entry),
                        old_entries.and_then(|old| old.get(key)),
                    );
                    if let Some(keys) = keys {
                        check_hashtable_key(ctx, keys, key, path, &child);
                    }
                    if let Some(values) = values {
                        validate_item(ctx, values, &child)?;
                    }
                }
            }
        },
        ValidatorKind::AttachmentReference(rules) => match value.as_str() {
            None => ctx.push(messages::type_constraint(path, "an attachment reference string")),
            Some(name) => check_attachment_reference(ctx, rules, name, path),
        },
        ValidatorKind::Any => {}
    }

    Ok(())
}

fn check_hashtable_key(
    ctx: &mut ValidationContext<'_>,
    rules: &HashtableKeyValidator,
    key: &str,
    table_path: &str,
    entry: &ItemFrame<'_>,
) {
    let (doc, old_doc) = (ctx.doc(), ctx.old_doc());

    if rules.must_not_be_empty.is_set(doc, old_doc) && key.is_empty() {
        ctx.push(messages::hashtable_key_empty(table_path));
    }
    if let Some(pattern) = &rules.regex_pattern {
        let pattern = pattern.resolve(doc, old_doc);
        if !pattern.is_match(key) {
            ctx.push(messages::hashtable_key_pattern(&entry.path(), &pattern));
        }
    }
}

/// Record the reference and, if the attachment is already on the document,
/// apply the reference's own rules to it
fn check_attachment_reference(
    ctx: &mut ValidationContext<'_>,
    rules: &AttachmentReferenceRules,
    name: &str,
    path: &str,
) {
    let (doc, old_doc) = (ctx.doc(), ctx.old_doc());
    let extensions = rules
        .supported_extensions
        .as_ref()
        .map(|c| c.resolve(doc, old_doc).into_owned());
    let content_types = rules
        .supported_content_types
        .as_ref()
        .map(|c| c.resolve(doc, old_doc).into_owned());
    let maximum_size = rules.maximum_size.as_ref().map(|c| *c.resolve(doc, old_doc));

    ctx.record_reference(
        name,
        AttachmentOverrides {
            extensions: extensions.is_some(),
            content_types: content_types.is_some(),
            maximum_size: maximum_size.is_some(),
        },
    );

    // The attachment may be uploaded by a later write
    let Some(entry) = attachments(doc).and_then(|all| all.get(name)) else {
        return;
    };

    if let Some(extensions) = &extensions {
        if !extension_supported(name, extensions) {
            ctx.push(messages::attachment_reference_extension(path, extensions));
        }
    }
    if let Some(content_types) = &content_types {
        if !content_type_supported(attachment_content_type(entry), content_types) {
            ctx.push(messages::attachment_reference_content_type(path, content_types));
        }
    }
    if let Some(maximum_size) = maximum_size {
        if attachment_length(entry) > maximum_size {
            ctx.push(messages::attachment_reference_size(path, maximum_size));
        }
    }
}
