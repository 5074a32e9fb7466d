//! Schema type definitions
//!
//! A schema is an ordered list of document definitions. Each definition
//! carries a type filter, a tree of property validators mirroring the
//! document shape, authorization maps, access assignments, and lifecycle
//! actions. The tree is built once and is read-only afterwards.
//!
//! Supported validator types:
//! - string, integer, float, boolean
//! - date, datetime, time, timezone, uuid (format-checked strings)
//! - enum (membership in predefined values)
//! - array, object, hashtable (nested validators)
//! - attachmentReference (names an attachment on the document)
//! - any

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::constraint::Constraint;
use super::document::{doc_id, is_deleted};
use super::errors::{SchemaError, SchemaResult};
use crate::sync::CustomActions;
use crate::validation::{ItemFrame, StringFormat};

/// Write operation being attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// No live revision exists
    Add,
    /// A live revision exists
    Replace,
    /// The new revision is a tombstone
    Remove,
}

impl Operation {
    /// Classify a write from the new doc and the effective old doc
    pub fn of(doc: &Value, effective_old_doc: Option<&Value>) -> Self {
        if is_deleted(doc) {
            Operation::Remove
        } else if effective_old_doc.is_some() {
            Operation::Replace
        } else {
            Operation::Add
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Replace => "replace",
            Operation::Remove => "remove",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(Some(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(entry) => vec![entry],
        OneOrMany::Many(entries) => entries,
    }))
}

/// Per-operation channel, role, or user lists.
///
/// `write` applies to every write operation in addition to the
/// operation-specific list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorizationMap {
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub view: Option<Vec<String>>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub add: Option<Vec<String>>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub replace: Option<Vec<String>>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub remove: Option<Vec<String>>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Option::is_none")]
    pub write: Option<Vec<String>>,
}

fn owned_list<I, S>(items: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Some(items.into_iter().map(Into::into).collect())
}

fn push_unique(target: &mut Vec<String>, entries: &[String]) {
    for entry in entries {
        if !target.contains(entry) {
            target.push(entry.clone());
        }
    }
}

impl AuthorizationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view<I: IntoIterator<Item = S>, S: Into<String>>(mut self, items: I) -> Self {
        self.view = owned_list(items);
        self
    }

    pub fn add<I: IntoIterator<Item = S>, S: Into<String>>(mut self, items: I) -> Self {
        self.add = owned_list(items);
        self
    }

    pub fn replace<I: IntoIterator<Item = S>, S: Into<String>>(mut self, items: I) -> Self {
        self.replace = owned_list(items);
        self
    }

    pub fn remove<I: IntoIterator<Item = S>, S: Into<String>>(mut self, items: I) -> Self {
        self.remove = owned_list(items);
        self
    }

    pub fn write<I: IntoIterator<Item = S>, S: Into<String>>(mut self, items: I) -> Self {
        self.write = owned_list(items);
        self
    }

    /// Entries required for an operation: its own list plus `write`.
    ///
    /// `None` when neither is declared.
    pub fn requirements(&self, operation: Operation) -> Option<Vec<String>> {
        let specific = match operation {
            Operation::Add => self.add.as_ref(),
            Operation::Replace => self.replace.as_ref(),
            Operation::Remove => self.remove.as_ref(),
        };
        if specific.is_none() && self.write.is_none() {
            return None;
        }
        let mut required = Vec::new();
        for list in [specific, self.write.as_ref()].into_iter().flatten() {
            push_unique(&mut required, list);
        }
        Some(required)
    }

    /// De-duplicated union of every list, in declaration order
    pub fn all_entries(&self) -> Vec<String> {
        let mut all = Vec::new();
        for list in [&self.view, &self.add, &self.replace, &self.remove, &self.write]
            .into_iter()
            .flatten()
        {
            push_unique(&mut all, list);
        }
        all
    }
}

/// Whole-document attachment limits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AttachmentConstraints {
    #[serde(default)]
    pub maximum_attachment_count: Option<usize>,
    #[serde(default)]
    pub maximum_individual_size: Option<u64>,
    #[serde(default)]
    pub maximum_total_size: Option<u64>,
    /// Extensions compared case-insensitively
    #[serde(default)]
    pub supported_extensions: Option<Vec<String>>,
    #[serde(default)]
    pub supported_content_types: Option<Vec<String>>,
    /// Every attachment must be named by an attachmentReference property
    #[serde(default)]
    pub require_attachment_references: bool,
}

/// Rules carried by an attachmentReference validator.
///
/// When set, these take precedence over the document-wide
/// [`AttachmentConstraints`] for the attachment they reference.
#[derive(Debug, Clone, Default)]
pub struct AttachmentReferenceRules {
    pub supported_extensions: Option<Constraint<Vec<String>>>,
    pub supported_content_types: Option<Constraint<Vec<String>>>,
    pub maximum_size: Option<Constraint<u64>>,
}

/// Rules applied to each key of a hashtable
#[derive(Debug, Clone, Default)]
pub struct HashtableKeyValidator {
    pub must_not_be_empty: Constraint<bool>,
    pub regex_pattern: Option<Constraint<Regex>>,
}

/// Type of a validator and its type-specific children
#[derive(Debug, Clone)]
pub enum ValidatorKind {
    String {
        regex_pattern: Option<Constraint<Regex>>,
    },
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Time,
    TimeZone,
    Uuid,
    Enum {
        predefined_values: Option<Constraint<Vec<Value>>>,
    },
    Array {
        elements: Option<Box<PropertyValidator>>,
    },
    Object {
        properties: Option<Constraint<Vec<PropertyValidator>>>,
        allow_unknown_properties: Constraint<bool>,
    },
    Hashtable {
        keys: Option<HashtableKeyValidator>,
        values: Option<Box<PropertyValidator>>,
    },
    AttachmentReference(AttachmentReferenceRules),
    Any,
}

impl ValidatorKind {
    /// Returns the type name as written in schema sources
    pub fn type_name(&self) -> &'static str {
        match self {
            ValidatorKind::String { .. } => "string",
            ValidatorKind::Integer => "integer",
            ValidatorKind::Float => "float",
            ValidatorKind::Boolean => "boolean",
            ValidatorKind::Date => "date",
            ValidatorKind::DateTime => "datetime",
            ValidatorKind::Time => "time",
            ValidatorKind::TimeZone => "timezone",
            ValidatorKind::Uuid => "uuid",
            ValidatorKind::Enum { .. } => "enum",
            ValidatorKind::Array { .. } => "array",
            ValidatorKind::Object { .. } => "object",
            ValidatorKind::Hashtable { .. } => "hashtable",
            ValidatorKind::AttachmentReference(_) => "attachmentReference",
            ValidatorKind::Any => "any",
        }
    }

    /// Canonical string format for format-checked types
    pub fn string_format(&self) -> Option<StringFormat> {
        match self {
            ValidatorKind::Date => Some(StringFormat::Date),
            ValidatorKind::DateTime => Some(StringFormat::DateTime),
            ValidatorKind::Time => Some(StringFormat::Time),
            ValidatorKind::TimeZone => Some(StringFormat::TimeZone),
            ValidatorKind::Uuid => Some(StringFormat::Uuid),
            _ => None,
        }
    }
}

/// Per-item validation hook: returns zero or more failure messages
pub type CustomValidationFn =
    dyn Fn(&Value, Option<&Value>, &ItemFrame<'_>) -> Vec<String> + Send + Sync;

#[derive(Clone)]
pub struct CustomValidation(Arc<CustomValidationFn>);

impl CustomValidation {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, Option<&Value>, &ItemFrame<'_>) -> Vec<String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, doc: &Value, old_doc: Option<&Value>, frame: &ItemFrame<'_>) -> Vec<String> {
        (self.0)(doc, old_doc, frame)
    }
}

impl fmt::Debug for CustomValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomValidation(<fn>)")
    }
}

/// Validator for one item of the document tree
#[derive(Debug, Clone)]
pub struct PropertyValidator {
    /// Property name; unused for array elements and hashtable values
    pub name: String,
    pub kind: ValidatorKind,
    pub required: Constraint<bool>,
    pub immutable: Constraint<bool>,
    pub immutable_strict: Constraint<bool>,
    pub immutable_when_set: Constraint<bool>,
    pub immutable_when_set_strict: Constraint<bool>,
    pub must_not_be_empty: Constraint<bool>,
    pub minimum_value: Option<Constraint<Value>>,
    pub minimum_value_exclusive: Option<Constraint<Value>>,
    pub maximum_value: Option<Constraint<Value>>,
    pub maximum_value_exclusive: Option<Constraint<Value>>,
    pub minimum_length: Option<Constraint<usize>>,
    pub maximum_length: Option<Constraint<usize>>,
    pub must_equal: Option<Constraint<Value>>,
    pub must_equal_strict: Option<Constraint<Value>>,
    pub custom_validation: Option<CustomValidation>,
}

impl PropertyValidator {
    /// Create a validator for a named property
    pub fn new(name: impl Into<String>, kind: ValidatorKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: Constraint::default(),
            immutable: Constraint::default(),
            immutable_strict: Constraint::default(),
            immutable_when_set: Constraint::default(),
            immutable_when_set_strict: Constraint::default(),
            must_not_be_empty: Constraint::default(),
            minimum_value: None,
            minimum_value_exclusive: None,
            maximum_value: None,
            maximum_value_exclusive: None,
            minimum_length: None,
            maximum_length: None,
            must_equal: None,
            must_equal_strict: None,
            custom_validation: None,
        }
    }

    /// Create an unnamed validator for array elements or hashtable values
    pub fn element(kind: ValidatorKind) -> Self {
        Self::new(String::new(), kind)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ValidatorKind::String { regex_pattern: None })
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ValidatorKind::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ValidatorKind::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ValidatorKind::Boolean)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, ValidatorKind::Date)
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, ValidatorKind::DateTime)
    }

    pub fn time(name: impl Into<String>) -> Self {
        Self::new(name, ValidatorKind::Time)
    }

    pub fn timezone(name: impl Into<String>) -> Self {
        Self::new(name, ValidatorKind::TimeZone)
    }

    pub fn uuid(name: impl Into<String>) -> Self {
        Self::new(name, ValidatorKind::Uuid)
    }

    pub fn any(name: impl Into<String>) -> Self {
        Self::new(name, ValidatorKind::Any)
    }

    pub fn enumeration(name: impl Into<String>, values: impl Into<Constraint<Vec<Value>>>) -> Self {
        Self::new(
            name,
            ValidatorKind::Enum {
                predefined_values: Some(values.into()),
            },
        )
    }

    pub fn array(name: impl Into<String>, elements: Option<PropertyValidator>) -> Self {
        Self::new(
            name,
            ValidatorKind::Array {
                elements: elements.map(Box::new),
            },
        )
    }

    pub fn object(
        name: impl Into<String>,
        properties: impl Into<Constraint<Vec<PropertyValidator>>>,
    ) -> Self {
        Self::new(
            name,
            ValidatorKind::Object {
                properties: Some(properties.into()),
                allow_unknown_properties: Constraint::default(),
            },
        )
    }

    pub fn hashtable(
        name: impl Into<String>,
        keys: Option<HashtableKeyValidator>,
        values: Option<PropertyValidator>,
    ) -> Self {
        Self::new(
            name,
            ValidatorKind::Hashtable {
                keys,
                values: values.map(Box::new),
            },
        )
    }

    pub fn attachment_reference(name: impl Into<String>, rules: AttachmentReferenceRules) -> Self {
        Self::new(name, ValidatorKind::AttachmentReference(rules))
    }

    pub fn required(mut self, value: impl Into<Constraint<bool>>) -> Self {
        self.required = value.into();
        self
    }

    pub fn immutable(mut self, value: impl Into<Constraint<bool>>) -> Self {
        self.immutable = value.into();
        self
    }

    pub fn immutable_strict(mut self, value: impl Into<Constraint<bool>>) -> Self {
        self.immutable_strict = value.into();
        self
    }

    pub fn immutable_when_set(mut self, value: impl Into<Constraint<bool>>) -> Self {
        self.immutable_when_set = value.into();
        self
    }

    pub fn immutable_when_set_strict(mut self, value: impl Into<Constraint<bool>>) -> Self {
        self.immutable_when_set_strict = value.into();
        self
    }

    pub fn must_not_be_empty(mut self, value: impl Into<Constraint<bool>>) -> Self {
        self.must_not_be_empty = value.into();
        self
    }

    pub fn minimum_value(mut self, value: impl Into<Constraint<Value>>) -> Self {
        self.minimum_value = Some(value.into());
        self
    }

    pub fn minimum_value_exclusive(mut self, value: impl Into<Constraint<Value>>) -> Self {
        self.minimum_value_exclusive = Some(value.into());
        self
    }

    pub fn maximum_value(mut self, value: impl Into<Constraint<Value>>) -> Self {
        self.maximum_value = Some(value.into());
        self
    }

    pub fn maximum_value_exclusive(mut self, value: impl Into<Constraint<Value>>) -> Self {
        self.maximum_value_exclusive = Some(value.into());
        self
    }

    pub fn minimum_length(mut self, value: impl Into<Constraint<usize>>) -> Self {
        self.minimum_length = Some(value.into());
        self
    }

    pub fn maximum_length(mut self, value: impl Into<Constraint<usize>>) -> Self {
        self.maximum_length = Some(value.into());
        self
    }

    pub fn must_equal(mut self, value: impl Into<Constraint<Value>>) -> Self {
        self.must_equal = Some(value.into());
        self
    }

    pub fn must_equal_strict(mut self, value: impl Into<Constraint<Value>>) -> Self {
        self.must_equal_strict = Some(value.into());
        self
    }

    pub fn custom_validation<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, Option<&Value>, &ItemFrame<'_>) -> Vec<String> + Send + Sync + 'static,
    {
        self.custom_validation = Some(CustomValidation::new(f));
        self
    }

    /// Regex for string validators; ignored by other types
    pub fn regex_pattern(mut self, pattern: impl Into<Constraint<Regex>>) -> Self {
        if let ValidatorKind::String { regex_pattern } = &mut self.kind {
            *regex_pattern = Some(pattern.into());
        }
        self
    }

    /// Unknown-property policy for object validators; ignored by other types
    pub fn allow_unknown_properties(mut self, value: impl Into<Constraint<bool>>) -> Self {
        if let ValidatorKind::Object {
            allow_unknown_properties,
            ..
        } = &mut self.kind
        {
            *allow_unknown_properties = value.into();
        }
        self
    }
}

/// Predicate over `(doc, old_doc, type_id)`
pub type TypeFilterFn = dyn Fn(&Value, Option<&Value>, &str) -> bool + Send + Sync;

/// Selects which documents belong to a definition
#[derive(Clone)]
pub enum TypeFilter {
    /// `doc.type` equals the type id (consulting the old doc on replace/delete)
    Simple,
    /// `doc._id` starts with the prefix
    IdPrefix(String),
    /// `doc._id` matches the pattern
    IdPattern(Regex),
    Custom(Arc<TypeFilterFn>),
}

impl TypeFilter {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Value, Option<&Value>, &str) -> bool + Send + Sync + 'static,
    {
        TypeFilter::Custom(Arc::new(f))
    }

    /// Evaluate against the new doc and the effective old doc
    pub fn matches(&self, doc: &Value, old_doc: Option<&Value>, type_id: &str) -> bool {
        match self {
            TypeFilter::Simple => {
                let type_of = |d: &Value| d.get("type").and_then(Value::as_str) == Some(type_id);
                match old_doc {
                    Some(old) if is_deleted(doc) => type_of(old),
                    Some(old) => type_of(doc) && type_of(old),
                    None => type_of(doc),
                }
            }
            TypeFilter::IdPrefix(prefix) => doc_id(doc).map_or(false, |id| id.starts_with(prefix.as_str())),
            TypeFilter::IdPattern(pattern) => doc_id(doc).map_or(false, |id| pattern.is_match(id)),
            TypeFilter::Custom(f) => f(doc, old_doc, type_id),
        }
    }
}

impl fmt::Debug for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::Simple => f.write_str("Simple"),
            TypeFilter::IdPrefix(prefix) => f.debug_tuple("IdPrefix").field(prefix).finish(),
            TypeFilter::IdPattern(pattern) => f.debug_tuple("IdPattern").field(&pattern.as_str()).finish(),
            TypeFilter::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

/// Channel access or role membership granted at write time
#[derive(Debug, Clone)]
pub enum AccessAssignment {
    /// Grant `channels` to `users` and `roles`
    Channel {
        users: Constraint<Vec<String>>,
        roles: Constraint<Vec<String>>,
        channels: Constraint<Vec<String>>,
    },
    /// Grant membership in `roles` to `users`
    Role {
        users: Constraint<Vec<String>>,
        roles: Constraint<Vec<String>>,
    },
}

impl AccessAssignment {
    pub fn channel(
        users: impl Into<Constraint<Vec<String>>>,
        roles: impl Into<Constraint<Vec<String>>>,
        channels: impl Into<Constraint<Vec<String>>>,
    ) -> Self {
        AccessAssignment::Channel {
            users: users.into(),
            roles: roles.into(),
            channels: channels.into(),
        }
    }

    pub fn role(
        users: impl Into<Constraint<Vec<String>>>,
        roles: impl Into<Constraint<Vec<String>>>,
    ) -> Self {
        AccessAssignment::Role {
            users: users.into(),
            roles: roles.into(),
        }
    }
}

/// Schema entry for one document type
#[derive(Debug, Clone)]
pub struct DocumentDefinition {
    pub type_id: String,
    pub type_filter: TypeFilter,
    pub property_validators: Constraint<Vec<PropertyValidator>>,
    /// Skip the unsupported-property check at the root
    pub allow_unknown_properties: Constraint<bool>,
    pub channels: Option<Constraint<AuthorizationMap>>,
    pub authorized_roles: Option<Constraint<AuthorizationMap>>,
    pub authorized_users: Option<Constraint<AuthorizationMap>>,
    pub immutable: Constraint<bool>,
    pub cannot_replace: Constraint<bool>,
    pub cannot_delete: Constraint<bool>,
    pub allow_attachments: Constraint<bool>,
    pub attachment_constraints: Option<Constraint<AttachmentConstraints>>,
    pub access_assignments: Option<Constraint<Vec<AccessAssignment>>>,
    pub custom_actions: CustomActions,
}

impl DocumentDefinition {
    /// Create a definition using the simple `doc.type` filter
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            type_filter: TypeFilter::Simple,
            property_validators: Constraint::Static(Vec::new()),
            allow_unknown_properties: Constraint::default(),
            channels: None,
            authorized_roles: None,
            authorized_users: None,
            immutable: Constraint::default(),
            cannot_replace: Constraint::default(),
            cannot_delete: Constraint::default(),
            allow_attachments: Constraint::default(),
            attachment_constraints: None,
            access_assignments: None,
            custom_actions: CustomActions::default(),
        }
    }

    pub fn type_filter(mut self, filter: TypeFilter) -> Self {
        self.type_filter = filter;
        self
    }

    pub fn properties(mut self, validators: impl Into<Constraint<Vec<PropertyValidator>>>) -> Self {
        self.property_validators = validators.into();
        self
    }

    pub fn allow_unknown_properties(mut self, value: impl Into<Constraint<bool>>) -> Self {
        self.allow_unknown_properties = value.into();
        self
    }

    pub fn channels(mut self, map: impl Into<Constraint<AuthorizationMap>>) -> Self {
        self.channels = Some(map.into());
        self
    }

    pub fn authorized_roles(mut self, map: impl Into<Constraint<AuthorizationMap>>) -> Self {
        self.authorized_roles = Some(map.into());
        self
    }

    pub fn authorized_users(mut self, map: impl Into<Constraint<AuthorizationMap>>) -> Self {
        self.authorized_users = Some(map.into());
        self
    }

    pub fn immutable(mut self, value: impl Into<Constraint<bool>>) -> Self {
        self.immutable = value.into();
        self
    }

    pub fn cannot_replace(mut self, value: impl Into<Constraint<bool>>) -> Self {
        self.cannot_replace = value.into();
        self
    }

    pub fn cannot_delete(mut self, value: impl Into<Constraint<bool>>) -> Self {
        self.cannot_delete = value.into();
        self
    }

    pub fn allow_attachments(mut self, value: impl Into<Constraint<bool>>) -> Self {
        self.allow_attachments = value.into();
        self
    }

    pub fn attachment_constraints(mut self, value: impl Into<Constraint<AttachmentConstraints>>) -> Self {
        self.attachment_constraints = Some(value.into());
        self
    }

    pub fn access_assignments(mut self, value: impl Into<Constraint<Vec<AccessAssignment>>>) -> Self {
        self.access_assignments = Some(value.into());
        self
    }

    pub fn custom_actions(mut self, actions: CustomActions) -> Self {
        self.custom_actions = actions;
        self
    }
}

/// Ordered collection of document definitions
#[derive(Debug, Clone, Default)]
pub struct DocumentSchema {
    definitions: Vec<DocumentDefinition>,
}

impl DocumentSchema {
    /// Build a schema, rejecting repeated type ids
    pub fn new(definitions: Vec<DocumentDefinition>) -> SchemaResult<Self> {
        let mut seen = HashSet::new();
        for definition in &definitions {
            if !seen.insert(definition.type_id.as_str()) {
                return Err(SchemaError::duplicate_type(&definition.type_id));
            }
        }
        Ok(Self { definitions })
    }

    /// Definitions in declaration order
    pub fn definitions(&self) -> &[DocumentDefinition] {
        &self.definitions
    }

    pub fn get(&self, type_id: &str) -> Option<&DocumentDefinition> {
        self.definitions.iter().find(|d| d.type_id == type_id)
    }

    pub fn type_ids(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.type_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
