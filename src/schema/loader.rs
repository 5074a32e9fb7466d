//! Schema loader for JSON schema files
//!
//! A schema file lists document definitions in declaration order:
//!
//! ```json
//! {
//!   "definitions": [
//!     {
//!       "typeId": "book",
//!       "typeFilter": { "kind": "idPrefix", "prefix": "book." },
//!       "channels": { "view": "books", "write": "editors" },
//!       "propertyValidators": [
//!         { "name": "title", "type": "string", "required": true }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! JSON only carries static constraint values. Dynamic constraints, custom
//! validation, custom filters, and custom actions are attached in code.
//!
//! Unknown validator type names are rejected at load time. An enum without
//! predefined values loads but fails when first exercised.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::constraint::Constraint;
use super::errors::{SchemaError, SchemaResult};
use super::types::{
    AccessAssignment, AttachmentConstraints, AttachmentReferenceRules, AuthorizationMap,
    DocumentDefinition, DocumentSchema, HashtableKeyValidator, PropertyValidator, TypeFilter,
    ValidatorKind,
};
use crate::observability::{log_event_with_fields, Event};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    definitions: Vec<DefinitionSource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct DefinitionSource {
    type_id: String,
    #[serde(default)]
    type_filter: Option<TypeFilterSource>,
    #[serde(default)]
    property_validators: Vec<ValidatorSource>,
    #[serde(default)]
    allow_unknown_properties: bool,
    #[serde(default)]
    channels: Option<AuthorizationMap>,
    #[serde(default)]
    authorized_roles: Option<AuthorizationMap>,
    #[serde(default)]
    authorized_users: Option<AuthorizationMap>,
    #[serde(default)]
    immutable: bool,
    #[serde(default)]
    cannot_replace: bool,
    #[serde(default)]
    cannot_delete: bool,
    #[serde(default)]
    allow_attachments: bool,
    #[serde(default)]
    attachment_constraints: Option<AttachmentConstraints>,
    #[serde(default)]
    access_assignments: Option<Vec<AssignmentSource>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", deny_unknown_fields)]
enum TypeFilterSource {
    Simple,
    IdPrefix { prefix: String },
    IdPattern { pattern: String },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", deny_unknown_fields)]
enum AssignmentSource {
    Channel {
        #[serde(default)]
        users: Vec<String>,
        #[serde(default)]
        roles: Vec<String>,
        channels: Vec<String>,
    },
    Role {
        #[serde(default)]
        users: Vec<String>,
        roles: Vec<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct KeyValidatorSource {
    #[serde(default)]
    must_not_be_empty: bool,
    #[serde(default)]
    regex_pattern: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ValidatorSource {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    immutable: bool,
    #[serde(default)]
    immutable_strict: bool,
    #[serde(default)]
    immutable_when_set: bool,
    #[serde(default)]
    immutable_when_set_strict: bool,
    #[serde(default)]
    must_not_be_empty: bool,
    #[serde(default)]
    minimum_value: Option<Value>,
    #[serde(default)]
    minimum_value_exclusive: Option<Value>,
    #[serde(default)]
    maximum_value: Option<Value>,
    #[serde(default)]
    maximum_value_exclusive: Option<Value>,
    #[serde(default)]
    minimum_length: Option<usize>,
    #[serde(default)]
    maximum_length: Option<usize>,
    #[serde(default)]
    must_equal: Option<Value>,
    #[serde(default)]
    must_equal_strict: Option<Value>,
    #[serde(default)]
    regex_pattern: Option<String>,
    #[serde(default)]
    predefined_values: Option<Vec<Value>>,
    #[serde(default)]
    property_validators: Option<Vec<ValidatorSource>>,
    #[serde(default)]
    allow_unknown_properties: bool,
    #[serde(default)]
    array_elements_validator: Option<Box<ValidatorSource>>,
    #[serde(default)]
    hashtable_keys_validator: Option<KeyValidatorSource>,
    #[serde(default)]
    hashtable_values_validator: Option<Box<ValidatorSource>>,
    #[serde(default)]
    supported_extensions: Option<Vec<String>>,
    #[serde(default)]
    supported_content_types: Option<Vec<String>>,
    #[serde(default)]
    maximum_size: Option<u64>,
}

impl ValidatorSource {
    /// First type-specific key set on a validator of another type
    fn misplaced_key(&self) -> Option<&'static str> {
        let keys: [(&'static str, bool, &str); 10] = [
            ("regexPattern", self.regex_pattern.is_some(), "string"),
            ("predefinedValues", self.predefined_values.is_some(), "enum"),
            ("propertyValidators", self.property_validators.is_some(), "object"),
            ("allowUnknownProperties", self.allow_unknown_properties, "object"),
            ("arrayElementsValidator", self.array_elements_validator.is_some(), "array"),
            ("hashtableKeysValidator", self.hashtable_keys_validator.is_some(), "hashtable"),
            ("hashtableValuesValidator", self.hashtable_values_validator.is_some(), "hashtable"),
            ("supportedExtensions", self.supported_extensions.is_some(), "attachmentReference"),
            ("supportedContentTypes", self.supported_content_types.is_some(), "attachmentReference"),
            ("maximumSize", self.maximum_size.is_some(), "attachmentReference"),
        ];
        keys.into_iter()
            .find(|(_, set, owner)| *set && *owner != self.type_name)
            .map(|(key, _, _)| key)
    }
}

/// Builds [`DocumentSchema`]s from JSON sources.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Load and build the schema at `path`.
    ///
    /// Any read, parse, or build failure is FATAL.
    pub fn load_file(path: &Path) -> SchemaResult<DocumentSchema> {
        let source = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(&source, format!("Failed to read file: {}", e))
        })?;

        let schema = Self::load_str(&source, &content)?;

        let types = schema.len().to_string();
        log_event_with_fields(
            Event::SchemaLoaded,
            &[("path", source.as_str()), ("types", types.as_str())],
        );
        Ok(schema)
    }

    /// Build a schema from JSON text; `source` names it in errors
    pub fn load_str(source: &str, content: &str) -> SchemaResult<DocumentSchema> {
        let file: SchemaFile = serde_json::from_str(content).map_err(|e| {
            SchemaError::malformed_schema(source, format!("Invalid JSON: {}", e))
        })?;
        Self::build(source, file)
    }

    /// Build a schema from an already-parsed JSON value
    pub fn load_value(source: &str, value: Value) -> SchemaResult<DocumentSchema> {
        let file: SchemaFile = serde_json::from_value(value).map_err(|e| {
            SchemaError::malformed_schema(source, format!("Invalid schema: {}", e))
        })?;
        Self::build(source, file)
    }

    fn build(source: &str, file: SchemaFile) -> SchemaResult<DocumentSchema> {
        let definitions = file
            .definitions
            .into_iter()
            .map(|d| build_definition(source, d))
            .collect::<SchemaResult<Vec<_>>>()?;
        DocumentSchema::new(definitions)
    }
}

fn compile_regex(source: &str, type_id: &str, path: &str, pattern: &str) -> SchemaResult<Regex> {
    Regex::new(pattern).map_err(|e| {
        SchemaError::malformed_schema(source, format!("Invalid pattern at \"{}\": {}", path, e))
            .for_type(type_id)
    })
}

fn build_definition(source: &str, raw: DefinitionSource) -> SchemaResult<DocumentDefinition> {
    let type_id = raw.type_id;

    let type_filter = match raw.type_filter {
        None | Some(TypeFilterSource::Simple) => TypeFilter::Simple,
        Some(TypeFilterSource::IdPrefix { prefix }) => TypeFilter::IdPrefix(prefix),
        Some(TypeFilterSource::IdPattern { pattern }) => {
            TypeFilter::IdPattern(compile_regex(source, &type_id, "typeFilter", &pattern)?)
        }
    };

    let validators = raw
        .property_validators
        .into_iter()
        .map(|v| build_property(source, &type_id, "", v))
        .collect::<SchemaResult<Vec<_>>>()?;

    let mut definition = DocumentDefinition::new(type_id)
        .type_filter(type_filter)
        .properties(validators)
        .allow_unknown_properties(raw.allow_unknown_properties)
        .immutable(raw.immutable)
        .cannot_replace(raw.cannot_replace)
        .cannot_delete(raw.cannot_delete)
        .allow_attachments(raw.allow_attachments);

    if let Some(channels) = raw.channels {
        definition = definition.channels(channels);
    }
    if let Some(roles) = raw.authorized_roles {
        definition = definition.authorized_roles(roles);
    }
    if let Some(users) = raw.authorized_users {
        definition = definition.authorized_users(users);
    }
    if let Some(constraints) = raw.attachment_constraints {
        definition = definition.attachment_constraints(constraints);
    }
    if let Some(assignments) = raw.access_assignments {
        let assignments: Vec<AccessAssignment> = assignments
            .into_iter()
            .map(|a| match a {
                AssignmentSource::Channel {
                    users,
                    roles,
                    channels,
                } => AccessAssignment::channel(users, roles, channels),
                AssignmentSource::Role { users, roles } => AccessAssignment::role(users, roles),
            })
            .collect();
        definition = definition.access_assignments(assignments);
    }

    Ok(definition)
}

/// Build a named property validator found under `parent_path`
fn build_property(
    source: &str,
    type_id: &str,
    parent_path: &str,
    raw: ValidatorSource,
) -> SchemaResult<PropertyValidator> {
    let name = raw.name.clone().ok_or_else(|| {
        SchemaError::malformed_schema(
            source,
            format!("Property validator under \"{}\" has no name", parent_path),
        )
        .for_type(type_id)
    })?;
    let path = if parent_path.is_empty() {
        name.clone()
    } else {
        format!("{}.{}", parent_path, name)
    };
    build_validator(source, type_id, &path, name, raw)
}

fn build_validator(
    source: &str,
    type_id: &str,
    path: &str,
    name: String,
    raw: ValidatorSource,
) -> SchemaResult<PropertyValidator> {
    let misplaced = raw.misplaced_key();
    let kind = match raw.type_name.as_str() {
        "string" => ValidatorKind::String {
            regex_pattern: raw
                .regex_pattern
                .as_deref()
                .map(|p| compile_regex(source, type_id, path, p).map(Constraint::from))
                .transpose()?,
        },
        "integer" => ValidatorKind::Integer,
        "float" => ValidatorKind::Float,
        "boolean" => ValidatorKind::Boolean,
        "date" => ValidatorKind::Date,
        "datetime" => ValidatorKind::DateTime,
        "time" => ValidatorKind::Time,
        "timezone" => ValidatorKind::TimeZone,
        "uuid" => ValidatorKind::Uuid,
        "any" => ValidatorKind::Any,
        "enum" => ValidatorKind::Enum {
            predefined_values: raw.predefined_values.map(Constraint::from),
        },
        "array" => ValidatorKind::Array {
            elements: raw
                .array_elements_validator
                .map(|e| {
                    let element_path = format!("{}[]", path);
                    build_validator(source, type_id, &element_path, String::new(), *e)
                })
                .transpose()?
                .map(Box::new),
        },
        "object" => ValidatorKind::Object {
            properties: raw
                .property_validators
                .map(|props| {
                    props
                        .into_iter()
                        .map(|p| build_property(source, type_id, path, p))
                        .collect::<SchemaResult<Vec<_>>>()
                })
                .transpose()?
                .map(Constraint::from),
            allow_unknown_properties: raw.allow_unknown_properties.into(),
        },
        "hashtable" => ValidatorKind::Hashtable {
            keys: raw
                .hashtable_keys_validator
                .map(|k| -> SchemaResult<HashtableKeyValidator> {
                    Ok(HashtableKeyValidator {
                        must_not_be_empty: k.must_not_be_empty.into(),
                        regex_pattern: k
                            .regex_pattern
                            .as_deref()
                            .map(|p| compile_regex(source, type_id, path, p).map(Constraint::from))
                            .transpose()?,
                    })
                })
                .transpose()?,
            values: raw
                .hashtable_values_validator
                .map(|v| {
                    let value_path = format!("{}[]", path);
                    build_validator(source, type_id, &value_path, String::new(), *v)
                })
                .transpose()?
                .map(Box::new),
        },
        "attachmentReference" => ValidatorKind::AttachmentReference(AttachmentReferenceRules {
            supported_extensions: raw.supported_extensions.map(Constraint::from),
            supported_content_types: raw.supported_content_types.map(Constraint::from),
            maximum_size: raw.maximum_size.map(Constraint::from),
        }),
        other => return Err(SchemaError::unknown_validator_type(type_id, path, other)),
    };
    if let Some(key) = misplaced {
        return Err(SchemaError::malformed_schema(
            source,
            format!("\"{}\" does not apply to {} validator at \"{}\"", key, raw.type_name, path),
        )
        .for_type(type_id));
    }

    let mut validator = PropertyValidator::new(name, kind)
        .required(raw.required)
        .immutable(raw.immutable)
        .immutable_strict(raw.immutable_strict)
        .immutable_when_set(raw.immutable_when_set)
        .immutable_when_set_strict(raw.immutable_when_set_strict)
        .must_not_be_empty(raw.must_not_be_empty);

    validator.minimum_value = raw.minimum_value.map(Constraint::from);
    validator.minimum_value_exclusive = raw.minimum_value_exclusive.map(Constraint::from);
    validator.maximum_value = raw.maximum_value.map(Constraint::from);
    validator.maximum_value_exclusive = raw.maximum_value_exclusive.map(Constraint::from);
    validator.minimum_length = raw.minimum_length.map(Constraint::from);
    validator.maximum_length = raw.maximum_length.map(Constraint::from);
    validator.must_equal = raw.must_equal.map(Constraint::from);
    validator.must_equal_strict = raw.must_equal_strict.map(Constraint::from);

    Ok(validator)
}
