//! Sync Pipeline Scenario Tests
//!
//! End-to-end writes through `SyncPipeline`:
//! - Unknown types are refused, unknown deletes are let through publicly
//! - Authorization follows the operation and stops the write early
//! - Validation failures are aggregated into one refusal
//! - Channels are assigned exactly once per accepted write
//! - Access assignments and custom actions see the computed state

use std::fs;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tempfile::TempDir;

use syncguard::access::{AccessError, HostUser, RecordingHost, PUBLIC_CHANNEL};
use syncguard::config::SyncConfig;
use syncguard::schema::{
    AccessAssignment, AuthorizationMap, Constraint, DocumentDefinition, DocumentSchema,
    Operation, PropertyValidator, SchemaLoader, TypeFilter, ValidatorKind,
};
use syncguard::sync::{CustomActions, LifecycleEvent, SyncError, SyncPipeline};

// =============================================================================
// Helper Functions
// =============================================================================

const LIBRARY_SCHEMA: &str = r#"{
    "definitions": [
        {
            "typeId": "book",
            "channels": { "view": "books", "add": "librarians", "replace": "editors", "remove": "admins" },
            "cannotDelete": false,
            "propertyValidators": [
                { "name": "type", "type": "string", "required": true },
                { "name": "title", "type": "string", "required": true, "mustNotBeEmpty": true },
                { "name": "isbn", "type": "string", "immutable": true, "regexPattern": "^[0-9-]+$" },
                { "name": "published", "type": "date", "minimumValue": "1450" },
                { "name": "tags", "type": "array", "arrayElementsValidator": { "type": "string" } }
            ],
            "accessAssignments": [
                { "type": "role", "users": ["curator"], "roles": ["reviewer"] }
            ]
        },
        {
            "typeId": "note",
            "typeFilter": { "kind": "idPrefix", "prefix": "note:" },
            "authorizedUsers": { "write": ["alice"] },
            "allowUnknownProperties": true
        }
    ]
}"#;

fn library() -> SyncPipeline {
    SyncPipeline::new(SchemaLoader::load_str("library", LIBRARY_SCHEMA).unwrap())
}

fn user(name: &str, channels: &[&str]) -> RecordingHost {
    RecordingHost::for_user(HostUser::new(name).with_channels(channels.iter().copied()))
}

fn book(title: &str) -> Value {
    json!({ "_id": "b1", "type": "book", "title": title, "isbn": "978-0441" })
}

// =============================================================================
// Type Resolution Scenarios
// =============================================================================

/// A write no definition claims is refused before anything else happens.
#[test]
fn test_unknown_type_refused() {
    let mut host = RecordingHost::admin();
    let err = library()
        .process(&json!({ "_id": "x", "type": "magazine" }), None, &mut host)
        .unwrap_err();

    assert_eq!(err.to_string(), "Unknown document type");
    assert!(err.is_forbidden());
    assert!(host.channel_calls().is_empty());
}

/// The same document deleted is accepted onto the public channel only.
#[test]
fn test_unknown_type_delete_accepted() {
    let mut host = user("anyone", &[]);
    let outcome = library()
        .process(&json!({ "_id": "x", "_deleted": true }), None, &mut host)
        .unwrap();

    assert_eq!(outcome.doc_type, None);
    assert_eq!(outcome.operation, Operation::Remove);
    assert_eq!(host.channel_calls(), &[vec![PUBLIC_CHANNEL.to_string()]]);
}

/// Deleting an already-deleted document never resolves a type.
#[test]
fn test_delete_of_tombstone_is_unresolved() {
    let tombstone = json!({ "_id": "b1", "type": "book", "_deleted": true });
    let mut host = user("anyone", &[]);
    let outcome = library()
        .process(&json!({ "_id": "b1", "_deleted": true }), Some(&tombstone), &mut host)
        .unwrap();

    assert_eq!(outcome.doc_type, None);
    assert_eq!(outcome.channels, vec![PUBLIC_CHANNEL]);
}

/// A replacement that changes `type` matches neither definition.
#[test]
fn test_type_change_is_unknown() {
    let old = book("Dune");
    let doc = json!({ "_id": "b1", "type": "magazine", "title": "Dune" });
    let err = library()
        .process(&doc, Some(&old), &mut RecordingHost::admin())
        .unwrap_err();
    assert!(matches!(err, SyncError::UnknownDocumentType));
}

/// Definitions are tried in declaration order.
#[test]
fn test_first_matching_definition_wins() {
    let schema = DocumentSchema::new(vec![
        DocumentDefinition::new("specific")
            .type_filter(TypeFilter::IdPrefix("item:special:".into()))
            .allow_unknown_properties(true)
            .channels(AuthorizationMap::new().write(["s"])),
        DocumentDefinition::new("general")
            .type_filter(TypeFilter::custom(|doc, _, _| {
                doc["_id"].as_str().map_or(false, |id| id.starts_with("item:"))
            }))
            .allow_unknown_properties(true)
            .channels(AuthorizationMap::new().write(["g"])),
    ])
    .unwrap();
    let pipeline = SyncPipeline::new(schema);

    let special = pipeline
        .process(&json!({ "_id": "item:special:1" }), None, &mut RecordingHost::admin())
        .unwrap();
    let general = pipeline
        .process(&json!({ "_id": "item:2" }), None, &mut RecordingHost::admin())
        .unwrap();

    assert_eq!(special.doc_type.as_deref(), Some("specific"));
    assert_eq!(general.doc_type.as_deref(), Some("general"));
}

// =============================================================================
// Authorization Scenarios
// =============================================================================

/// Each operation requires its own channel.
#[test]
fn test_operation_specific_channels() {
    let pipeline = library();
    let old = book("Dune");

    assert!(pipeline.process(&book("Dune"), None, &mut user("lib", &["librarians"])).is_ok());
    assert!(matches!(
        pipeline.process(&book("Dune"), None, &mut user("ed", &["editors"])),
        Err(SyncError::AuthorizationDenied(AccessError::MissingChannelAccess))
    ));

    let revised = book("Dune Messiah");
    assert!(pipeline.process(&revised, Some(&old), &mut user("ed", &["editors"])).is_ok());
    assert!(pipeline.process(&revised, Some(&old), &mut user("lib", &["librarians"])).is_err());

    let delete = json!({ "_id": "b1", "_deleted": true });
    assert!(pipeline.process(&delete, Some(&old), &mut user("adm", &["admins"])).is_ok());
    assert!(pipeline.process(&delete, Some(&old), &mut user("ed", &["editors"])).is_err());
}

/// A user-only requirement reports the precise denial.
#[test]
fn test_user_requirement() {
    let pipeline = library();
    let note = json!({ "_id": "note:1", "text": "hi" });

    assert!(pipeline.process(&note, None, &mut user("alice", &[])).is_ok());
    let err = pipeline.process(&note, None, &mut user("bob", &[])).unwrap_err();
    assert!(matches!(err, SyncError::AuthorizationDenied(AccessError::WrongUser)));
    assert_eq!(err.to_string(), "wrong user");
}

/// With nothing declared the host is asked for an empty channel set.
#[test]
fn test_undeclared_authorization_denies_regular_users() {
    let schema = DocumentSchema::new(vec![DocumentDefinition::new("open")
        .type_filter(TypeFilter::IdPrefix("open:".into()))
        .allow_unknown_properties(true)])
    .unwrap();
    let pipeline = SyncPipeline::new(schema);
    let doc = json!({ "_id": "open:1" });

    assert!(matches!(
        pipeline.process(&doc, None, &mut user("carol", &["everything"])),
        Err(SyncError::AuthorizationDenied(AccessError::MissingChannelAccess))
    ));
    assert!(pipeline.process(&doc, None, &mut RecordingHost::admin()).is_ok());
}

/// Roles or users: either one is enough, neither gives the generic denial.
#[test]
fn test_multiple_kinds() {
    let schema = DocumentSchema::new(vec![DocumentDefinition::new("report")
        .type_filter(TypeFilter::IdPrefix("report:".into()))
        .allow_unknown_properties(true)
        .authorized_roles(AuthorizationMap::new().write(["auditor"]))
        .authorized_users(AuthorizationMap::new().write(["dana"]))])
    .unwrap();
    let pipeline = SyncPipeline::new(schema);
    let doc = json!({ "_id": "report:q3" });

    let mut auditor = RecordingHost::for_user(HostUser::new("eli").with_roles(["auditor"]));
    assert!(pipeline.process(&doc, None, &mut auditor).is_ok());
    assert!(pipeline.process(&doc, None, &mut user("dana", &[])).is_ok());
    assert!(matches!(
        pipeline.process(&doc, None, &mut user("finn", &[])),
        Err(SyncError::AuthorizationDenied(AccessError::MissingChannelAccess))
    ));
}

// =============================================================================
// Validation Scenarios
// =============================================================================

/// All violations arrive in one refusal; nothing is assigned.
#[test]
fn test_aggregated_validation_failure() {
    let old = book("Dune");
    let doc = json!({
        "_id": "b1",
        "type": "book",
        "title": "",
        "isbn": "978-0442",
        "published": "1200",
        "tags": ["sf", 42]
    });
    let mut host = RecordingHost::admin();
    let err = library().process(&doc, Some(&old), &mut host).unwrap_err();

    let mut found = err.validation_errors().map(<[String]>::to_vec).unwrap_or_default();
    found.sort();
    let mut expected = vec![
        "item \"title\" must not be empty".to_string(),
        "value of item \"isbn\" may not be modified".to_string(),
        "item \"published\" must not be less than 1450".to_string(),
        "item \"tags[1]\" must be a string".to_string(),
    ];
    expected.sort();
    assert_eq!(found, expected);
    assert!(err.to_string().starts_with("Invalid book document: "));
    assert_eq!(err.to_string().matches("; ").count(), 3);
    assert!(host.channel_calls().is_empty());
    assert!(host.role_grants().is_empty());
}

/// A schema bug is a configuration error, not a refused write.
#[test]
fn test_configuration_error() {
    let schema = DocumentSchema::new(vec![DocumentDefinition::new("broken")
        .type_filter(TypeFilter::IdPrefix("broken:".into()))
        .properties(vec![
            PropertyValidator::string("a").required(true),
            PropertyValidator::new("state", ValidatorKind::Enum { predefined_values: None }),
        ])])
    .unwrap();
    let err = SyncPipeline::new(schema)
        .process(&json!({ "_id": "broken:1", "state": "on" }), None, &mut RecordingHost::admin())
        .unwrap_err();

    assert!(matches!(err, SyncError::Configuration(_)));
    assert!(!err.is_forbidden());
    assert_eq!(err.code(), "SYNC_SCHEMA_MISCONFIGURED");
}

// =============================================================================
// Assignment Scenarios
// =============================================================================

/// An accepted write assigns every declared channel once and grants roles.
#[test]
fn test_accepted_write_side_effects() {
    let mut host = RecordingHost::admin();
    let outcome = library().process(&book("Dune"), None, &mut host).unwrap();

    let channels = vec!["books", "librarians", "editors", "admins"];
    assert_eq!(outcome.channels, channels);
    assert_eq!(host.channel_calls().len(), 1);
    assert_eq!(host.assigned_channels(), Some(&outcome.channels[..]));
    assert_eq!(host.role_grants().len(), 1);
    assert_eq!(host.role_grants()[0].users, vec!["curator"]);
    assert_eq!(host.role_grants()[0].roles, vec!["role:reviewer"]);
}

/// Dynamic channels and grants are computed from the write.
#[test]
fn test_dynamic_assignments() {
    let members = |doc: &Value, _old: Option<&Value>| -> Vec<String> {
        doc["members"]
            .as_array()
            .map(|m| m.iter().filter_map(Value::as_str).map(String::from).collect())
            .unwrap_or_default()
    };
    let team_channel = |doc: &Value, _old: Option<&Value>| -> Vec<String> {
        vec![format!("team-{}", doc["_id"].as_str().unwrap_or_default())]
    };
    let def = DocumentDefinition::new("team")
        .type_filter(TypeFilter::IdPrefix("t".into()))
        .properties(vec![PropertyValidator::array(
            "members",
            Some(PropertyValidator::element(ValidatorKind::String { regex_pattern: None })),
        )])
        .channels(Constraint::dynamic(move |doc: &Value, old: Option<&Value>| {
            AuthorizationMap::new().view(team_channel(doc, old)).write(["team-admins"])
        }))
        .access_assignments(vec![AccessAssignment::channel(
            Constraint::dynamic(members),
            vec!["staff".to_string()],
            Constraint::dynamic(team_channel),
        )]);
    let pipeline = SyncPipeline::new(DocumentSchema::new(vec![def]).unwrap());

    let mut host = RecordingHost::admin();
    let outcome = pipeline
        .process(&json!({ "_id": "t7", "members": ["ana", "ben"] }), None, &mut host)
        .unwrap();

    assert_eq!(outcome.channels, vec!["team-t7", "team-admins"]);
    assert_eq!(host.access_grants().len(), 1);
    assert_eq!(host.access_grants()[0].grantees, vec!["ana", "ben", "role:staff"]);
    assert_eq!(host.access_grants()[0].channels, vec!["team-t7"]);
}

// =============================================================================
// Custom Action Scenarios
// =============================================================================

/// Hooks fire in pipeline order and see what has been computed so far.
#[test]
fn test_custom_action_metadata() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut actions = CustomActions::new();
    for event in LifecycleEvent::ALL {
        let seen = Arc::clone(&seen);
        actions = actions.on(event, move |_doc, _old, meta| {
            seen.lock().unwrap().push((
                meta.event,
                meta.authorization.is_some(),
                meta.access_assignments.is_some(),
                meta.channels.map(<[String]>::to_vec),
            ));
            Ok(())
        });
    }
    let def = DocumentDefinition::new("log")
        .type_filter(TypeFilter::IdPrefix("log:".into()))
        .allow_unknown_properties(true)
        .channels(AuthorizationMap::new().write(["logs"]))
        .custom_actions(actions);
    let pipeline = SyncPipeline::new(DocumentSchema::new(vec![def]).unwrap());

    pipeline
        .process(&json!({ "_id": "log:1" }), None, &mut RecordingHost::admin())
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            (LifecycleEvent::TypeIdentificationSucceeded, false, false, None),
            (LifecycleEvent::AuthorizationSucceeded, true, false, None),
            (LifecycleEvent::ValidationSucceeded, true, false, None),
            (
                LifecycleEvent::DocumentChannelAssignmentSucceeded,
                true,
                true,
                Some(vec!["logs".to_string()])
            ),
        ]
    );
}

/// A hook that refuses stops the write before channels are assigned.
#[test]
fn test_custom_action_refusal() {
    let actions = CustomActions::new().on(LifecycleEvent::ValidationSucceeded, |doc, _, _| {
        if doc.get("locked") == Some(&Value::Bool(true)) {
            Err("document is locked".to_string())
        } else {
            Ok(())
        }
    });
    let def = DocumentDefinition::new("log")
        .type_filter(TypeFilter::IdPrefix("log:".into()))
        .allow_unknown_properties(true)
        .custom_actions(actions);
    let pipeline = SyncPipeline::new(DocumentSchema::new(vec![def]).unwrap());

    let mut host = RecordingHost::admin();
    let err = pipeline
        .process(&json!({ "_id": "log:1", "locked": true }), None, &mut host)
        .unwrap_err();
    assert_eq!(err.to_string(), "document is locked");
    assert_eq!(err.code(), "SYNC_ACTION_REJECTED");
    assert!(host.channel_calls().is_empty());

    assert!(pipeline
        .process(&json!({ "_id": "log:2" }), None, &mut host)
        .is_ok());
}

// =============================================================================
// Files on Disk
// =============================================================================

/// Config and schema loaded from disk drive the same pipeline.
#[test]
fn test_config_and_schema_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("schema.json"), LIBRARY_SCHEMA).unwrap();
    let config_path = dir.path().join("syncguard.json");
    fs::write(
        &config_path,
        r#"{ "schema_path": "schema.json", "log_level": "error",
             "user": { "name": "lib", "channels": ["librarians"] } }"#,
    )
    .unwrap();

    let config = SyncConfig::load(&config_path).unwrap();
    let schema = SchemaLoader::load_file(&config.schema_path).unwrap();
    assert_eq!(schema.type_ids().collect::<Vec<_>>(), vec!["book", "note"]);

    let pipeline = SyncPipeline::new(schema);
    let mut host = config.host();
    let outcome = pipeline.process(&book("Dune"), None, &mut host).unwrap();
    assert_eq!(outcome.doc_type.as_deref(), Some("book"));

    let mut host = config.host();
    assert!(pipeline
        .process(&book("Dune Messiah"), Some(&book("Dune")), &mut host)
        .is_err());
}
