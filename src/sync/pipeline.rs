//! Write pipeline
//!
//! Per write, in order:
//! 1. resolve the document type
//! 2. authorize the caller
//! 3. validate the document
//! 4. grant access assignments
//! 5. assign channels
//!
//! Each step fires the matching custom action once it succeeds. The first
//! failure aborts the write; nothing after it runs.

use serde::Serialize;
use serde_json::Value;

use super::actions::{ActionMetadata, LifecycleEvent};
use super::errors::{SyncError, SyncResult};
use super::resolver::resolve_type;
use crate::access::{
    document_channels, resolve_assignments, AssignmentPlan, AuthorizationDecision, SyncHost,
    PUBLIC_CHANNEL,
};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{doc_id, effective_old_doc, is_deleted, DocumentDefinition, DocumentSchema, Operation};
use crate::validation::DocumentValidator;

/// What an accepted write produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOutcome {
    /// `None` for an accepted delete of an unidentifiable document
    pub doc_type: Option<String>,
    pub operation: Operation,
    pub channels: Vec<String>,
    #[serde(flatten)]
    pub assignments: AssignmentPlan,
}

/// Decides writes against one schema
#[derive(Debug, Clone)]
pub struct SyncPipeline {
    schema: DocumentSchema,
}

/// Fields attached to every pipeline log line
struct LogContext {
    doc_id: String,
    doc_type: String,
    operation: Operation,
}

impl LogContext {
    fn emit(&self, event: Event, extra: &[(&str, &str)]) {
        let mut fields = vec![
            ("doc_id", self.doc_id.as_str()),
            ("doc_type", self.doc_type.as_str()),
            ("operation", self.operation.as_str()),
        ];
        fields.extend_from_slice(extra);
        log_event_with_fields(event, &fields);
    }
}

/// Per-write state threaded through the steps
struct Write<'w> {
    doc: &'w Value,
    old_doc: Option<&'w Value>,
    definition: &'w DocumentDefinition,
    log: LogContext,
}

impl<'w> Write<'w> {
    fn fire(&self, metadata: ActionMetadata<'_>) -> SyncResult<()> {
        let event = metadata.event;
        self.definition
            .custom_actions
            .run(self.doc, self.old_doc, &metadata)
            .map_err(|message| {
                self.log.emit(
                    Event::CustomActionRejected,
                    &[("action", event.as_str()), ("message", message.as_str())],
                );
                SyncError::ActionRejected { event, message }
            })
    }

    fn metadata(&self, event: LifecycleEvent) -> ActionMetadata<'w> {
        ActionMetadata {
            type_id: &self.definition.type_id,
            definition: self.definition,
            authorization: None,
            access_assignments: None,
            channels: None,
            event,
        }
    }
}

impl SyncPipeline {
    pub fn new(schema: DocumentSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &DocumentSchema {
        &self.schema
    }

    /// Decide one write.
    ///
    /// `old_doc` is the stored revision, if any, exactly as stored (it may
    /// be a tombstone).
    ///
    /// # Errors
    ///
    /// The first refusal, or `Configuration` if the schema is broken.
    pub fn process(
        &self,
        doc: &Value,
        old_doc: Option<&Value>,
        host: &mut dyn SyncHost,
    ) -> SyncResult<WriteOutcome> {
        let effective_old = effective_old_doc(old_doc);
        let operation = Operation::of(doc, effective_old);
        let id = doc_id(doc).unwrap_or_default().to_string();

        let Some(definition) = resolve_type(&self.schema, doc, old_doc) else {
            return self.unresolved(doc, id, operation, host);
        };

        let write = Write {
            doc,
            old_doc,
            definition,
            log: LogContext {
                doc_id: id,
                doc_type: definition.type_id.clone(),
                operation,
            },
        };

        write.log.emit(Event::TypeResolved, &[]);
        write.fire(write.metadata(LifecycleEvent::TypeIdentificationSucceeded))?;

        let authorization = AuthorizationDecision::resolve(definition, doc, effective_old);
        if let Err(denial) = authorization.enforce(host) {
            let reason = denial.to_string();
            write.log.emit(Event::AuthorizationDenied, &[("reason", reason.as_str())]);
            return Err(SyncError::AuthorizationDenied(denial));
        }
        write.log.emit(Event::AuthorizationGranted, &[]);
        write.fire(ActionMetadata {
            authorization: Some(&authorization),
            ..write.metadata(LifecycleEvent::AuthorizationSucceeded)
        })?;

        let errors = DocumentValidator::new(definition)
            .validate(doc, old_doc)
            .map_err(|e| {
                write.log.emit(Event::ConfigurationError, &[("message", e.message())]);
                SyncError::Configuration(e)
            })?;
        if !errors.is_empty() {
            let count = errors.len().to_string();
            write.log.emit(Event::ValidationFailed, &[("errors", count.as_str())]);
            return Err(SyncError::ValidationFailed {
                doc_type: definition.type_id.clone(),
                errors,
            });
        }
        write.log.emit(Event::ValidationPassed, &[]);
        write.fire(ActionMetadata {
            authorization: Some(&authorization),
            ..write.metadata(LifecycleEvent::ValidationSucceeded)
        })?;

        let assignments = if is_deleted(doc) {
            AssignmentPlan::default()
        } else {
            resolve_assignments(definition, doc, effective_old)
        };
        if !is_deleted(doc) && definition.access_assignments.is_some() {
            assignments.apply(host);
            let grants = (assignments.access_grants.len() + assignments.role_grants.len()).to_string();
            write.log.emit(Event::AccessAssigned, &[("grants", grants.as_str())]);
            write.fire(ActionMetadata {
                authorization: Some(&authorization),
                access_assignments: Some(&assignments),
                ..write.metadata(LifecycleEvent::AccessAssignmentsSucceeded)
            })?;
        }

        let channels = document_channels(definition, doc, effective_old);
        host.channel(&channels);
        let joined = channels.join(",");
        write.log.emit(Event::ChannelsAssigned, &[("channels", joined.as_str())]);
        write.fire(ActionMetadata {
            authorization: Some(&authorization),
            access_assignments: Some(&assignments),
            channels: Some(&channels),
            ..write.metadata(LifecycleEvent::DocumentChannelAssignmentSucceeded)
        })?;

        Ok(WriteOutcome {
            doc_type: Some(definition.type_id.clone()),
            operation,
            channels,
            assignments,
        })
    }

    /// No definition matched: deletes are let through on the public
    /// channel, anything else is refused
    fn unresolved(
        &self,
        doc: &Value,
        doc_id: String,
        operation: Operation,
        host: &mut dyn SyncHost,
    ) -> SyncResult<WriteOutcome> {
        let log = LogContext {
            doc_id,
            doc_type: String::new(),
            operation,
        };

        if !is_deleted(doc) {
            log.emit(Event::TypeUnresolved, &[]);
            return Err(SyncError::UnknownDocumentType);
        }

        let channels = vec![PUBLIC_CHANNEL.to_string()];
        host.channel(&channels);
        log.emit(Event::UnknownTypeDeleteAccepted, &[]);
        Ok(WriteOutcome {
            doc_type: None,
            operation,
            channels,
            assignments: AssignmentPlan::default(),
        })
    }
}
