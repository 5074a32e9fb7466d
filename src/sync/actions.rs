//! Custom actions
//!
//! Optional hooks a document definition runs after each pipeline step
//! succeeds. A hook sees the write and everything computed so far, and may
//! refuse the write by returning an error message.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::access::{AssignmentPlan, AuthorizationDecision};
use crate::schema::DocumentDefinition;

/// Pipeline points a custom action can attach to, in firing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LifecycleEvent {
    TypeIdentificationSucceeded,
    AuthorizationSucceeded,
    ValidationSucceeded,
    AccessAssignmentsSucceeded,
    DocumentChannelAssignmentSucceeded,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 5] = [
        LifecycleEvent::TypeIdentificationSucceeded,
        LifecycleEvent::AuthorizationSucceeded,
        LifecycleEvent::ValidationSucceeded,
        LifecycleEvent::AccessAssignmentsSucceeded,
        LifecycleEvent::DocumentChannelAssignmentSucceeded,
    ];

    /// Hook name as written in schema sources
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::TypeIdentificationSucceeded => "onTypeIdentificationSucceeded",
            LifecycleEvent::AuthorizationSucceeded => "onAuthorizationSucceeded",
            LifecycleEvent::ValidationSucceeded => "onValidationSucceeded",
            LifecycleEvent::AccessAssignmentsSucceeded => "onAccessAssignmentsSucceeded",
            LifecycleEvent::DocumentChannelAssignmentSucceeded => {
                "onDocumentChannelAssignmentSucceeded"
            }
        }
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the pipeline knows when a hook fires.
///
/// Fields computed by later steps are `None`.
#[derive(Debug, Clone, Copy)]
pub struct ActionMetadata<'a> {
    pub type_id: &'a str,
    pub definition: &'a DocumentDefinition,
    pub authorization: Option<&'a AuthorizationDecision>,
    pub access_assignments: Option<&'a AssignmentPlan>,
    pub channels: Option<&'a [String]>,
    pub event: LifecycleEvent,
}

/// Hook signature: `(doc, old_doc, metadata)`
pub type CustomActionFn =
    dyn Fn(&Value, Option<&Value>, &ActionMetadata<'_>) -> Result<(), String> + Send + Sync;

/// One optional hook per [`LifecycleEvent`]
#[derive(Clone, Default)]
pub struct CustomActions {
    slots: [Option<Arc<CustomActionFn>>; 5],
}

impl CustomActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `action` to `event`, replacing any previous hook
    pub fn on<F>(mut self, event: LifecycleEvent, action: F) -> Self
    where
        F: Fn(&Value, Option<&Value>, &ActionMetadata<'_>) -> Result<(), String>
            + Send
            + Sync
            + 'static,
    {
        self.slots[event.slot()] = Some(Arc::new(action));
        self
    }

    pub fn has(&self, event: LifecycleEvent) -> bool {
        self.slots[event.slot()].is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Run the hook for `metadata.event`, if one is attached
    pub fn run(
        &self,
        doc: &Value,
        old_doc: Option<&Value>,
        metadata: &ActionMetadata<'_>,
    ) -> Result<(), String> {
        match &self.slots[metadata.event.slot()] {
            Some(action) => action(doc, old_doc, metadata),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for CustomActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(LifecycleEvent::ALL.iter().filter(|e| self.has(**e)).map(|e| e.as_str()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_events_fire_in_declared_order() {
        let mut sorted = LifecycleEvent::ALL;
        sorted.sort();
        assert_eq!(sorted, LifecycleEvent::ALL);
        assert_eq!(
            LifecycleEvent::ValidationSucceeded.to_string(),
            "onValidationSucceeded"
        );
    }

    #[test]
    fn test_only_attached_slot_runs() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let actions = CustomActions::new().on(LifecycleEvent::ValidationSucceeded, |_, _, meta| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            assert_eq!(meta.type_id, "book");
            Ok(())
        });
        let definition = DocumentDefinition::new("book");
        let doc = json!({});

        for event in LifecycleEvent::ALL {
            let metadata = ActionMetadata {
                type_id: "book",
                definition: &definition,
                authorization: None,
                access_assignments: None,
                channels: None,
                event,
            };
            assert!(actions.run(&doc, None, &metadata).is_ok());
        }
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert!(actions.has(LifecycleEvent::ValidationSucceeded));
        assert!(!actions.has(LifecycleEvent::AuthorizationSucceeded));
    }

    #[test]
    fn test_hook_can_refuse() {
        let actions = CustomActions::new()
            .on(LifecycleEvent::TypeIdentificationSucceeded, |doc, _, _| {
                if doc.get("locked").is_some() {
                    Err("document is locked".to_string())
                } else {
                    Ok(())
                }
            });
        let definition = DocumentDefinition::new("book");
        let metadata = ActionMetadata {
            type_id: "book",
            definition: &definition,
            authorization: None,
            access_assignments: None,
            channels: None,
            event: LifecycleEvent::TypeIdentificationSucceeded,
        };
        assert_eq!(
            actions.run(&json!({ "locked": true }), None, &metadata),
            Err("document is locked".to_string())
        );
        assert!(format!("{:?}", actions).contains("onTypeIdentificationSucceeded"));
    }
}
