//! Authorization evaluator
//!
//! A write is authorized when ANY declared kind of requirement is met:
//! channels, roles, or users. Each kind is checked through the host.
//! When nothing is declared for the operation, an empty channel
//! requirement is issued so that the host denies by default.

use serde::Serialize;
use serde_json::Value;

use super::errors::{AccessError, AccessResult};
use super::host::SyncHost;
use crate::schema::{AuthorizationMap, Constraint, DocumentDefinition, Operation};

/// Channels, roles, and users required for one write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthorizationDecision {
    pub operation: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
}

fn requirements(
    map: Option<&Constraint<AuthorizationMap>>,
    doc: &Value,
    old_doc: Option<&Value>,
    operation: Operation,
) -> Option<Vec<String>> {
    map.and_then(|m| m.resolve(doc, old_doc).requirements(operation))
}

impl AuthorizationDecision {
    /// Resolve the definition's maps for this write.
    ///
    /// `old_doc` must be the effective old document.
    pub fn resolve(definition: &DocumentDefinition, doc: &Value, old_doc: Option<&Value>) -> Self {
        let operation = Operation::of(doc, old_doc);
        Self {
            operation: Some(operation),
            channels: requirements(definition.channels.as_ref(), doc, old_doc, operation),
            roles: requirements(definition.authorized_roles.as_ref(), doc, old_doc, operation),
            users: requirements(definition.authorized_users.as_ref(), doc, old_doc, operation),
        }
    }

    /// Number of requirement kinds declared for the operation
    pub fn declared_kinds(&self) -> usize {
        [&self.channels, &self.roles, &self.users]
            .into_iter()
            .filter(|kind| kind.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.declared_kinds() == 0
    }

    /// Ask the host to enforce the decision.
    ///
    /// # Errors
    ///
    /// The denial of the only declared kind, or `MissingChannelAccess` when
    /// several kinds were declared and none passed.
    pub fn enforce(&self, host: &dyn SyncHost) -> AccessResult<()> {
        if self.is_empty() {
            return host.require_access(&[]);
        }

        let mut last_denial = None;
        let outcomes = [
            self.channels.as_ref().map(|c| host.require_access(c)),
            self.roles.as_ref().map(|r| host.require_role(r)),
            self.users.as_ref().map(|u| host.require_user(u)),
        ];

        for outcome in outcomes.into_iter().flatten() {
            match outcome {
                Ok(()) => return Ok(()),
                Err(denial) => last_denial = Some(denial),
            }
        }

        match last_denial {
            Some(denial) if self.declared_kinds() == 1 => Err(denial),
            _ => Err(AccessError::MissingChannelAccess),
        }
    }
}
