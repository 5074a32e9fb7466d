//! Channel and access-assignment resolver

use serde::Serialize;
use serde_json::Value;

use super::host::SyncHost;
use crate::schema::{AccessAssignment, DocumentDefinition};

/// Marks a grantee as a role rather than a user
pub const ROLE_PREFIX: &str = "role:";

/// Channel access granted to users and prefixed roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessGrant {
    pub grantees: Vec<String>,
    pub channels: Vec<String>,
}

/// Role membership granted to users
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleGrant {
    pub users: Vec<String>,
    pub roles: Vec<String>,
}

/// Grants computed for one write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPlan {
    pub access_grants: Vec<AccessGrant>,
    pub role_grants: Vec<RoleGrant>,
}

impl AssignmentPlan {
    pub fn is_empty(&self) -> bool {
        self.access_grants.is_empty() && self.role_grants.is_empty()
    }

    /// Hand every grant to the host, access grants first
    pub fn apply(&self, host: &mut dyn SyncHost) {
        for grant in &self.access_grants {
            host.access(&grant.grantees, &grant.channels);
        }
        for grant in &self.role_grants {
            host.role(&grant.users, &grant.roles);
        }
    }
}

fn push_unique(target: &mut Vec<String>, entry: String) {
    if !target.contains(&entry) {
        target.push(entry);
    }
}

/// Prefix role names so the host can tell them from user names
pub fn prefix_roles(roles: &[String]) -> Vec<String> {
    roles
        .iter()
        .map(|role| {
            if role.starts_with(ROLE_PREFIX) {
                role.clone()
            } else {
                format!("{}{}", ROLE_PREFIX, role)
            }
        })
        .collect()
}

/// De-duplicated union of every channel the definition names
pub fn document_channels(
    definition: &DocumentDefinition,
    doc: &Value,
    old_doc: Option<&Value>,
) -> Vec<String> {
    definition
        .channels
        .as_ref()
        .map(|c| c.resolve(doc, old_doc).all_entries())
        .unwrap_or_default()
}

/// Evaluate the definition's access assignments for this write.
///
/// Assignments with nobody to grant to, or nothing to grant, are skipped.
pub fn resolve_assignments(
    definition: &DocumentDefinition,
    doc: &Value,
    old_doc: Option<&Value>,
) -> AssignmentPlan {
    let mut plan = AssignmentPlan::default();
    let Some(assignments) = &definition.access_assignments else {
        return plan;
    };

    for assignment in assignments.resolve(doc, old_doc).iter() {
        match assignment {
            AccessAssignment::Channel {
                users,
                roles,
                channels,
            } => {
                let mut grantees = Vec::new();
                for user in users.resolve(doc, old_doc).iter() {
                    push_unique(&mut grantees, user.clone());
                }
                for role in prefix_roles(&roles.resolve(doc, old_doc)) {
                    push_unique(&mut grantees, role);
                }
                let channels = channels.resolve(doc, old_doc).into_owned();
                if !grantees.is_empty() && !channels.is_empty() {
                    plan.access_grants.push(AccessGrant { grantees, channels });
                }
            }
            AccessAssignment::Role { users, roles } => {
                let users = users.resolve(doc, old_doc).into_owned();
                let roles = prefix_roles(&roles.resolve(doc, old_doc));
                if !users.is_empty() && !roles.is_empty() {
                    plan.role_grants.push(RoleGrant { users, roles });
                }
            }
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::host::RecordingHost;
    use crate::schema::{AuthorizationMap, Constraint};
    use serde_json::json;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_document_channels_union() {
        let def = DocumentDefinition::new("book").channels(
            AuthorizationMap::new()
                .view(["read", "shared"])
                .add(["shared", "write"])
                .remove(["admin"]),
        );
        assert_eq!(
            document_channels(&def, &json!({}), None),
            strings(&["read", "shared", "write", "admin"])
        );
        assert!(document_channels(&DocumentDefinition::new("x"), &json!({}), None).is_empty());
    }

    #[test]
    fn test_roles_are_prefixed() {
        assert_eq!(
            prefix_roles(&strings(&["staff", "role:admin"])),
            strings(&["role:staff", "role:admin"])
        );
    }

    #[test]
    fn test_resolve_and_apply() {
        let def = DocumentDefinition::new("team").access_assignments(vec![
            AccessAssignment::channel(strings(&["alice"]), strings(&["staff"]), strings(&["team-1"])),
            AccessAssignment::role(strings(&["bob"]), strings(&["lead"])),
            AccessAssignment::channel(Vec::<String>::new(), Vec::<String>::new(), strings(&["skipped"])),
            AccessAssignment::role(strings(&["carol"]), Vec::<String>::new()),
        ]);

        let plan = resolve_assignments(&def, &json!({}), None);
        assert_eq!(plan.access_grants.len(), 1);
        assert_eq!(plan.access_grants[0].grantees, strings(&["alice", "role:staff"]));
        assert_eq!(plan.role_grants.len(), 1);
        assert_eq!(plan.role_grants[0].roles, strings(&["role:lead"]));

        let mut host = RecordingHost::admin();
        plan.apply(&mut host);
        assert_eq!(host.access_grants(), plan.access_grants.as_slice());
        assert_eq!(host.role_grants(), plan.role_grants.as_slice());
    }

    #[test]
    fn test_dynamic_members() {
        let def = DocumentDefinition::new("team").access_assignments(vec![AccessAssignment::channel(
            Constraint::dynamic(|doc: &Value, _old: Option<&Value>| -> Vec<String> {
                doc["members"]
                    .as_array()
                    .map(|m| m.iter().filter_map(Value::as_str).map(String::from).collect())
                    .unwrap_or_default()
            }),
            Vec::<String>::new(),
            Constraint::dynamic(|doc: &Value, _old: Option<&Value>| -> Vec<String> {
                vec![format!("team-{}", doc["_id"].as_str().unwrap_or_default())]
            }),
        )]);

        let plan = resolve_assignments(&def, &json!({ "_id": "7", "members": ["a", "b"] }), None);
        assert_eq!(
            plan.access_grants,
            vec![AccessGrant {
                grantees: strings(&["a", "b"]),
                channels: strings(&["team-7"]),
            }]
        );
    }
}
