//! Host collaborators
//!
//! The surrounding document store decides who the caller is and records
//! the grants a write produces. The pipeline only talks to it through
//! [`SyncHost`].

use serde::{Deserialize, Serialize};

use super::assignments::{AccessGrant, RoleGrant};
use super::errors::{AccessError, AccessResult};

/// Channel every caller can read
pub const PUBLIC_CHANNEL: &str = "!";

/// Callbacks provided by the document store
pub trait SyncHost {
    /// Pass if the caller can access ANY of `channels`
    fn require_access(&self, channels: &[String]) -> AccessResult<()>;

    /// Pass if the caller holds ANY of `roles`
    fn require_role(&self, roles: &[String]) -> AccessResult<()>;

    /// Pass if the caller is ANY of `users`
    fn require_user(&self, users: &[String]) -> AccessResult<()>;

    /// Assign channels to the document being written
    fn channel(&mut self, channels: &[String]);

    /// Grant channel access; role grantees carry the role prefix
    fn access(&mut self, grantees: &[String], channels: &[String]);

    /// Grant role membership; roles carry the role prefix
    fn role(&mut self, users: &[String], roles: &[String]);
}

/// The caller as seen by [`RecordingHost`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostUser {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub channels: Vec<String>,
}

impl HostUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_roles<I: IntoIterator<Item = S>, S: Into<String>>(mut self, roles: I) -> Self {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_channels<I: IntoIterator<Item = S>, S: Into<String>>(mut self, channels: I) -> Self {
        self.channels = channels.into_iter().map(Into::into).collect();
        self
    }
}

/// In-process host that authorizes against a fixed caller and records
/// every grant.
///
/// With no user the caller is an administrator and every check passes.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    user: Option<HostUser>,
    assigned_channels: Vec<Vec<String>>,
    access_grants: Vec<AccessGrant>,
    role_grants: Vec<RoleGrant>,
}

impl RecordingHost {
    /// Host for an administrative caller
    pub fn admin() -> Self {
        Self::default()
    }

    /// Host for a regular caller
    pub fn for_user(user: HostUser) -> Self {
        Self {
            user: Some(user),
            ..Default::default()
        }
    }

    pub fn user(&self) -> Option<&HostUser> {
        self.user.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_none()
    }

    /// Every `channel` call, in order
    pub fn channel_calls(&self) -> &[Vec<String>] {
        &self.assigned_channels
    }

    /// Channels from the last `channel` call
    pub fn assigned_channels(&self) -> Option<&[String]> {
        self.assigned_channels.last().map(Vec::as_slice)
    }

    pub fn access_grants(&self) -> &[AccessGrant] {
        &self.access_grants
    }

    pub fn role_grants(&self) -> &[RoleGrant] {
        &self.role_grants
    }
}

impl SyncHost for RecordingHost {
    fn require_access(&self, channels: &[String]) -> AccessResult<()> {
        let Some(user) = &self.user else {
            return Ok(());
        };
        let granted = channels
            .iter()
            .any(|c| c == PUBLIC_CHANNEL || user.channels.contains(c));
        if granted {
            Ok(())
        } else {
            Err(AccessError::MissingChannelAccess)
        }
    }

    fn require_role(&self, roles: &[String]) -> AccessResult<()> {
        let Some(user) = &self.user else {
            return Ok(());
        };
        if roles.iter().any(|r| user.roles.contains(r)) {
            Ok(())
        } else {
            Err(AccessError::MissingRole)
        }
    }

    fn require_user(&self, users: &[String]) -> AccessResult<()> {
        let Some(user) = &self.user else {
            return Ok(());
        };
        if users.contains(&user.name) {
            Ok(())
        } else {
            Err(AccessError::WrongUser)
        }
    }

    fn channel(&mut self, channels: &[String]) {
        self.assigned_channels.push(channels.to_vec());
    }

    fn access(&mut self, grantees: &[String], channels: &[String]) {
        self.access_grants.push(AccessGrant {
            grantees: grantees.to_vec(),
            channels: channels.to_vec(),
        });
    }

    fn role(&mut self, users: &[String], roles: &[String]) {
        self.role_grants.push(RoleGrant {
            users: users.to_vec(),
            roles: roles.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_admin_passes_everything() {
        let host = RecordingHost::admin();
        assert!(host.require_access(&[]).is_ok());
        assert!(host.require_role(&strings(&["x"])).is_ok());
        assert!(host.require_user(&strings(&["y"])).is_ok());
    }

    #[test]
    fn test_user_checks() {
        let host = RecordingHost::for_user(
            HostUser::new("alice").with_roles(["editor"]).with_channels(["books"]),
        );

        assert!(host.require_access(&strings(&["other", "books"])).is_ok());
        assert_eq!(
            host.require_access(&strings(&["other"])),
            Err(AccessError::MissingChannelAccess)
        );
        assert_eq!(host.require_access(&[]), Err(AccessError::MissingChannelAccess));
        assert!(host.require_access(&strings(&[PUBLIC_CHANNEL])).is_ok());

        assert!(host.require_role(&strings(&["editor"])).is_ok());
        assert_eq!(host.require_role(&strings(&["admin"])), Err(AccessError::MissingRole));

        assert!(host.require_user(&strings(&["bob", "alice"])).is_ok());
        assert_eq!(host.require_user(&strings(&["bob"])), Err(AccessError::WrongUser));
    }

    #[test]
    fn test_records_calls() {
        let mut host = RecordingHost::admin();
        host.channel(&strings(&["a", "b"]));
        host.access(&strings(&["alice", "role:staff"]), &strings(&["a"]));
        host.role(&strings(&["bob"]), &strings(&["role:staff"]));

        assert_eq!(host.assigned_channels(), Some(&strings(&["a", "b"])[..]));
        assert_eq!(host.channel_calls().len(), 1);
        assert_eq!(host.access_grants()[0].grantees, strings(&["alice", "role:staff"]));
        assert_eq!(host.role_grants()[0].roles, strings(&["role:staff"]));
    }
}
