//! # Access
//!
//! Who may write a document, and what the write grants.
//!
//! - [`AuthorizationDecision`] resolves the channels, roles, and users an
//!   operation requires and enforces them through the host
//! - [`resolve_assignments`] and [`document_channels`] compute the grants
//!   an accepted write hands back to the host
//! - [`SyncHost`] is the seam to the document store; [`RecordingHost`] is
//!   the in-process implementation used by the CLI and tests

mod assignments;
mod authorization;
mod errors;
mod host;

pub use assignments::{
    document_channels, prefix_roles, resolve_assignments, AccessGrant, AssignmentPlan, RoleGrant,
    ROLE_PREFIX,
};
pub use authorization::AuthorizationDecision;
pub use errors::{AccessError, AccessResult};
pub use host::{HostUser, RecordingHost, SyncHost, PUBLIC_CHANNEL};
