//! # Access Errors
//!
//! Denial signals raised by the host's require-access collaborators.

use thiserror::Error;

/// Result type for access checks
pub type AccessResult<T> = Result<T, AccessError>;

/// Why the caller may not perform a write
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Caller has none of the required channels
    #[error("missing channel access")]
    MissingChannelAccess,

    /// Caller has none of the required roles
    #[error("missing role")]
    MissingRole,

    /// Caller is not one of the required users
    #[error("wrong user")]
    WrongUser,
}

impl AccessError {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            AccessError::MissingChannelAccess => "SYNC_ACCESS_MISSING_CHANNEL",
            AccessError::MissingRole => "SYNC_ACCESS_MISSING_ROLE",
            AccessError::WrongUser => "SYNC_ACCESS_WRONG_USER",
        }
    }
}
