//! Runtime configuration
//!
//! Loaded from a JSON file:
//!
//! ```json
//! {
//!   "schema_path": "schema.json",
//!   "log_level": "warn",
//!   "user": { "name": "alice", "roles": ["editor"], "channels": ["books"] }
//! }
//! ```
//!
//! A relative `schema_path` is resolved against the config file's directory.
//! Without a `user` block the caller is an administrator.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::access::{HostUser, RecordingHost};
use crate::observability::Severity;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Invalid config JSON: {0}")]
    Malformed(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Schema file (required)
    pub schema_path: PathBuf,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Caller used by the CLI host
    #[serde(default)]
    pub user: Option<HostUser>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl SyncConfig {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut config: SyncConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Malformed(e.to_string()))?;

        if config.schema_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.schema_path = dir.join(&config.schema_path);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.schema_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("schema_path must not be empty".into()));
        }

        if Severity::parse(&self.log_level).is_none() {
            return Err(ConfigError::Invalid(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error, fatal.",
                self.log_level
            )));
        }

        if let Some(user) = &self.user {
            if user.name.trim().is_empty() {
                return Err(ConfigError::Invalid("user.name must not be empty".into()));
            }
        }

        Ok(())
    }

    pub fn severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }

    /// Host for the configured caller
    pub fn host(&self) -> RecordingHost {
        match &self.user {
            Some(user) => RecordingHost::for_user(user.clone()),
            None => RecordingHost::admin(),
        }
    }
}
