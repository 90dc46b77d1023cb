//! Configuration System
//!
//! Layered configuration: built-in defaults, the global user file, the
//! workspace file under `.vaultsync/`, then `VAULTSYNC_*` environment
//! variables. Validation runs before any store is opened.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

pub use crate::orchestrator::SyncSettings;
pub use crate::remote::RemoteConfig;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;
pub use sources::workspace_file::{workspace_config_path, WORKSPACE_DIR};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultSyncConfig {
    /// Remote repository profile
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Sync behaviour
    #[serde(default)]
    pub sync: SyncSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Remote(String),
    Sync(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Remote(msg) => write!(f, "Remote: {}", msg),
            ValidationError::Sync(msg) => write!(f, "Sync: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl VaultSyncConfig {
    /// Validate the entire configuration; every problem is reported.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(remote_errors) = self.remote.validate() {
            errors.extend(remote_errors.into_iter().map(ValidationError::Remote));
        }
        if let Err(sync_errors) = self.sync.validate() {
            errors.extend(sync_errors.into_iter().map(ValidationError::Sync));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Repository name, once validated
    pub fn repository(&self) -> &str {
        self.remote.repository.as_deref().unwrap_or_default()
    }
}
