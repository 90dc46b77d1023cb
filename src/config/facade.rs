//! Config loader: assembles the layered sources and deserializes the result.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::VaultSyncConfig;
use crate::error::SyncError;
use config::File;
use std::path::Path;
use tracing::debug;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace file,
    /// `VAULTSYNC_*` environment, token variables.
    pub fn load(workspace_root: &Path) -> Result<VaultSyncConfig, SyncError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder)?;

        let config: VaultSyncConfig = builder.build()?.try_deserialize()?;
        debug!(
            workspace = %workspace_root.display(),
            owner = ?config.remote.owner,
            repository = ?config.remote.repository,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load a single explicit file on top of the defaults
    pub fn load_from_file(path: &Path) -> Result<VaultSyncConfig, SyncError> {
        if !path.exists() {
            return Err(SyncError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = merge_policy::builder_with_defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}
