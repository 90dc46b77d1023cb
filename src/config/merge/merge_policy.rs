//! Merge rules: defaults, override order, conflict handling.

use crate::apply::remote::DEFAULT_EMPTY_FILE_PLACEHOLDER;
use crate::apply::DEFAULT_MAX_CONCURRENT_TRANSFERS;
use crate::orchestrator::DEFAULT_AUTO_SYNC_INTERVAL_SECS;
use crate::remote::profile::DEFAULT_API_BASE_URL;
use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("remote.api_base_url", DEFAULT_API_BASE_URL)?
        .set_default("remote.private", true)?
        .set_default(
            "sync.auto_sync_interval_secs",
            DEFAULT_AUTO_SYNC_INTERVAL_SECS,
        )?
        .set_default("sync.conflict_policy", "newest_overall")?
        .set_default(
            "sync.max_concurrent_transfers",
            DEFAULT_MAX_CONCURRENT_TRANSFERS as u64,
        )?
        .set_default("sync.empty_file_placeholder", DEFAULT_EMPTY_FILE_PLACEHOLDER)
}
