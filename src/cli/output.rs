//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::SyncError;

/// Map domain errors to a message for CLI output, with a hint where one helps.
pub fn map_error(e: &SyncError) -> String {
    match e {
        SyncError::RemoteAuthFailed(_) => format!(
            "{}\nhint: check the token in VAULTSYNC_TOKEN or GITHUB_TOKEN",
            e
        ),
        SyncError::RemoteRateLimit(_) => format!("{}\nhint: wait a while and retry", e),
        SyncError::Busy => format!("{}\nhint: wait for the running sync to finish", e),
        SyncError::RemoteNotFound(_) => format!(
            "{}\nhint: check remote.owner and remote.repository, or run `vaultsync repo create`",
            e
        ),
        _ => e.to_string(),
    }
}

/// Process exit code for an error
pub fn exit_code(e: &SyncError) -> i32 {
    match e {
        SyncError::ConfigError(_) => 2,
        SyncError::Integrity(_) => 3,
        SyncError::Busy => 4,
        _ => 1,
    }
}
