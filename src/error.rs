//! Error types for the vaultsync reconciliation engine.

use std::fmt;
use thiserror::Error;

/// Local store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Failed to walk directory: {0}")]
    Walk(String),

    #[error("Directory still has content: {0}")]
    DirectoryNotEmpty(String),

    #[error("Store I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Details of a fingerprint/content disagreement detected while uploading.
///
/// Equal fingerprints must mean equal bytes and vice versa; when they do not,
/// the hashing or encoding layer is broken and the run stops.
#[derive(Debug, Clone)]
pub struct IntegrityViolation {
    pub path: String,
    pub local_fingerprint: String,
    pub remote_fingerprint: String,
    pub local_raw: String,
    pub remote_raw: String,
    pub local_encoded: String,
    pub remote_encoded: String,
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "integrity violation at '{}'", self.path)?;
        writeln!(f, "  local fingerprint:  {}", self.local_fingerprint)?;
        writeln!(f, "  remote fingerprint: {}", self.remote_fingerprint)?;
        writeln!(f, "  local raw:      {:?}", self.local_raw)?;
        writeln!(f, "  remote raw:     {:?}", self.remote_raw)?;
        writeln!(f, "  local encoded:  {}", self.local_encoded)?;
        write!(f, "  remote encoded: {}", self.remote_encoded)
    }
}

/// Sync-level errors
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Remote authentication failed: {0}")]
    RemoteAuthFailed(String),

    #[error("Remote rate limit exceeded: {0}")]
    RemoteRateLimit(String),

    #[error("Remote rejected the write (stale object id?): {0}")]
    RemoteRejected(String),

    #[error("Remote resource not found: {0}")]
    RemoteNotFound(String),

    #[error("Remote request failed: {0}")]
    RemoteRequestFailed(String),

    #[error("Remote error: {0}")]
    RemoteError(String),

    #[error("Local store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("{0}")]
    Integrity(Box<IntegrityViolation>),

    #[error("Another sync operation is already in progress")]
    Busy,

    #[error("Failed to get user input: {0}")]
    PromptFailed(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

impl SyncError {
    /// Transport and API failures; these abort a run before any mutation.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SyncError::RemoteAuthFailed(_)
                | SyncError::RemoteRateLimit(_)
                | SyncError::RemoteRequestFailed(_)
                | SyncError::RemoteError(_)
        )
    }
}

impl From<IntegrityViolation> for SyncError {
    fn from(violation: IntegrityViolation) -> Self {
        SyncError::Integrity(Box::new(violation))
    }
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::ConfigError(err.to_string())
    }
}
