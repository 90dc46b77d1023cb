//! Remote Store Abstraction
//!
//! Narrow interface to the content-addressed remote replica: list a
//! directory, get/put/delete one object, ask when a path last changed, and
//! manage the repository itself. Object ids are git blob ids, so they are
//! directly comparable with locally computed fingerprints.

use crate::error::SyncError;
use crate::types::EntryKind;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod github;
pub mod memory;
pub mod profile;

pub use github::GitHubStore;
pub use memory::MemoryRemoteStore;
pub use profile::RemoteConfig;

/// One child returned by a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteItem {
    pub path: String,
    pub kind: EntryKind,
    pub object_id: String,
}

/// A downloaded object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    pub content: Vec<u8>,
    pub object_id: String,
}

/// Remote store interface
///
/// Absence is never an error: lookups return `None` for paths that do not
/// exist. Errors are transport, authentication or rejection failures.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Children of a directory (`""` is the root); `None` when the directory does not exist
    async fn list_children(&self, path: &str) -> Result<Option<Vec<RemoteItem>>, SyncError>;

    /// Content and object id of a file; `None` when absent
    async fn get_object(&self, path: &str) -> Result<Option<RemoteObject>, SyncError>;

    /// Create or update a file. `base_object_id` must name the current object
    /// when one exists; a stale id is rejected. Returns the new object id.
    async fn put_object(
        &self,
        path: &str,
        content: &[u8],
        base_object_id: Option<&str>,
    ) -> Result<String, SyncError>;

    /// Delete a file identified by its current object id
    async fn delete_object(&self, path: &str, object_id: &str) -> Result<(), SyncError>;

    /// Time of the most recent history entry touching exactly this path
    async fn last_change_time(&self, path: &str) -> Result<Option<DateTime<Utc>>, SyncError>;

    async fn create_repository(&self, name: &str) -> Result<(), SyncError>;

    async fn delete_repository(&self, name: &str) -> Result<(), SyncError>;

    async fn repository_exists(&self, name: &str) -> Result<bool, SyncError>;

    /// Human-readable location, for logs and CLI output
    fn describe(&self) -> String;
}
