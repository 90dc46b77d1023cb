//! Local Store
//!
//! Access layer for the local tree. The scanner reads through it and the
//! pull-direction applier writes through it; nothing else touches the tree.

pub mod fs;
pub mod memory;

pub use fs::FsLocalStore;
pub use memory::MemoryLocalStore;

use crate::error::StoreError;
use crate::types::EntryKind;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One listed local entry, before fingerprinting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalItem {
    pub path: String,
    pub kind: EntryKind,
    pub modified_at: DateTime<Utc>,
}

/// Local store interface
///
/// Paths are snapshot paths (relative, `/`-separated). Writes create or
/// overwrite and create missing parent directories.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// List every file and directory below the root
    async fn list_all(&self) -> Result<Vec<LocalItem>, StoreError>;

    async fn read_text(&self, path: &str) -> Result<String, StoreError>;

    async fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StoreError>;

    async fn write_text(&self, path: &str, content: &str) -> Result<(), StoreError>;

    async fn write_bytes(&self, path: &str, content: &[u8]) -> Result<(), StoreError>;

    /// Delete a file or an empty directory.
    ///
    /// A directory that still has entries is left alone and reported as
    /// [`StoreError::DirectoryNotEmpty`].
    async fn delete(&self, path: &str) -> Result<(), StoreError>;

    /// Create a directory (idempotent)
    async fn create_directory(&self, path: &str) -> Result<(), StoreError>;

    async fn exists(&self, path: &str) -> Result<bool, StoreError>;
}
