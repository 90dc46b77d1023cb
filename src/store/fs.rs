//! Filesystem-backed local store

use crate::error::StoreError;
use crate::store::{LocalItem, LocalStore};
use crate::tree::path;
use crate::tree::walker::{Entry, Walker, WalkerConfig};
use crate::types::EntryKind;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Local store rooted at a directory on disk
#[derive(Debug, Clone)]
pub struct FsLocalStore {
    root: PathBuf,
    walker_config: WalkerConfig,
}

impl FsLocalStore {
    /// Open a store rooted at `root`; the directory must exist.
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        let root = path::canonicalize_root(root)?;
        if !root.is_dir() {
            return Err(StoreError::InvalidPath(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            root,
            walker_config: WalkerConfig::default(),
        })
    }

    /// Skip additional component names while listing
    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.walker_config.ignore_patterns = patterns;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf, StoreError> {
        path::resolve_under(&self.root, relative)
    }

    async fn ensure_parent(&self, target: &Path) -> Result<(), StoreError> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl LocalStore for FsLocalStore {
    async fn list_all(&self) -> Result<Vec<LocalItem>, StoreError> {
        let walker = Walker::with_config(self.root.clone(), self.walker_config.clone());
        let entries = tokio::task::spawn_blocking(move || walker.walk())
            .await
            .map_err(|e| StoreError::Walk(format!("walker task failed: {}", e)))??;

        Ok(entries
            .into_iter()
            .map(|entry| match entry {
                Entry::File { path, modified_at } => LocalItem {
                    path,
                    kind: EntryKind::File,
                    modified_at,
                },
                Entry::Directory { path, modified_at } => LocalItem {
                    path,
                    kind: EntryKind::Directory,
                    modified_at,
                },
            })
            .collect())
    }

    async fn read_text(&self, path: &str) -> Result<String, StoreError> {
        let bytes = self.read_bytes(path).await?;
        String::from_utf8(bytes)
            .map_err(|e| StoreError::InvalidPath(format!("{} is not valid UTF-8: {}", path, e)))
    }

    async fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let target = self.resolve(path)?;
        fs::read(&target).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(path.to_string()),
            _ => StoreError::IoError(e),
        })
    }

    async fn write_text(&self, path: &str, content: &str) -> Result<(), StoreError> {
        self.write_bytes(path, content.as_bytes()).await
    }

    async fn write_bytes(&self, path: &str, content: &[u8]) -> Result<(), StoreError> {
        let target = self.resolve(path)?;
        self.ensure_parent(&target).await?;
        fs::write(&target, content).await?;
        debug!(path, bytes = content.len(), "Wrote local file");
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let target = self.resolve(path)?;
        let metadata = fs::symlink_metadata(&target).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(path.to_string()),
            _ => StoreError::IoError(e),
        })?;
        if metadata.is_dir() {
            let mut children = fs::read_dir(&target).await?;
            if children.next_entry().await?.is_some() {
                return Err(StoreError::DirectoryNotEmpty(path.to_string()));
            }
            fs::remove_dir(&target).await?;
        } else {
            fs::remove_file(&target).await?;
        }
        debug!(path, "Deleted local entry");
        Ok(())
    }

    async fn create_directory(&self, path: &str) -> Result<(), StoreError> {
        let target = self.resolve(path)?;
        fs::create_dir_all(&target).await?;
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        let target = self.resolve(path)?;
        Ok(fs::try_exists(&target).await?)
    }
}
