//! Pull-direction applier: writes the remote tree's changes into the local store.

use crate::apply::{ChangeApplier, DEFAULT_MAX_CONCURRENT_TRANSFERS};
use crate::error::{StoreError, SyncError};
use crate::remote::RemoteStore;
use crate::store::LocalStore;
use crate::tree::content::{self, ContentKind};
use crate::types::{ApplyReport, DiffResult, FileEntry};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Applies a pull diff to the local store
pub struct LocalApplier {
    local: Arc<dyn LocalStore>,
    remote: Arc<dyn RemoteStore>,
    max_concurrent: usize,
}

impl LocalApplier {
    pub fn new(local: Arc<dyn LocalStore>, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            local,
            remote,
            max_concurrent: DEFAULT_MAX_CONCURRENT_TRANSFERS,
        }
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Ok(false) when the entry was already gone or still holds unsynced content
    async fn delete(&self, entry: &FileEntry) -> Result<bool, StoreError> {
        if !self.local.exists(&entry.path).await? {
            return Ok(false);
        }
        match self.local.delete(&entry.path).await {
            Ok(()) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(StoreError::DirectoryNotEmpty(_)) => {
                warn!(
                    path = %entry.path,
                    "Keeping local directory, it holds hidden or ignored entries"
                );
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn download(&self, entry: &FileEntry) -> Result<(), SyncError> {
        let path = entry.path.as_str();
        let object = self.remote.get_object(path).await?.ok_or_else(|| {
            SyncError::RemoteNotFound(format!("'{}' vanished from the remote", path))
        })?;

        match content::classify(path) {
            ContentKind::Binary => self.local.write_bytes(path, &object.content).await?,
            ContentKind::Text => match String::from_utf8(object.content) {
                Ok(text) => self.local.write_text(path, &text).await?,
                Err(e) => {
                    warn!(path, "Remote text file is not UTF-8, writing raw bytes");
                    self.local.write_bytes(path, e.as_bytes()).await?
                }
            },
        }
        Ok(())
    }
}

#[async_trait]
impl ChangeApplier for LocalApplier {
    async fn apply(&self, diff: &DiffResult) -> Result<ApplyReport, SyncError> {
        let mut report = ApplyReport::default();

        let mut deletes: Vec<&FileEntry> = diff.to_delete.iter().collect();
        deletes.sort_by(|a, b| b.depth().cmp(&a.depth()).then_with(|| a.path.cmp(&b.path)));
        for entry in deletes {
            match self.delete(entry).await {
                Ok(true) => {
                    debug!(path = %entry.path, "Deleted local entry");
                    report.record_applied(&entry.path);
                }
                Ok(false) => report.record_skipped(&entry.path),
                Err(e) => {
                    warn!(path = %entry.path, error = %e, "Failed to delete local entry");
                    report.record_failed(&entry.path, e);
                }
            }
        }

        let (directories, files): (Vec<&FileEntry>, Vec<&FileEntry>) =
            diff.to_upsert.iter().partition(|e| e.is_directory());

        for entry in directories {
            match self.local.create_directory(&entry.path).await {
                Ok(()) => report.record_applied(&entry.path),
                Err(e) => {
                    warn!(path = %entry.path, error = %e, "Failed to create local directory");
                    report.record_failed(&entry.path, e);
                }
            }
        }

        let download_futures: Vec<_> = files
            .into_iter()
            .map(|entry| async move { (entry.path.as_str(), self.download(entry).await) })
            .collect();
        let mut downloads =
            stream::iter(download_futures).buffer_unordered(self.max_concurrent);

        while let Some((path, result)) = downloads.next().await {
            match result {
                Ok(()) => {
                    debug!(path, "Downloaded file");
                    report.record_applied(path);
                }
                Err(e) => {
                    warn!(path, error = %e, "Failed to download file");
                    report.record_failed(path, e);
                }
            }
        }

        info!(
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            remote = %self.remote.describe(),
            "Pull applied"
        );
        Ok(report)
    }
}
