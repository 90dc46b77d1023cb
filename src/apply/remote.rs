//! Push-direction applier: writes the local tree's changes to the remote.

use crate::apply::{ChangeApplier, DEFAULT_MAX_CONCURRENT_TRANSFERS};
use crate::error::{IntegrityViolation, SyncError};
use crate::remote::RemoteStore;
use crate::scan::read_local;
use crate::store::LocalStore;
use crate::tree::content::{self, ContentKind};
use crate::tree::hasher;
use crate::types::{ApplyReport, DiffResult, FileEntry};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Content written in place of a zero-length text file before upload
pub const DEFAULT_EMPTY_FILE_PLACEHOLDER: &str = "\n";

enum Upsert {
    Uploaded,
    Unchanged,
}

/// Applies a push diff to the remote store
pub struct RemoteApplier {
    local: Arc<dyn LocalStore>,
    remote: Arc<dyn RemoteStore>,
    empty_file_placeholder: String,
    max_concurrent: usize,
}

impl RemoteApplier {
    pub fn new(local: Arc<dyn LocalStore>, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            local,
            remote,
            empty_file_placeholder: DEFAULT_EMPTY_FILE_PLACEHOLDER.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT_TRANSFERS,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.empty_file_placeholder = placeholder.into();
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    async fn upsert(&self, entry: &FileEntry) -> Result<Upsert, SyncError> {
        let path = entry.path.as_str();
        let current = self.remote.get_object(path).await?;

        let mut bytes = read_local(self.local.as_ref(), path).await?;
        if bytes.is_empty() && content::classify(path) == ContentKind::Text {
            self.local
                .write_text(path, &self.empty_file_placeholder)
                .await?;
            bytes = self.empty_file_placeholder.as_bytes().to_vec();
            debug!(path, "Replaced empty text file with placeholder");
        }
        let fingerprint = hasher::hash_bytes(&bytes);

        let Some(current) = current else {
            self.remote.put_object(path, &bytes, None).await?;
            return Ok(Upsert::Uploaded);
        };

        let same_fingerprint = fingerprint == current.object_id;
        let same_bytes = bytes == current.content;
        if same_fingerprint != same_bytes {
            return Err(IntegrityViolation {
                path: path.to_string(),
                local_fingerprint: fingerprint,
                remote_fingerprint: current.object_id,
                local_raw: String::from_utf8_lossy(&bytes).into_owned(),
                remote_raw: String::from_utf8_lossy(&current.content).into_owned(),
                local_encoded: content::encode(&bytes),
                remote_encoded: content::encode(&current.content),
            }
            .into());
        }
        if same_fingerprint {
            return Ok(Upsert::Unchanged);
        }

        self.remote
            .put_object(path, &bytes, Some(&current.object_id))
            .await?;
        Ok(Upsert::Uploaded)
    }
}

#[async_trait]
impl ChangeApplier for RemoteApplier {
    async fn apply(&self, diff: &DiffResult) -> Result<ApplyReport, SyncError> {
        let mut report = ApplyReport::default();

        for entry in &diff.to_delete {
            match self.remote.delete_object(&entry.path, &entry.fingerprint).await {
                Ok(()) => {
                    debug!(path = %entry.path, "Deleted remote file");
                    report.record_applied(&entry.path);
                }
                Err(e) => {
                    warn!(path = %entry.path, error = %e, "Failed to delete remote file");
                    report.record_failed(&entry.path, e);
                }
            }
        }

        let upload_futures: Vec<_> = diff
            .to_upsert
            .iter()
            .map(|entry| async move { (entry.path.as_str(), self.upsert(entry).await) })
            .collect();
        let mut uploads = stream::iter(upload_futures).buffer_unordered(self.max_concurrent);

        while let Some((path, result)) = uploads.next().await {
            match result {
                Ok(Upsert::Uploaded) => {
                    debug!(path, "Uploaded file");
                    report.record_applied(path);
                }
                Ok(Upsert::Unchanged) => report.record_skipped(path),
                Err(e @ SyncError::Integrity(_)) => return Err(e),
                Err(e) => {
                    warn!(path, error = %e, "Failed to upload file");
                    report.record_failed(path, e);
                }
            }
        }

        info!(
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            remote = %self.remote.describe(),
            "Push applied"
        );
        Ok(report)
    }
}
