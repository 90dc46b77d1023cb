//! Local tree scanner
//!
//! Produces a [`Snapshot`] of the local tree: every visible entry, files
//! fingerprinted from their content, directories with an empty fingerprint.

use crate::error::{StoreError, SyncError};
use crate::store::LocalStore;
use crate::tree::content::{self, ContentKind};
use crate::tree::{hasher, path};
use crate::types::{DiffResult, EntryKind, FileEntry, Fingerprint, Snapshot};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Scanner filter applied on top of whatever the store already skips
#[derive(Debug, Clone, Default)]
pub struct ScanFilter {
    /// Component names to skip anywhere in the tree
    pub ignore_patterns: Vec<String>,
}

impl ScanFilter {
    pub fn new(ignore_patterns: Vec<String>) -> Self {
        Self { ignore_patterns }
    }

    /// Hidden paths (any dot-prefixed component) and ignored names are excluded.
    pub fn excludes(&self, relative: &str) -> bool {
        if path::is_hidden(relative) {
            return true;
        }
        relative
            .split('/')
            .any(|component| self.ignore_patterns.iter().any(|p| p == component))
    }
}

/// Read a file the way its classification says and return its raw bytes.
///
/// Text files that turn out not to be UTF-8 are read as bytes instead.
pub async fn read_local(store: &dyn LocalStore, relative: &str) -> Result<Vec<u8>, StoreError> {
    match content::classify(relative) {
        ContentKind::Binary => store.read_bytes(relative).await,
        ContentKind::Text => match store.read_text(relative).await {
            Ok(text) => Ok(text.into_bytes()),
            Err(StoreError::InvalidPath(reason)) => {
                warn!(path = relative, reason = %reason, "Text file is not UTF-8, reading raw bytes");
                store.read_bytes(relative).await
            }
            Err(e) => Err(e),
        },
    }
}

/// Fingerprint a local file
pub async fn fingerprint_local(
    store: &dyn LocalStore,
    relative: &str,
) -> Result<Fingerprint, StoreError> {
    let bytes = read_local(store, relative).await?;
    Ok(hasher::hash_bytes(&bytes))
}

/// A scanned local tree
#[derive(Debug, Clone, Default)]
pub struct LocalScan {
    pub snapshot: Snapshot,
    /// Directories holding hidden or ignored entries
    pub retained: BTreeSet<String>,
}

impl LocalScan {
    /// Drop directory deletes that would take excluded entries with them
    pub fn spare_retained(&self, diff: &mut DiffResult) {
        diff.to_delete
            .retain(|entry| !(entry.is_directory() && self.retained.contains(&entry.path)));
    }
}

/// Scan the local tree into a snapshot. An empty tree is an empty snapshot.
pub async fn scan(store: &dyn LocalStore, filter: &ScanFilter) -> Result<Snapshot, SyncError> {
    Ok(scan_tree(store, filter).await?.snapshot)
}

/// Scan the local tree, also recording which directories hold excluded entries
pub async fn scan_tree(store: &dyn LocalStore, filter: &ScanFilter) -> Result<LocalScan, SyncError> {
    let items = store.list_all().await?;
    let mut entries = Vec::with_capacity(items.len());
    let mut retained = BTreeSet::new();

    for item in items {
        if item.path.is_empty() {
            continue;
        }
        if filter.excludes(&item.path) {
            let mut ancestor = path::parent(&item.path);
            while let Some(dir) = ancestor {
                retained.insert(dir.to_string());
                ancestor = path::parent(dir);
            }
            continue;
        }
        match item.kind {
            EntryKind::Directory => {
                entries.push(FileEntry::directory(item.path, item.modified_at));
            }
            EntryKind::File => {
                let fingerprint = fingerprint_local(store, &item.path).await?;
                entries.push(FileEntry::file(item.path, fingerprint, item.modified_at));
            }
        }
    }

    let snapshot = Snapshot::from_entries(entries)?;
    debug!(
        entries = snapshot.len(),
        files = snapshot.file_count(),
        retained = retained.len(),
        "Scanned local tree"
    );
    Ok(LocalScan { snapshot, retained })
}
