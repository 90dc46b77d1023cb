//! Remote tree fetcher
//!
//! Breadth-first traversal of the remote replica with an explicit worklist.
//! Parents are recorded before their children. Each entry's timestamp is the
//! most recent history entry for its path. Paths the local scan excludes are
//! left out here too, so neither direction touches them.

use crate::error::SyncError;
use crate::remote::RemoteStore;
use crate::scan::ScanFilter;
use crate::types::{EntryKind, FileEntry, Snapshot};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use tracing::debug;

/// Result of fetching the remote tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteTree {
    Populated(Snapshot),
    /// Root missing or without children
    Empty,
}

impl RemoteTree {
    pub fn is_empty(&self) -> bool {
        matches!(self, RemoteTree::Empty)
    }

    /// The snapshot, or an empty one
    pub fn into_snapshot(self) -> Snapshot {
        match self {
            RemoteTree::Populated(snapshot) => snapshot,
            RemoteTree::Empty => Snapshot::empty(),
        }
    }
}

/// Fetch the remote tree, skipping excluded paths without listing below them
pub async fn fetch(remote: &dyn RemoteStore, filter: &ScanFilter) -> Result<RemoteTree, SyncError> {
    let mut worklist: VecDeque<String> = VecDeque::from([String::new()]);
    let mut entries = Vec::new();

    while let Some(dir) = worklist.pop_front() {
        let Some(children) = remote.list_children(&dir).await? else {
            continue;
        };
        for child in children {
            if filter.excludes(&child.path) {
                debug!(path = %child.path, "Skipping excluded remote entry");
                continue;
            }
            let modified_at = remote
                .last_change_time(&child.path)
                .await?
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
            match child.kind {
                EntryKind::Directory => {
                    worklist.push_back(child.path.clone());
                    entries.push(FileEntry::directory(child.path, modified_at));
                }
                EntryKind::File => {
                    entries.push(FileEntry::file(child.path, child.object_id, modified_at));
                }
            }
        }
    }

    if entries.is_empty() {
        debug!(remote = %remote.describe(), "Remote tree is empty");
        return Ok(RemoteTree::Empty);
    }

    let snapshot = Snapshot::from_entries(entries)?;
    debug!(
        remote = %remote.describe(),
        entries = snapshot.len(),
        files = snapshot.file_count(),
        "Fetched remote tree"
    );
    Ok(RemoteTree::Populated(snapshot))
}
