//! Diff engine
//!
//! Push makes the remote match the local tree; pull makes the local tree
//! match the remote. A fingerprint match is never a change, whatever the
//! timestamps say.

use crate::types::{DiffResult, Snapshot};
use std::collections::BTreeMap;

/// Changes to apply to the remote so it mirrors `local`.
///
/// Only remote files are deleted; directories disappear with their last file.
pub fn push_diff(local: &Snapshot, remote: &Snapshot) -> DiffResult {
    let to_delete = remote
        .files()
        .filter(|entry| !local.contains(&entry.path))
        .cloned()
        .collect();

    let to_upsert = local
        .files()
        .filter(|entry| match remote.get(&entry.path) {
            Some(existing) => existing.fingerprint != entry.fingerprint,
            None => true,
        })
        .cloned()
        .collect();

    DiffResult {
        to_delete,
        to_upsert,
    }
}

/// Changes to apply locally so the local tree mirrors `remote`.
pub fn pull_diff(local: &Snapshot, remote: &Snapshot) -> DiffResult {
    let mut index: BTreeMap<&str, _> = remote.iter().map(|e| (e.path.as_str(), e)).collect();
    let mut diff = DiffResult::default();

    for entry in local.iter() {
        match index.remove(entry.path.as_str()) {
            None => diff.to_delete.push(entry.clone()),
            Some(theirs) if theirs.is_file() && theirs.fingerprint != entry.fingerprint => {
                diff.to_upsert.push(theirs.clone());
            }
            Some(_) => {}
        }
    }

    diff.to_upsert.extend(index.into_values().cloned());
    diff
}
