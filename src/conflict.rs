//! Conflict gate for pulls
//!
//! Decides whether a pull would overwrite local work that is newer than
//! anything on the remote, in which case the user is asked first.

use crate::types::{DiffResult, Snapshot};
use serde::{Deserialize, Serialize};

/// How the gate compares the two trees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Newest local timestamp against newest remote timestamp, whole tree
    #[default]
    NewestOverall,
    /// Only paths the pull would delete or overwrite locally
    PerFile,
}

/// Whole-tree heuristic: block when there are pending changes and the local
/// tree holds something strictly newer than anything remote.
pub fn should_block(local: &Snapshot, remote: &Snapshot, pending_changes: bool) -> bool {
    if !pending_changes {
        return false;
    }
    match (local.newest_modified(), remote.newest_modified()) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(local_newest), Some(remote_newest)) => local_newest > remote_newest,
    }
}

/// Per-file check: a local entry the pull would touch is newer than its remote
/// counterpart, or would be deleted outright while newer than the remote tree.
pub fn should_block_per_file(local: &Snapshot, remote: &Snapshot, diff: &DiffResult) -> bool {
    let remote_newest = remote.newest_modified();

    let overwrites_newer = diff.to_upsert.iter().any(|theirs| {
        local
            .get(&theirs.path)
            .is_some_and(|mine| mine.is_file() && mine.modified_at > theirs.modified_at)
    });

    let deletes_newer = diff.to_delete.iter().any(|mine| match remote_newest {
        Some(newest) => mine.modified_at > newest,
        None => true,
    });

    overwrites_newer || deletes_newer
}

impl ConflictPolicy {
    /// Evaluate this policy for a pending pull diff
    pub fn blocks(&self, local: &Snapshot, remote: &Snapshot, diff: &DiffResult) -> bool {
        match self {
            ConflictPolicy::NewestOverall => should_block(local, remote, !diff.is_empty()),
            ConflictPolicy::PerFile => should_block_per_file(local, remote, diff),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::pull_diff;
    use crate::types::FileEntry;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn snapshot(entries: Vec<FileEntry>) -> Snapshot {
        Snapshot::from_entries(entries).unwrap()
    }

    #[test]
    fn test_gate_fires_when_local_is_newer() {
        let local = snapshot(vec![FileEntry::file("a.md", "l", ts(200))]);
        let remote = snapshot(vec![FileEntry::file("a.md", "r", ts(100))]);
        assert!(should_block(&local, &remote, true));
    }

    #[test]
    fn test_gate_symmetric_case_does_not_fire() {
        let local = snapshot(vec![FileEntry::file("a.md", "l", ts(100))]);
        let remote = snapshot(vec![FileEntry::file("a.md", "r", ts(200))]);
        assert!(!should_block(&local, &remote, true));
    }

    #[test]
    fn test_gate_requires_pending_changes() {
        let local = snapshot(vec![FileEntry::file("a.md", "l", ts(200))]);
        let remote = snapshot(vec![FileEntry::file("a.md", "l", ts(100))]);
        assert!(!should_block(&local, &remote, false));
    }

    #[test]
    fn test_equal_timestamps_do_not_block() {
        let local = snapshot(vec![FileEntry::file("a.md", "l", ts(100))]);
        let remote = snapshot(vec![FileEntry::file("a.md", "r", ts(100))]);
        assert!(!should_block(&local, &remote, true));
    }

    #[test]
    fn test_empty_sides() {
        let some = snapshot(vec![FileEntry::file("a.md", "l", ts(1))]);
        assert!(!should_block(&Snapshot::empty(), &some, true));
        assert!(should_block(&some, &Snapshot::empty(), true));
    }

    #[test]
    fn test_per_file_ignores_unrelated_newer_files() {
        let local = snapshot(vec![
            FileEntry::file("a.md", "same", ts(500)),
            FileEntry::file("b.md", "old", ts(100)),
        ]);
        let remote = snapshot(vec![
            FileEntry::file("a.md", "same", ts(10)),
            FileEntry::file("b.md", "new", ts(200)),
        ]);
        let diff = pull_diff(&local, &remote);

        assert!(ConflictPolicy::NewestOverall.blocks(&local, &remote, &diff));
        assert!(!ConflictPolicy::PerFile.blocks(&local, &remote, &diff));
    }

    #[test]
    fn test_per_file_blocks_overwrite_of_newer_file() {
        let local = snapshot(vec![FileEntry::file("b.md", "mine", ts(300))]);
        let remote = snapshot(vec![FileEntry::file("b.md", "theirs", ts(200))]);
        let diff = pull_diff(&local, &remote);
        assert!(ConflictPolicy::PerFile.blocks(&local, &remote, &diff));
    }

    #[test]
    fn test_policy_deserializes_snake_case() {
        let policy: ConflictPolicy = serde_json::from_str("\"per_file\"").unwrap();
        assert_eq!(policy, ConflictPolicy::PerFile);
    }
}
