//! Core data model: entries, snapshots and diff results.

use crate::error::SyncError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hex-encoded git blob object id
pub type Fingerprint = String;

/// Entry kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One node of a tree snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Forward-slash path relative to the tree root
    pub path: String,
    pub kind: EntryKind,
    /// Content hash; empty for directories
    pub fingerprint: Fingerprint,
    pub modified_at: DateTime<Utc>,
}

impl FileEntry {
    pub fn file(
        path: impl Into<String>,
        fingerprint: impl Into<Fingerprint>,
        modified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            fingerprint: fingerprint.into(),
            modified_at,
        }
    }

    pub fn directory(path: impl Into<String>, modified_at: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            fingerprint: String::new(),
            modified_at,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Number of path separators; used to order deletions deepest-first.
    pub fn depth(&self) -> usize {
        self.path.matches('/').count()
    }
}

/// Immutable, path-ordered listing of one tree at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    entries: BTreeMap<String, FileEntry>,
}

impl Snapshot {
    /// Build a snapshot, rejecting duplicate paths and directories with fingerprints.
    pub fn from_entries<I>(entries: I) -> Result<Self, SyncError>
    where
        I: IntoIterator<Item = FileEntry>,
    {
        let mut map = BTreeMap::new();
        for entry in entries {
            if entry.is_directory() && !entry.fingerprint.is_empty() {
                return Err(SyncError::InvalidSnapshot(format!(
                    "directory '{}' carries a fingerprint",
                    entry.path
                )));
            }
            if map.contains_key(&entry.path) {
                return Err(SyncError::InvalidSnapshot(format!(
                    "duplicate path '{}'",
                    entry.path
                )));
            }
            map.insert(entry.path.clone(), entry);
        }
        Ok(Self { entries: map })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Entries in path order
    pub fn iter(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.values()
    }

    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.values().filter(|e| e.is_file())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    /// False for a tree with zero files (directories alone do not count).
    pub fn has_files(&self) -> bool {
        self.files().next().is_some()
    }

    /// Newest `modified_at` across every entry.
    pub fn newest_modified(&self) -> Option<DateTime<Utc>> {
        self.entries.values().map(|e| e.modified_at).max()
    }
}

/// Changes needed to bring one side in line with the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub to_delete: Vec<FileEntry>,
    pub to_upsert: Vec<FileEntry>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_upsert.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_delete.len() + self.to_upsert.len()
    }
}

/// Item that could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedItem {
    pub path: String,
    pub error: String,
}

/// Per-item outcome of applying a diff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub applied: Vec<String>,
    /// Items found already in sync when applied
    #[serde(default)]
    pub skipped: Vec<String>,
    pub failed: Vec<FailedItem>,
}

impl ApplyReport {
    pub fn record_applied(&mut self, path: impl Into<String>) {
        self.applied.push(path.into());
    }

    pub fn record_skipped(&mut self, path: impl Into<String>) {
        self.skipped.push(path.into());
    }

    pub fn record_failed(&mut self, path: impl Into<String>, error: impl ToString) {
        self.failed.push(FailedItem {
            path: path.into(),
            error: error.to_string(),
        });
    }

    pub fn merge(&mut self, other: ApplyReport) {
        self.applied.extend(other.applied);
        self.skipped.extend(other.skipped);
        self.failed.extend(other.failed);
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_snapshot_rejects_duplicate_paths() {
        let result = Snapshot::from_entries(vec![
            FileEntry::file("a.md", "x", ts(1)),
            FileEntry::file("a.md", "y", ts(2)),
        ]);
        assert!(matches!(result, Err(SyncError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_snapshot_rejects_directory_fingerprint() {
        let mut dir = FileEntry::directory("notes", ts(1));
        dir.fingerprint = "abc".to_string();
        assert!(Snapshot::from_entries(vec![dir]).is_err());
    }

    #[test]
    fn test_snapshot_orders_by_path() {
        let snapshot = Snapshot::from_entries(vec![
            FileEntry::file("z.md", "1", ts(1)),
            FileEntry::directory("b", ts(1)),
            FileEntry::file("a.md", "2", ts(1)),
        ])
        .unwrap();
        let paths: Vec<_> = snapshot.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["a.md", "b", "z.md"]);
    }

    #[test]
    fn test_has_files_ignores_directories() {
        let snapshot = Snapshot::from_entries(vec![FileEntry::directory("empty", ts(1))]).unwrap();
        assert!(!snapshot.is_empty());
        assert!(!snapshot.has_files());
        assert_eq!(snapshot.file_count(), 0);
    }

    #[test]
    fn test_newest_modified() {
        let snapshot = Snapshot::from_entries(vec![
            FileEntry::file("a.md", "1", ts(5)),
            FileEntry::directory("d", ts(9)),
            FileEntry::file("d/b.md", "2", ts(3)),
        ])
        .unwrap();
        assert_eq!(snapshot.newest_modified(), Some(ts(9)));
        assert_eq!(Snapshot::empty().newest_modified(), None);
    }

    #[test]
    fn test_entry_depth() {
        assert_eq!(FileEntry::file("a.md", "", ts(0)).depth(), 0);
        assert_eq!(FileEntry::file("a/b/c.md", "", ts(0)).depth(), 2);
    }

    #[test]
    fn test_apply_report_success() {
        let mut report = ApplyReport::default();
        report.record_applied("a.md");
        assert!(report.is_success());
        report.record_failed("b.md", "boom");
        assert!(!report.is_success());
        assert_eq!(report.failed[0].error, "boom");
    }
}
