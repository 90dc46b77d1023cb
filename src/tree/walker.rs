//! Filesystem walker for traversing the local tree

use crate::error::StoreError;
use crate::tree::path;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

/// Filesystem entry types
#[derive(Debug, Clone)]
pub enum Entry {
    /// A file entry with its relative path and mtime
    File {
        path: String,
        modified_at: DateTime<Utc>,
    },
    /// A directory entry with its relative path and mtime
    Directory {
        path: String,
        modified_at: DateTime<Utc>,
    },
}

impl Entry {
    pub fn path(&self) -> &str {
        match self {
            Entry::File { path, .. } | Entry::Directory { path, .. } => path,
        }
    }
}

/// Filesystem walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: false)
    pub follow_symlinks: bool,
    /// Do not descend into dot-prefixed directories
    pub skip_hidden: bool,
    /// Extra directory names not to descend into (e.g., "node_modules")
    pub ignore_patterns: Vec<String>,
    /// Maximum depth to traverse (None = unlimited)
    pub max_depth: Option<usize>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            skip_hidden: true,
            ignore_patterns: Vec::new(),
            max_depth: None,
        }
    }
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the filesystem and collect all entries
    ///
    /// Returns entries sorted by path. Hidden and ignored entries are listed
    /// so callers can see they exist, but ignored directories are never
    /// descended into.
    pub fn walk(&self) -> Result<Vec<Entry>, StoreError> {
        let mut entries = Vec::new();

        let mut walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|e| StoreError::Walk(e.to_string()))?;

            // Skip the root directory itself (we only want its contents)
            if entry.depth() == 0 {
                continue;
            }

            let relative = path::relative_path(&self.root, entry.path())?;

            let metadata = entry.metadata().map_err(|e| {
                StoreError::Walk(format!(
                    "Failed to read metadata for {:?}: {}",
                    entry.path(),
                    e
                ))
            })?;
            let modified_at = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

            if metadata.is_file() {
                entries.push(Entry::File {
                    path: relative,
                    modified_at,
                });
            } else if metadata.is_dir() {
                if self.should_ignore(&entry) {
                    walker.skip_current_dir();
                }
                entries.push(Entry::Directory {
                    path: relative,
                    modified_at,
                });
            }
            // Skip symlinks if not following them
        }

        entries.sort_by(|a, b| a.path().cmp(b.path()));

        Ok(entries)
    }

    fn should_ignore(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();

        if self.config.skip_hidden && name.starts_with('.') {
            return true;
        }

        self.config
            .ignore_patterns
            .iter()
            .any(|pattern| name == pattern.as_str())
    }
}
