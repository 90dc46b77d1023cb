//! Path canonicalization and normalization utilities
//!
//! Snapshot paths are relative to the tree root, use `/` as the separator on
//! every platform, carry no leading or trailing slash and are NFC-normalized.

use crate::error::StoreError;
use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Canonicalize the tree root (resolves symlinks, `..`, `.`)
pub fn canonicalize_root(path: &Path) -> Result<PathBuf, StoreError> {
    dunce::canonicalize(path)
        .map_err(|e| StoreError::InvalidPath(format!("Failed to canonicalize path: {}", e)))
}

/// Normalize a relative path string (without filesystem access)
pub fn normalize_path_string(path: &str) -> String {
    // Normalize Unicode to NFC
    let normalized: String = path.nfc().collect();

    normalized
        .replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Express `path` relative to `root` in snapshot form
pub fn relative_path(root: &Path, path: &Path) -> Result<String, StoreError> {
    let relative = path.strip_prefix(root).map_err(|_| {
        StoreError::InvalidPath(format!(
            "{} is outside of {}",
            path.display(),
            root.display()
        ))
    })?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => {
                return Err(StoreError::InvalidPath(format!(
                    "unexpected component in {}",
                    relative.display()
                )))
            }
        }
    }

    Ok(normalize_path_string(&segments.join("/")))
}

/// Resolve a snapshot path below `root`, refusing anything that escapes it
pub fn resolve_under(root: &Path, relative: &str) -> Result<PathBuf, StoreError> {
    let normalized = normalize_path_string(relative);
    if normalized.is_empty() {
        return Err(StoreError::InvalidPath("empty path".to_string()));
    }
    let mut resolved = root.to_path_buf();
    for segment in normalized.split('/') {
        if segment == ".." {
            return Err(StoreError::InvalidPath(format!(
                "path escapes the tree root: {}",
                relative
            )));
        }
        resolved.push(segment);
    }
    Ok(resolved)
}

/// True when any component starts with a dot (hidden or reserved)
pub fn is_hidden(relative: &str) -> bool {
    relative.split('/').any(|segment| segment.starts_with('.'))
}

/// Parent of a snapshot path, `None` for top-level entries
pub fn parent(relative: &str) -> Option<&str> {
    relative.rsplit_once('/').map(|(parent, _)| parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_path_normalization_removes_slashes() {
        assert_eq!(normalize_path_string("/some/path/"), "some/path");
        assert_eq!(normalize_path_string("./a//b"), "a/b");
        assert_eq!(normalize_path_string("a\\b\\c.md"), "a/b/c.md");
    }

    #[test]
    fn test_unicode_normalization() {
        let path1 = normalize_path_string("caf\u{e9}.md");
        let path2 = normalize_path_string("cafe\u{0301}.md"); // e + combining acute
        assert_eq!(path1, path2);
    }

    #[test]
    fn test_relative_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = canonicalize_root(temp_dir.path()).unwrap();
        fs::create_dir(root.join("notes")).unwrap();
        fs::write(root.join("notes").join("a.md"), "x").unwrap();

        let rel = relative_path(&root, &root.join("notes").join("a.md")).unwrap();
        assert_eq!(rel, "notes/a.md");
        assert!(relative_path(&root.join("notes"), &root).is_err());
    }

    #[test]
    fn test_resolve_under_refuses_escape() {
        let root = PathBuf::from("/vault");
        assert_eq!(
            resolve_under(&root, "a/b.md").unwrap(),
            PathBuf::from("/vault/a/b.md")
        );
        assert!(resolve_under(&root, "../etc/passwd").is_err());
        assert!(resolve_under(&root, "").is_err());
    }

    #[test]
    fn test_hidden_and_parent() {
        assert!(is_hidden(".vaultsync/config.toml"));
        assert!(is_hidden("notes/.trash/a.md"));
        assert!(!is_hidden("notes/a.md"));
        assert_eq!(parent("a/b/c.md"), Some("a/b"));
        assert_eq!(parent("c.md"), None);
    }
}
