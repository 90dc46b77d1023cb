//! In-memory local store
//!
//! Used by tests and by embedders that keep the tree somewhere other than a
//! plain directory.

use crate::error::StoreError;
use crate::store::{LocalItem, LocalStore};
use crate::tree::path;
use crate::types::EntryKind;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
struct Node {
    kind: EntryKind,
    content: Vec<u8>,
    modified_at: DateTime<Utc>,
}

/// Local store held in memory
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    nodes: RwLock<BTreeMap<String, Node>>,
    writes: AtomicUsize,
    deletes: AtomicUsize,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file with an explicit mtime; does not count as a write.
    pub fn insert_file(&self, path: &str, content: impl Into<Vec<u8>>, modified_at: DateTime<Utc>) {
        let path = path::normalize_path_string(path);
        let mut nodes = self.nodes.write();
        Self::insert_parents(&mut nodes, &path, modified_at);
        nodes.insert(
            path,
            Node {
                kind: EntryKind::File,
                content: content.into(),
                modified_at,
            },
        );
    }

    /// Seed a directory with an explicit mtime
    pub fn insert_directory(&self, path: &str, modified_at: DateTime<Utc>) {
        let path = path::normalize_path_string(path);
        let mut nodes = self.nodes.write();
        Self::insert_parents(&mut nodes, &path, modified_at);
        nodes.entry(path).or_insert(Node {
            kind: EntryKind::Directory,
            content: Vec::new(),
            modified_at,
        });
    }

    /// Current content of a file, if present
    pub fn content(&self, path: &str) -> Option<Vec<u8>> {
        self.nodes
            .read()
            .get(path)
            .filter(|n| n.kind == EntryKind::File)
            .map(|n| n.content.clone())
    }

    pub fn paths(&self) -> Vec<String> {
        self.nodes.read().keys().cloned().collect()
    }

    /// Number of file writes issued through the store interface
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of deletes issued through the store interface
    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    fn insert_parents(nodes: &mut BTreeMap<String, Node>, path: &str, modified_at: DateTime<Utc>) {
        let mut current = path::parent(path);
        while let Some(dir) = current {
            nodes.entry(dir.to_string()).or_insert(Node {
                kind: EntryKind::Directory,
                content: Vec::new(),
                modified_at,
            });
            current = path::parent(dir);
        }
    }

    fn write(&self, path: &str, content: &[u8]) -> Result<(), StoreError> {
        let path = path::normalize_path_string(path);
        if path.is_empty() {
            return Err(StoreError::InvalidPath("empty path".to_string()));
        }
        let now = Utc::now();
        let mut nodes = self.nodes.write();
        if nodes
            .get(&path)
            .is_some_and(|n| n.kind == EntryKind::Directory)
        {
            return Err(StoreError::InvalidPath(format!("{} is a directory", path)));
        }
        Self::insert_parents(&mut nodes, &path, now);
        nodes.insert(
            path,
            Node {
                kind: EntryKind::File,
                content: content.to_vec(),
                modified_at: now,
            },
        );
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl LocalStore for MemoryLocalStore {
    async fn list_all(&self) -> Result<Vec<LocalItem>, StoreError> {
        Ok(self
            .nodes
            .read()
            .iter()
            .map(|(path, node)| LocalItem {
                path: path.clone(),
                kind: node.kind,
                modified_at: node.modified_at,
            })
            .collect())
    }

    async fn read_text(&self, path: &str) -> Result<String, StoreError> {
        let bytes = self.read_bytes(path).await?;
        String::from_utf8(bytes)
            .map_err(|e| StoreError::InvalidPath(format!("{} is not valid UTF-8: {}", path, e)))
    }

    async fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.content(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    async fn write_text(&self, path: &str, content: &str) -> Result<(), StoreError> {
        self.write(path, content.as_bytes())
    }

    async fn write_bytes(&self, path: &str, content: &[u8]) -> Result<(), StoreError> {
        self.write(path, content)
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let mut nodes = self.nodes.write();
        if !nodes.contains_key(path) {
            return Err(StoreError::NotFound(path.to_string()));
        }
        let prefix = format!("{}/", path);
        if nodes.keys().any(|p| p.starts_with(&prefix)) {
            return Err(StoreError::DirectoryNotEmpty(path.to_string()));
        }
        nodes.remove(path);
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn create_directory(&self, path: &str) -> Result<(), StoreError> {
        let path = path::normalize_path_string(path);
        let mut nodes = self.nodes.write();
        match nodes.get(&path) {
            Some(node) if node.kind == EntryKind::File => Err(StoreError::InvalidPath(format!(
                "{} is a file",
                path
            ))),
            Some(_) => Ok(()),
            None => {
                let now = Utc::now();
                Self::insert_parents(&mut nodes, &path, now);
                nodes.insert(
                    path,
                    Node {
                        kind: EntryKind::Directory,
                        content: Vec::new(),
                        modified_at: now,
                    },
                );
                Ok(())
            }
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        Ok(self.nodes.read().contains_key(path))
    }
}
