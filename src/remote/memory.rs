//! In-memory remote store
//!
//! Behaves like a content-addressed repository: directories exist only while
//! they contain files, object ids are git blob ids, writes carrying a stale
//! base id are rejected and every write records a history entry on the path
//! and on each ancestor directory. Operation counters and failure injection
//! make it the remote used throughout the test suite.

use crate::error::SyncError;
use crate::remote::{RemoteItem, RemoteObject, RemoteStore};
use crate::tree::hasher;
use crate::types::EntryKind;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
struct StoredObject {
    content: Vec<u8>,
    object_id: String,
}

#[derive(Debug, Default)]
struct State {
    exists: bool,
    objects: BTreeMap<String, StoredObject>,
    history: HashMap<String, DateTime<Utc>>,
    clock: Option<DateTime<Utc>>,
    failing_paths: BTreeSet<String>,
    fail_listing: bool,
}

/// Operation counters
#[derive(Debug, Default)]
struct Counters {
    lists: AtomicUsize,
    gets: AtomicUsize,
    puts: AtomicUsize,
    deletes: AtomicUsize,
}

/// Remote store held in memory
#[derive(Debug)]
pub struct MemoryRemoteStore {
    name: String,
    state: RwLock<State>,
    counters: Counters,
}

impl MemoryRemoteStore {
    /// An existing, empty repository
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(State {
                exists: true,
                ..State::default()
            }),
            counters: Counters::default(),
        }
    }

    /// Seed a file with an explicit change time; not counted as a write.
    pub fn insert_file(&self, path: &str, content: impl Into<Vec<u8>>, changed_at: DateTime<Utc>) {
        let content = content.into();
        let mut state = self.state.write();
        let object_id = hasher::hash_bytes(&content);
        state
            .objects
            .insert(path.to_string(), StoredObject { content, object_id });
        Self::record_history(&mut state, path, changed_at);
    }

    /// Fix the time stamped on subsequent writes
    pub fn set_clock(&self, now: DateTime<Utc>) {
        self.state.write().clock = Some(now);
    }

    /// Make every put/delete on `path` fail with a transport error
    pub fn fail_writes_to(&self, path: &str) {
        self.state.write().failing_paths.insert(path.to_string());
    }

    /// Make every directory listing fail with a transport error
    pub fn fail_listings(&self, fail: bool) {
        self.state.write().fail_listing = fail;
    }

    /// Current content of a file, if present
    pub fn content(&self, path: &str) -> Option<Vec<u8>> {
        self.state.read().objects.get(path).map(|o| o.content.clone())
    }

    pub fn object_id(&self, path: &str) -> Option<String> {
        self.state.read().objects.get(path).map(|o| o.object_id.clone())
    }

    pub fn file_paths(&self) -> Vec<String> {
        self.state.read().objects.keys().cloned().collect()
    }

    pub fn put_count(&self) -> usize {
        self.counters.puts.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.counters.deletes.load(Ordering::SeqCst)
    }

    pub fn get_count(&self) -> usize {
        self.counters.gets.load(Ordering::SeqCst)
    }

    pub fn list_count(&self) -> usize {
        self.counters.lists.load(Ordering::SeqCst)
    }

    /// Total number of mutating calls (puts and deletes)
    pub fn write_count(&self) -> usize {
        self.put_count() + self.delete_count()
    }

    fn now(state: &State) -> DateTime<Utc> {
        state.clock.unwrap_or_else(Utc::now)
    }

    fn record_history(state: &mut State, path: &str, at: DateTime<Utc>) {
        state.history.insert(path.to_string(), at);
        let mut current = path;
        while let Some((parent, _)) = current.rsplit_once('/') {
            state.history.insert(parent.to_string(), at);
            current = parent;
        }
    }

    fn check_repository(&self, state: &State) -> Result<(), SyncError> {
        if state.exists {
            Ok(())
        } else {
            Err(SyncError::RemoteNotFound(format!(
                "repository '{}' does not exist",
                self.name
            )))
        }
    }

    fn check_writable(state: &State, path: &str) -> Result<(), SyncError> {
        if state.failing_paths.contains(path) {
            return Err(SyncError::RemoteRequestFailed(format!(
                "injected failure writing '{}'",
                path
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn list_children(&self, path: &str) -> Result<Option<Vec<RemoteItem>>, SyncError> {
        self.counters.lists.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read();
        self.check_repository(&state)?;
        if state.fail_listing {
            return Err(SyncError::RemoteRequestFailed(
                "injected listing failure".to_string(),
            ));
        }

        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{}/", path)
        };

        let mut children: BTreeMap<String, RemoteItem> = BTreeMap::new();
        for (object_path, object) in state.objects.range(prefix.clone()..) {
            let Some(rest) = object_path.strip_prefix(&prefix) else {
                break;
            };
            match rest.split_once('/') {
                Some((dir, _)) => {
                    let dir_path = format!("{}{}", prefix, dir);
                    children.entry(dir_path.clone()).or_insert(RemoteItem {
                        path: dir_path,
                        kind: EntryKind::Directory,
                        object_id: String::new(),
                    });
                }
                None => {
                    children.insert(
                        object_path.clone(),
                        RemoteItem {
                            path: object_path.clone(),
                            kind: EntryKind::File,
                            object_id: object.object_id.clone(),
                        },
                    );
                }
            }
        }

        if children.is_empty() {
            return Ok(None);
        }
        Ok(Some(children.into_values().collect()))
    }

    async fn get_object(&self, path: &str) -> Result<Option<RemoteObject>, SyncError> {
        self.counters.gets.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read();
        self.check_repository(&state)?;
        Ok(state.objects.get(path).map(|o| RemoteObject {
            content: o.content.clone(),
            object_id: o.object_id.clone(),
        }))
    }

    async fn put_object(
        &self,
        path: &str,
        content: &[u8],
        base_object_id: Option<&str>,
    ) -> Result<String, SyncError> {
        self.counters.puts.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write();
        self.check_repository(&state)?;
        Self::check_writable(&state, path)?;

        if content.is_empty() {
            return Err(SyncError::RemoteRejected(format!(
                "'{}': zero-length objects are not supported",
                path
            )));
        }

        let current = state.objects.get(path).map(|o| o.object_id.as_str());
        if current != base_object_id {
            return Err(SyncError::RemoteRejected(format!(
                "'{}': base object id {:?} does not match current {:?}",
                path, base_object_id, current
            )));
        }

        let object_id = hasher::hash_bytes(content);
        state.objects.insert(
            path.to_string(),
            StoredObject {
                content: content.to_vec(),
                object_id: object_id.clone(),
            },
        );
        let now = Self::now(&state);
        Self::record_history(&mut state, path, now);
        Ok(object_id)
    }

    async fn delete_object(&self, path: &str, object_id: &str) -> Result<(), SyncError> {
        self.counters.deletes.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write();
        self.check_repository(&state)?;
        Self::check_writable(&state, path)?;

        match state.objects.get(path) {
            None => Err(SyncError::RemoteNotFound(path.to_string())),
            Some(current) if current.object_id != object_id => Err(SyncError::RemoteRejected(
                format!("'{}': object id {} is stale", path, object_id),
            )),
            Some(_) => {
                state.objects.remove(path);
                let now = Self::now(&state);
                Self::record_history(&mut state, path, now);
                Ok(())
            }
        }
    }

    async fn last_change_time(&self, path: &str) -> Result<Option<DateTime<Utc>>, SyncError> {
        let state = self.state.read();
        self.check_repository(&state)?;
        Ok(state.history.get(path).copied())
    }

    async fn create_repository(&self, name: &str) -> Result<(), SyncError> {
        let mut state = self.state.write();
        if name != self.name {
            return Err(SyncError::RemoteRejected(format!(
                "this store only manages '{}'",
                self.name
            )));
        }
        if state.exists {
            return Err(SyncError::RemoteRejected(format!(
                "repository '{}' already exists",
                name
            )));
        }
        state.exists = true;
        Ok(())
    }

    async fn delete_repository(&self, name: &str) -> Result<(), SyncError> {
        let mut state = self.state.write();
        if name != self.name || !state.exists {
            return Err(SyncError::RemoteNotFound(name.to_string()));
        }
        state.exists = false;
        state.objects.clear();
        state.history.clear();
        Ok(())
    }

    async fn repository_exists(&self, name: &str) -> Result<bool, SyncError> {
        Ok(name == self.name && self.state.read().exists)
    }

    fn describe(&self) -> String {
        format!("memory:{}", self.name)
    }
}
