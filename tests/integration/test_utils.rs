//! Shared test utilities for integration tests

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use vaultsync::confirm::{Confirm, ConfirmPrompt};
use vaultsync::remote::MemoryRemoteStore;
use vaultsync::store::MemoryLocalStore;
use vaultsync::{SyncOrchestrator, SyncSettings};

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// In-memory local and remote stores wired to one orchestrator
pub struct Harness {
    pub local: Arc<MemoryLocalStore>,
    pub remote: Arc<MemoryRemoteStore>,
    pub sync: SyncOrchestrator,
}

impl Harness {
    pub fn new(confirm: impl Confirm + 'static) -> Self {
        Self::with_settings(confirm, SyncSettings::default())
    }

    pub fn with_settings(confirm: impl Confirm + 'static, settings: SyncSettings) -> Self {
        let local = Arc::new(MemoryLocalStore::new());
        let remote = Arc::new(MemoryRemoteStore::new("vault"));
        let sync = SyncOrchestrator::new(local.clone(), remote.clone(), Arc::new(confirm), settings);
        Self {
            local,
            remote,
            sync,
        }
    }
}

/// Records every prompt it is asked and answers with a fixed value
pub struct RecordingConfirm {
    pub answer: bool,
    pub asked: parking_lot::Mutex<Vec<ConfirmPrompt>>,
}

impl RecordingConfirm {
    pub fn answering(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer,
            asked: parking_lot::Mutex::new(Vec::new()),
        })
    }
}

impl Confirm for RecordingConfirm {
    fn confirm(&self, prompt: ConfirmPrompt) -> bool {
        self.asked.lock().push(prompt);
        self.answer
    }
}

/// Lets a test keep a handle on a [`RecordingConfirm`] handed to an orchestrator
pub struct SharedConfirm(pub Arc<RecordingConfirm>);

impl Confirm for SharedConfirm {
    fn confirm(&self, prompt: ConfirmPrompt) -> bool {
        self.0.confirm(prompt)
    }
}
