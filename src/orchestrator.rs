//! Sync Orchestrator
//!
//! Runs one push or pull end to end: scan, fetch, diff, gate, apply. At most
//! one run is in flight per orchestrator; a concurrent caller gets
//! [`SyncError::Busy`] instead of waiting.

use crate::apply::{
    ChangeApplier, LocalApplier, RemoteApplier, DEFAULT_MAX_CONCURRENT_TRANSFERS,
};
use crate::apply::remote::DEFAULT_EMPTY_FILE_PLACEHOLDER;
use crate::conflict::ConflictPolicy;
use crate::confirm::{Confirm, ConfirmPrompt};
use crate::diff::{pull_diff, push_diff};
use crate::error::SyncError;
use crate::fetch::{fetch, RemoteTree};
use crate::remote::RemoteStore;
use crate::scan::{scan_tree, LocalScan, ScanFilter};
use crate::store::LocalStore;
use crate::types::{ApplyReport, DiffResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Default auto-sync period
pub const DEFAULT_AUTO_SYNC_INTERVAL_SECS: u64 = 300;

/// Sync behaviour settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Period of the auto-sync timer, in seconds
    #[serde(default = "default_auto_sync_interval")]
    pub auto_sync_interval_secs: u64,

    #[serde(default)]
    pub conflict_policy: ConflictPolicy,

    /// Upper bound on parallel uploads/downloads
    #[serde(default = "default_max_concurrent_transfers")]
    pub max_concurrent_transfers: usize,

    /// Written in place of zero-length text files before they are pushed
    #[serde(default = "default_empty_file_placeholder")]
    pub empty_file_placeholder: String,

    /// Component names never synced (hidden paths are always skipped)
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

fn default_auto_sync_interval() -> u64 {
    DEFAULT_AUTO_SYNC_INTERVAL_SECS
}

fn default_max_concurrent_transfers() -> usize {
    DEFAULT_MAX_CONCURRENT_TRANSFERS
}

fn default_empty_file_placeholder() -> String {
    DEFAULT_EMPTY_FILE_PLACEHOLDER.to_string()
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            auto_sync_interval_secs: default_auto_sync_interval(),
            conflict_policy: ConflictPolicy::default(),
            max_concurrent_transfers: default_max_concurrent_transfers(),
            empty_file_placeholder: default_empty_file_placeholder(),
            ignore_patterns: Vec::new(),
        }
    }
}

impl SyncSettings {
    pub fn auto_sync_interval(&self) -> Duration {
        Duration::from_secs(self.auto_sync_interval_secs)
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.auto_sync_interval_secs == 0 {
            errors.push("sync.auto_sync_interval_secs must be greater than zero".to_string());
        }
        if self.max_concurrent_transfers == 0 {
            errors.push("sync.max_concurrent_transfers must be greater than zero".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    Scanning,
    Diffing,
    ConflictCheck,
    Applying,
    Done,
    Aborted,
    Failed,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    Pushed { report: ApplyReport },
    NothingToPush,
    Pulled { report: ApplyReport },
    UpToDate,
    RemoteEmpty,
    Aborted { reason: String },
    Planned { diff: DiffResult },
}

impl SyncOutcome {
    /// The apply report, for runs that reached the apply phase
    pub fn report(&self) -> Option<&ApplyReport> {
        match self {
            SyncOutcome::Pushed { report } | SyncOutcome::Pulled { report } => Some(report),
            _ => None,
        }
    }
}

/// Coordinates push and pull runs between one local and one remote store
pub struct SyncOrchestrator {
    local: Arc<dyn LocalStore>,
    remote: Arc<dyn RemoteStore>,
    confirm: Arc<dyn Confirm>,
    settings: SyncSettings,
    phase: RwLock<SyncPhase>,
    in_flight: Mutex<()>,
}

impl SyncOrchestrator {
    pub fn new(
        local: Arc<dyn LocalStore>,
        remote: Arc<dyn RemoteStore>,
        confirm: Arc<dyn Confirm>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            local,
            remote,
            confirm,
            settings,
            phase: RwLock::new(SyncPhase::Idle),
            in_flight: Mutex::new(()),
        }
    }

    pub fn phase(&self) -> SyncPhase {
        *self.phase.read()
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn remote(&self) -> &Arc<dyn RemoteStore> {
        &self.remote
    }

    /// Make the remote match the local tree
    pub async fn push(&self, dry_run: bool) -> Result<SyncOutcome, SyncError> {
        self.push_with_confirm(dry_run, self.confirm.as_ref()).await
    }

    /// Push, answering prompts with `confirm` instead of the configured one
    #[instrument(skip(self, confirm), fields(remote = %self.remote.describe()))]
    pub async fn push_with_confirm(
        &self,
        dry_run: bool,
        confirm: &dyn Confirm,
    ) -> Result<SyncOutcome, SyncError> {
        let _guard = self.in_flight.try_lock().map_err(|_| SyncError::Busy)?;
        let result = self.run_push(dry_run, confirm).await;
        self.finish("push", &result);
        result
    }

    /// Make the local tree match the remote
    #[instrument(skip(self), fields(remote = %self.remote.describe()))]
    pub async fn pull(&self, dry_run: bool) -> Result<SyncOutcome, SyncError> {
        let _guard = self.in_flight.try_lock().map_err(|_| SyncError::Busy)?;
        let result = self.run_pull(dry_run).await;
        self.finish("pull", &result);
        result
    }

    async fn run_push(
        &self,
        dry_run: bool,
        confirm: &dyn Confirm,
    ) -> Result<SyncOutcome, SyncError> {
        let (local, remote) = self.snapshots().await?;
        let local = local.snapshot;
        let remote_populated = !remote.is_empty();
        let remote = remote.into_snapshot();

        if !local.has_files() && remote_populated && !dry_run {
            if !confirm.confirm(ConfirmPrompt::EmptyPush) {
                return Ok(self.declined(ConfirmPrompt::EmptyPush));
            }
            warn!("Pushing an empty local tree over a populated remote");
        }

        self.set_phase(SyncPhase::Diffing);
        let diff = push_diff(&local, &remote);
        debug!(
            deletes = diff.to_delete.len(),
            upserts = diff.to_upsert.len(),
            "Computed push diff"
        );
        if dry_run {
            return Ok(SyncOutcome::Planned { diff });
        }
        if diff.is_empty() {
            return Ok(SyncOutcome::NothingToPush);
        }

        self.set_phase(SyncPhase::Applying);
        let applier = RemoteApplier::new(self.local.clone(), self.remote.clone())
            .with_placeholder(self.settings.empty_file_placeholder.clone())
            .with_max_concurrent(self.settings.max_concurrent_transfers);
        let report = applier.apply(&diff).await?;
        Ok(SyncOutcome::Pushed { report })
    }

    async fn run_pull(&self, dry_run: bool) -> Result<SyncOutcome, SyncError> {
        let (local, remote) = self.snapshots().await?;
        let RemoteTree::Populated(remote) = remote else {
            info!("Remote is empty, nothing to pull");
            return Ok(SyncOutcome::RemoteEmpty);
        };

        self.set_phase(SyncPhase::Diffing);
        let mut diff = pull_diff(&local.snapshot, &remote);
        local.spare_retained(&mut diff);
        debug!(
            deletes = diff.to_delete.len(),
            upserts = diff.to_upsert.len(),
            "Computed pull diff"
        );
        if dry_run {
            return Ok(SyncOutcome::Planned { diff });
        }
        if diff.is_empty() {
            return Ok(SyncOutcome::UpToDate);
        }

        self.set_phase(SyncPhase::ConflictCheck);
        if self.settings.conflict_policy.blocks(&local.snapshot, &remote, &diff)
            && !self.confirm.confirm(ConfirmPrompt::PullConflict)
        {
            return Ok(self.declined(ConfirmPrompt::PullConflict));
        }

        self.set_phase(SyncPhase::Applying);
        let applier = LocalApplier::new(self.local.clone(), self.remote.clone())
            .with_max_concurrent(self.settings.max_concurrent_transfers);
        let report = applier.apply(&diff).await?;
        Ok(SyncOutcome::Pulled { report })
    }

    async fn snapshots(&self) -> Result<(LocalScan, RemoteTree), SyncError> {
        self.set_phase(SyncPhase::Scanning);
        let filter = ScanFilter::new(self.settings.ignore_patterns.clone());
        let local = scan_tree(self.local.as_ref(), &filter).await?;
        let remote = fetch(self.remote.as_ref(), &filter).await?;
        Ok((local, remote))
    }

    fn declined(&self, prompt: ConfirmPrompt) -> SyncOutcome {
        info!(prompt = ?prompt, "Confirmation declined, no changes made");
        SyncOutcome::Aborted {
            reason: prompt.declined_reason().to_string(),
        }
    }

    fn set_phase(&self, phase: SyncPhase) {
        *self.phase.write() = phase;
    }

    fn finish(&self, operation: &str, result: &Result<SyncOutcome, SyncError>) {
        match result {
            Ok(SyncOutcome::Aborted { .. }) => self.set_phase(SyncPhase::Aborted),
            Ok(outcome) => {
                self.set_phase(SyncPhase::Done);
                match outcome.report() {
                    Some(report) => info!(
                        operation,
                        applied = report.applied.len(),
                        failed = report.failed.len(),
                        "Sync finished"
                    ),
                    None => info!(operation, outcome = ?outcome, "Sync finished"),
                }
            }
            Err(e) => {
                self.set_phase(SyncPhase::Failed);
                warn!(operation, error = %e, "Sync failed");
            }
        }
    }
}
