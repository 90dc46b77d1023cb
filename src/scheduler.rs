//! Auto-sync scheduler
//!
//! Pushes on a fixed period until stopped. A tick that finds a run already in
//! flight is skipped. Scheduled pushes never erase the remote: the empty-push
//! prompt is always declined for them.

use crate::confirm::AssumeNo;
use crate::error::SyncError;
use crate::orchestrator::{SyncOrchestrator, SyncOutcome};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

struct Running {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Periodic push timer owned by the caller
pub struct AutoSyncScheduler {
    orchestrator: Arc<SyncOrchestrator>,
    period: Duration,
    running: Mutex<Option<Running>>,
}

impl AutoSyncScheduler {
    pub fn new(orchestrator: Arc<SyncOrchestrator>, period: Duration) -> Self {
        Self {
            orchestrator,
            period,
            running: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    /// Start the timer; no-op when already running. Must be called inside a runtime.
    pub fn start(&self) {
        let mut running = self.running.lock();
        if running
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
        {
            return;
        }

        let (stop, stopped) = watch::channel(false);
        let orchestrator = Arc::clone(&self.orchestrator);
        let period = self.period;
        let handle = tokio::spawn(async move {
            Self::run_loop(orchestrator, period, stopped).await;
        });
        *running = Some(Running { stop, handle });
        info!(period_secs = self.period.as_secs(), "Auto-sync started");
    }

    /// Stop the timer and wait for an in-flight tick to finish
    pub async fn stop(&self) {
        let Some(running) = self.running.lock().take() else {
            return;
        };
        let _ = running.stop.send(true);
        if let Err(e) = running.handle.await {
            warn!(error = %e, "Auto-sync task ended abnormally");
        }
        info!("Auto-sync stopped");
    }

    /// Flip the timer; returns whether it is running afterwards
    pub async fn toggle(&self) -> bool {
        if self.is_running() {
            self.stop().await;
            false
        } else {
            self.start();
            true
        }
    }

    async fn run_loop(
        orchestrator: Arc<SyncOrchestrator>,
        period: Duration,
        mut stopped: watch::Receiver<bool>,
    ) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; the first push happens one period in.
        ticker.tick().await;

        loop {
            tokio::select! {
                changed = stopped.changed() => {
                    if changed.is_err() || *stopped.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => Self::tick(&orchestrator).await,
            }
        }
    }

    async fn tick(orchestrator: &SyncOrchestrator) {
        match orchestrator.push_with_confirm(false, &AssumeNo).await {
            Ok(SyncOutcome::Pushed { report }) => info!(
                applied = report.applied.len(),
                failed = report.failed.len(),
                "Scheduled push finished"
            ),
            Ok(outcome) => debug!(outcome = ?outcome, "Scheduled push finished"),
            Err(SyncError::Busy) => debug!("Sync already in progress, skipping scheduled push"),
            Err(e) => warn!(error = %e, "Scheduled push failed"),
        }
    }
}
