//! Change Appliers
//!
//! Execute a [`DiffResult`] against one side. Deletes always finish before
//! upserts start; upserts run with bounded concurrency. Per-item failures are
//! collected in the [`ApplyReport`]; the only error that stops a run is an
//! integrity violation.

pub mod local;
pub mod remote;

pub use local::LocalApplier;
pub use remote::RemoteApplier;

use crate::error::SyncError;
use crate::types::{ApplyReport, DiffResult};
use async_trait::async_trait;

/// Default number of concurrent transfers in the upsert phase
pub const DEFAULT_MAX_CONCURRENT_TRANSFERS: usize = 4;

/// Applies a diff to one side of the sync
#[async_trait]
pub trait ChangeApplier: Send + Sync {
    async fn apply(&self, diff: &DiffResult) -> Result<ApplyReport, SyncError>;
}
