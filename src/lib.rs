//! vaultsync: one-way mirroring between a local notes vault and a remote repository
//!
//! Push makes the remote match the local tree, pull makes the local tree match
//! the remote. Both directions snapshot each side, diff the snapshots by git
//! blob fingerprint and apply only what differs.

pub mod apply;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod conflict;
pub mod diff;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod orchestrator;
pub mod remote;
pub mod scan;
pub mod scheduler;
pub mod store;
pub mod tree;
pub mod types;

pub use error::{StoreError, SyncError};
pub use orchestrator::{SyncOrchestrator, SyncOutcome, SyncPhase, SyncSettings};
pub use types::{ApplyReport, DiffResult, EntryKind, FileEntry, Snapshot};
