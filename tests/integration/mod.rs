//! Integration tests for the vaultsync reconciliation engine

mod busy_guard;
mod fs_roundtrip;
mod hashing;
mod scenarios;
mod test_utils;
