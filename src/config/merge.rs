//! Merge rules for the layered configuration.

pub(crate) mod merge_policy;
