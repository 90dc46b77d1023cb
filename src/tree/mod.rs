//! Local tree primitives
//!
//! Fingerprinting, content classification, path normalization and the
//! filesystem walker used by the local store.

pub mod content;
pub mod hasher;
pub mod path;
pub mod walker;
