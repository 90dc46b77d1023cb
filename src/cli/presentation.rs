//! CLI presentation: text and json formatters per command family.

mod repo;
mod shared;
mod sync;

pub use repo::{format_repo_status_json, format_repo_status_text, RepoStatus};
pub use shared::to_pretty_json;
pub use sync::{format_outcome_json, format_outcome_text};
