//! Repository presentation: status view.

use super::shared::{table_with_header, to_pretty_json};
use crate::error::SyncError;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Repository status as shown by `repo status`
#[derive(Debug, Clone, Serialize)]
pub struct RepoStatus {
    pub remote: String,
    pub exists: bool,
    pub remote_files: Option<usize>,
    pub local_files: usize,
    pub pending_push: Option<usize>,
    pub pending_pull: Option<usize>,
}

pub fn format_repo_status_text(status: &RepoStatus) -> String {
    let state = if status.exists {
        "exists".green().to_string()
    } else {
        "missing".red().to_string()
    };
    let count = |value: Option<usize>| value.map_or_else(|| "-".to_string(), |n| n.to_string());

    let mut table = table_with_header(vec!["Field", "Value"]);
    table.add_row(vec!["Remote".to_string(), status.remote.clone()]);
    table.add_row(vec!["Repository".to_string(), state]);
    table.add_row(vec!["Remote files".to_string(), count(status.remote_files)]);
    table.add_row(vec!["Local files".to_string(), status.local_files.to_string()]);
    table.add_row(vec!["Pending push".to_string(), count(status.pending_push)]);
    table.add_row(vec!["Pending pull".to_string(), count(status.pending_pull)]);
    table.to_string()
}

pub fn format_repo_status_json(status: &RepoStatus) -> Result<String, SyncError> {
    to_pretty_json(status)
}
