//! Push/pull presentation: outcome summaries and planned-change tables.

use super::shared::{table_with_header, to_pretty_json};
use crate::error::SyncError;
use crate::orchestrator::SyncOutcome;
use crate::types::{ApplyReport, DiffResult, EntryKind};
use owo_colors::OwoColorize;

pub fn format_outcome_text(outcome: &SyncOutcome, remote: &str) -> String {
    match outcome {
        SyncOutcome::Pushed { report } => {
            format_report(&format!("Pushed to {}", remote), report)
        }
        SyncOutcome::Pulled { report } => {
            format_report(&format!("Pulled from {}", remote), report)
        }
        SyncOutcome::NothingToPush => format!("{} Nothing to push", "✓".green()),
        SyncOutcome::UpToDate => format!("{} Already up to date", "✓".green()),
        SyncOutcome::RemoteEmpty => format!(
            "{} Remote {} is empty, nothing to pull",
            "!".yellow(),
            remote
        ),
        SyncOutcome::Aborted { reason } => format!("{} Aborted: {}", "✗".yellow(), reason),
        SyncOutcome::Planned { diff } => format_plan(diff),
    }
}

pub fn format_outcome_json(outcome: &SyncOutcome) -> Result<String, SyncError> {
    to_pretty_json(outcome)
}

fn format_report(title: &str, report: &ApplyReport) -> String {
    let mark = if report.is_success() {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    };
    let mut out = format!(
        "{} {}: {} applied, {} unchanged, {} failed",
        mark,
        title,
        report.applied.len(),
        report.skipped.len(),
        report.failed.len()
    );
    if !report.failed.is_empty() {
        let mut table = table_with_header(vec!["Path", "Error"]);
        for item in &report.failed {
            table.add_row(vec![&item.path, &item.error]);
        }
        out.push('\n');
        out.push_str(&table.to_string());
    }
    out
}

fn format_plan(diff: &DiffResult) -> String {
    if diff.is_empty() {
        return "Dry run: no changes".to_string();
    }
    let mut table = table_with_header(vec!["Action", "Kind", "Path"]);
    for entry in &diff.to_delete {
        table.add_row(vec!["delete", kind_label(entry.kind), entry.path.as_str()]);
    }
    for entry in &diff.to_upsert {
        table.add_row(vec!["upsert", kind_label(entry.kind), entry.path.as_str()]);
    }
    format!(
        "Dry run: {} to delete, {} to upsert\n{}",
        diff.to_delete.len(),
        diff.to_upsert.len(),
        table
    )
}

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::File => "file",
        EntryKind::Directory => "dir",
    }
}
