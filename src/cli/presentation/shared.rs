//! Shared presentation helpers.

use crate::error::SyncError;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde::Serialize;

pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, SyncError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| SyncError::RuntimeError(format!("Failed to render JSON: {}", e)))
}

/// Borderless table with a header row
pub fn table_with_header(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(header);
    table
}
