// src/report/json.rs
// =============================================================================
// JSON output of the full report.
//
// serde_json writes non-ASCII characters as-is, so Cyrillic titles stay
// readable in the file.
// =============================================================================

use std::fs;
use std::path::Path;

use super::types::AuditReport;
use crate::error::Result;

/// Pretty-printed (2-space indented) JSON.
pub fn to_json(report: &AuditReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes the report as UTF-8 JSON, replacing any existing file.
pub fn write_json(report: &AuditReport, path: &Path) -> Result<()> {
    let mut json = to_json(report)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}
