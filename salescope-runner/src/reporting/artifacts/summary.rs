//! Run summary export (JSON).

use anyhow::{Context, Result};
use std::path::Path;

use crate::analysis::AnalysisResult;

/// Everything except the per-row data, which goes to the CSV exports.
pub fn write_summary_json(path: &Path, result: &AnalysisResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)
        .context("Failed to serialize analysis summary")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    Ok(())
}
