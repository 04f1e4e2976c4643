//! Run summary export (JSON).

use anyhow::{Context, Result};
use std::path::Path;

use crate::runner::RunResult;

/// Writes the summary together with the config that produced it and the
/// positions left open at the end of the run.
pub fn write_summary_json(path: &Path, result: &RunResult) -> Result<()> {
    let doc = serde_json::json!({
        "schema_version": result.schema_version,
        "config": result.config,
        "summary": result.summary,
        "open_positions": result.open_positions,
        "risk_events": result.risk_events,
    });
    let json = serde_json::to_string_pretty(&doc).context("Failed to serialize run summary")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    Ok(())
}
