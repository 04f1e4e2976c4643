//! Artifact manager for persisting run outputs.

mod equity;
mod summary;
mod trades;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::runner::RunResult;

/// Artifact paths returned after export.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub run_dir: PathBuf,
    pub summary_json: PathBuf,
    pub equity_csv: PathBuf,
    pub trades_csv: PathBuf,
    pub trades_json: PathBuf,
}

/// Manages writing all artifacts for a run.
#[derive(Debug, Clone)]
pub struct ArtifactManager {
    output_dir: PathBuf,
}

impl ArtifactManager {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)
            .context("Failed to create artifact output directory")?;
        Ok(Self { output_dir })
    }

    /// Directory name for a run: `{symbol}_{trend}_{execution}`, with path
    /// separators in the symbol replaced.
    pub fn run_dir_name(result: &RunResult) -> String {
        let s = &result.summary;
        let symbol: String = s
            .symbol
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
            .collect();
        format!("{symbol}_{}_{}", s.trend_timeframe, s.execution_timeframe)
    }

    /// Save complete run artifacts. Existing files for the same run are overwritten.
    pub fn save_run(&self, result: &RunResult) -> Result<ArtifactPaths> {
        let run_dir = self.output_dir.join(Self::run_dir_name(result));
        std::fs::create_dir_all(&run_dir)
            .with_context(|| format!("Failed to create run directory {}", run_dir.display()))?;

        let summary_json = run_dir.join("summary.json");
        summary::write_summary_json(&summary_json, result)?;

        let equity_csv = run_dir.join("equity.csv");
        equity::write_equity_csv(&equity_csv, &result.equity_curve)?;

        let trades_csv = run_dir.join("trades.csv");
        let trades_json = run_dir.join("trades.json");
        trades::write_trades_csv(&trades_csv, &result.trades)?;
        trades::write_trades_json(&trades_json, &result.trades)?;

        Ok(ArtifactPaths {
            run_dir,
            summary_json,
            equity_csv,
            trades_csv,
            trades_json,
        })
    }
}
