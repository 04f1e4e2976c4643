//! Equity curve export (CSV).

use anyhow::{Context, Result};
use std::path::Path;

use chanlab_core::domain::bar_time::DISPLAY_FORMAT;
use chanlab_core::engine::EquityPoint;

pub fn write_equity_csv(path: &Path, equity: &[EquityPoint]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create equity CSV {}", path.display()))?;
    wtr.write_record(["time", "equity", "drawdown"])?;
    for point in equity {
        wtr.write_record([
            &point.time.format(DISPLAY_FORMAT).to_string(),
            &format!("{:.4}", point.equity),
            &format!("{:.6}", point.drawdown),
        ])?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to flush equity CSV {}", path.display()))?;
    Ok(())
}
