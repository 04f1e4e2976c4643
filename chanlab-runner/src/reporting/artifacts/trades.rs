//! Trade history export (CSV/JSON).

use anyhow::{Context, Result};
use std::path::Path;

use chanlab_core::domain::bar_time::DISPLAY_FORMAT;
use chanlab_core::domain::TradeRecord;

/// Columns: position_id, kind, side, pattern, entry_time, entry_price,
/// exit_time, exit_price, size, profit, return_pct, equity_after, reason
pub fn write_trades_csv(path: &Path, trades: &[TradeRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create trades CSV {}", path.display()))?;

    wtr.write_record([
        "position_id",
        "kind",
        "side",
        "pattern",
        "entry_time",
        "entry_price",
        "exit_time",
        "exit_price",
        "size",
        "profit",
        "return_pct",
        "equity_after",
        "reason",
    ])?;

    for t in trades {
        wtr.write_record([
            &t.position_id.to_string(),
            &t.kind.to_string(),
            &t.side.to_string(),
            &t.pattern.to_string(),
            &t.entry_time.format(DISPLAY_FORMAT).to_string(),
            &format!("{:.6}", t.entry_price),
            &t.time.format(DISPLAY_FORMAT).to_string(),
            &format!("{:.6}", t.price),
            &format!("{:.6}", t.size),
            &format!("{:.2}", t.profit),
            &format!("{:.4}", t.return_pct()),
            &format!("{:.2}", t.equity_after),
            &t.reason.to_string(),
        ])?;
    }

    wtr.flush()
        .with_context(|| format!("Failed to flush trades CSV {}", path.display()))?;
    Ok(())
}

pub fn write_trades_json(path: &Path, trades: &[TradeRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(trades).context("Failed to serialize trades")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write trades JSON {}", path.display()))?;
    Ok(())
}
