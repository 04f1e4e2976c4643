//! End-to-end: tapes and config on disk → run → artifacts on disk.

use std::fs;
use std::path::{Path, PathBuf};

use chanlab_core::domain::{
    Candle, Direction, ExitReason, Fractal, FractalKind, IndicatorSample, PatternClass, Stroke,
};
use chanlab_core::feed::TapeFrame;
use chanlab_runner::{run_from_tapes, ArtifactManager, RunError, StrategyConfig};
use chrono::{Duration, NaiveDate, NaiveDateTime};

// ── Helpers ──────────────────────────────────────────────────────────

const CONFIG: &str = r#"
[strategy]
symbol = "BTC/USDT"
trend_timeframe = "1w"
execution_timeframe = "1d"
initial_capital = 10000.0

[risk]
max_consecutive_losses = 2
"#;

fn day(d: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 2, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::days(d)
}

fn flat(d: i64) -> TapeFrame {
    TapeFrame::new(
        Candle::new(day(d), 100.0, 101.0, 99.0, 100.0),
        IndicatorSample::new(0.0, 0.0, 0.0),
    )
}

/// First-type buy on day 13, closed by a top fractal on day 14 at 99.
fn execution_frames() -> Vec<TapeFrame> {
    let mut frames: Vec<TapeFrame> = (0..13).map(flat).collect();
    frames.push(flat(13).with_strokes(vec![
        Stroke::new(Direction::Up, 92.0, 104.0, 0, 4),
        Stroke::new(Direction::Down, 90.0, 104.0, 4, 8),
        Stroke::new(Direction::Up, 95.0, 103.0, 8, 13),
    ]));
    frames.push(
        TapeFrame::new(
            Candle::new(day(14), 100.0, 100.5, 98.5, 99.0),
            IndicatorSample::new(0.0, 0.0, 0.0),
        )
        .with_fractals(vec![
            Fractal::new(FractalKind::Bottom, 8, 90.0, 9),
            Fractal::new(FractalKind::Top, 10, 104.0, 11),
            Fractal::new(FractalKind::Top, 13, 101.0, 14),
        ]),
    );
    frames.extend((15..20).map(flat));
    frames
}

fn write_tape(dir: &Path, name: &str, frames: &[TapeFrame]) -> PathBuf {
    let path = dir.join(name);
    let body: Vec<String> = frames
        .iter()
        .map(|f| serde_json::to_string(f).unwrap())
        .collect();
    fs::write(&path, body.join("\n")).unwrap();
    path
}

fn write_inputs(dir: &Path) -> (StrategyConfig, PathBuf, PathBuf) {
    let config_path = dir.join("strategy.toml");
    fs::write(&config_path, CONFIG).unwrap();
    let config = StrategyConfig::from_file(&config_path).unwrap();
    let trend = write_tape(dir, "trend.jsonl", &(0..3).map(|w| flat(w * 7)).collect::<Vec<_>>());
    let execution = write_tape(dir, "execution.jsonl", &execution_frames());
    (config, trend, execution)
}

// ── Tests ────────────────────────────────────────────────────────────

#[test]
fn run_from_tapes_records_the_round_trip_trade() {
    let dir = tempfile::tempdir().unwrap();
    let (config, trend, execution) = write_inputs(dir.path());

    let result = run_from_tapes(&config, &trend, &execution).unwrap();
    let s = &result.summary;
    assert_eq!(s.execution_steps, 20);
    assert_eq!(s.trend_steps, 3);
    assert_eq!(s.trade_count, 1);
    assert_eq!(s.trades_by_pattern["first"], 1);
    assert!((s.final_capital - 9_990.0).abs() < 1e-9);
    assert!((s.realized_profit - (-10.0)).abs() < 1e-9);
    assert_eq!(s.win_rate, 0.0);
    assert!(s.max_drawdown < 0.0);
    assert_eq!(result.trades[0].pattern, PatternClass::First);
    assert_eq!(result.equity_curve.len(), 20);
    // The higher-low structure persists, so the long is re-entered on day 15.
    assert_eq!(s.open_positions, result.open_positions.len());
}

#[test]
fn artifacts_are_written_and_readable() {
    let dir = tempfile::tempdir().unwrap();
    let (config, trend, execution) = write_inputs(dir.path());
    let result = run_from_tapes(&config, &trend, &execution).unwrap();

    let manager = ArtifactManager::new(dir.path().join("out")).unwrap();
    let paths = manager.save_run(&result).unwrap();
    assert!(paths.run_dir.ends_with("BTC-USDT_1w_1d"));
    assert!(paths.summary_json.exists());
    assert!(paths.equity_csv.exists());
    assert!(paths.trades_csv.exists());
    assert!(paths.trades_json.exists());

    let mut reader = csv::Reader::from_path(&paths.trades_csv).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "position_id");
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][1], "sell");
    assert_eq!(&rows[0][12], "reversal fractal exit");

    let equity_rows = csv::Reader::from_path(&paths.equity_csv)
        .unwrap()
        .records()
        .count();
    assert_eq!(equity_rows, 20);

    let trades: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.trades_json).unwrap()).unwrap();
    assert_eq!(trades.as_array().unwrap().len(), 1);
    assert_eq!(trades[0]["reason"], "reversal_fractal");

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.summary_json).unwrap()).unwrap();
    assert_eq!(summary["summary"]["symbol"], "BTC/USDT");
    assert_eq!(summary["config"]["risk"]["max_consecutive_losses"], 2);
}

#[test]
fn malformed_tape_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let (config, trend, _) = write_inputs(dir.path());
    let bad = dir.path().join("bad.jsonl");
    fs::write(&bad, "{\"candle\": 42}\n").unwrap();

    let err = run_from_tapes(&config, &trend, &bad).unwrap_err();
    assert!(matches!(err, RunError::Halted { .. }));
    let partial = err.partial().unwrap();
    assert_eq!(partial.summary.execution_steps, 0);
    assert!(partial.trades.is_empty());
}

#[test]
fn truncated_tape_keeps_committed_trades() {
    let dir = tempfile::tempdir().unwrap();
    let (config, trend, _) = write_inputs(dir.path());
    // Days 0..=14, then a line cut off mid-record.
    let frames = &execution_frames()[..15];
    let path = write_tape(dir.path(), "cut.jsonl", frames);
    let mut text = fs::read_to_string(&path).unwrap();
    text.push_str("\n{\"candle\": {\"time\": \"2024-02-16\", \"open\": 100.0");
    fs::write(&path, text).unwrap();

    let err = run_from_tapes(&config, &trend, &path).unwrap_err();
    assert!(err.to_string().contains("after 15 execution steps"));
    let partial = err.partial().unwrap();
    assert_eq!(partial.trades.len(), 1);
    assert_eq!(partial.trades[0].reason, ExitReason::ReversalFractal);
    assert!((partial.summary.final_capital - 9_990.0).abs() < 1e-9);
    assert_eq!(partial.equity_curve.len(), 15);

    let manager = ArtifactManager::new(dir.path().join("out")).unwrap();
    let paths = manager.save_run(partial).unwrap();
    let rows = csv::Reader::from_path(&paths.trades_csv)
        .unwrap()
        .records()
        .count();
    assert_eq!(rows, 1);
}

#[test]
fn invalid_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, CONFIG.replace("\"1d\"", "\"1M\"")).unwrap();
    assert!(StrategyConfig::from_file(&path).is_err());
    assert!(StrategyConfig::from_file(&dir.path().join("missing.toml")).is_err());
}
