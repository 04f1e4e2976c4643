//! ChanLab CLI: run strategies from structure tapes and validate configs.
//!
//! Commands:
//! - `run`: replay a trend tape and an execution tape under a TOML config
//! - `check-config`: parse and validate a config without running it
//! - `timeframes`: list the accepted timeframe strings

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chanlab_core::domain::Timeframe;
use chanlab_runner::{run_from_tapes, ArtifactManager, RunResult, StrategyConfig};

#[derive(Parser)]
#[command(
    name = "chanlab",
    about = "ChanLab CLI: multi-timeframe chan-structure strategy engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a strategy over recorded structure tapes.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// JSON-lines tape for the trend (higher) timeframe.
        #[arg(long)]
        trend_tape: PathBuf,

        /// JSON-lines tape for the execution (lower) timeframe.
        #[arg(long)]
        execution_tape: PathBuf,

        /// Output directory for run artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Print the summary only; write no artifacts.
        #[arg(long, default_value_t = false)]
        no_artifacts: bool,
    },
    /// Parse and validate a config file, then print it back normalized.
    CheckConfig {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,
    },
    /// List accepted timeframe strings, finest first.
    Timeframes,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            trend_tape,
            execution_tape,
            output_dir,
            no_artifacts,
        } => run_cmd(&config, &trend_tape, &execution_tape, &output_dir, no_artifacts),
        Commands::CheckConfig { config } => check_config_cmd(&config),
        Commands::Timeframes => {
            for tf in Timeframe::ALL {
                let kind = if tf.is_intraday() { "intraday" } else { "daily+" };
                println!("{:<4} {kind}", tf.interval());
            }
            Ok(())
        }
    }
}

fn run_cmd(
    config_path: &Path,
    trend_tape: &Path,
    execution_tape: &Path,
    output_dir: &Path,
    no_artifacts: bool,
) -> Result<()> {
    let config = StrategyConfig::from_file(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;

    match run_from_tapes(&config, trend_tape, execution_tape) {
        Ok(result) => report(&result, output_dir, no_artifacts),
        Err(err) => {
            // A halted run still exports what it committed, then fails.
            if let Some(partial) = err.partial() {
                eprintln!("Run halted; reporting partial results.");
                report(partial, output_dir, no_artifacts)?;
            }
            Err(err.into())
        }
    }
}

fn report(result: &RunResult, output_dir: &Path, no_artifacts: bool) -> Result<()> {
    print_summary(result)?;
    if !no_artifacts {
        let manager = ArtifactManager::new(output_dir)?;
        let paths = manager.save_run(result)?;
        println!("Artifacts saved to: {}", paths.run_dir.display());
    }
    Ok(())
}

fn check_config_cmd(config_path: &Path) -> Result<()> {
    let config = StrategyConfig::from_file(config_path)
        .with_context(|| format!("validating config {}", config_path.display()))?;
    print!("{}", config.to_toml().context("re-serializing config")?);
    Ok(())
}

fn print_summary(result: &RunResult) -> Result<()> {
    let s = &result.summary;
    println!(
        "{} [{} / {}] trend {}",
        s.symbol, s.trend_timeframe, s.execution_timeframe, s.trend
    );
    println!(
        "  capital {:.2} -> {:.2} ({:+.2}%)  max drawdown {:.2}%",
        s.initial_capital,
        s.final_capital,
        s.total_return * 100.0,
        s.max_drawdown * 100.0
    );
    println!(
        "  trades {}  win rate {:.1}%  profit factor {:.2}  open {}  risk events {}",
        s.trade_count,
        s.win_rate * 100.0,
        s.profit_factor,
        s.open_positions,
        s.risk_events
    );
    println!(
        "{}",
        serde_json::to_string_pretty(s).context("serializing summary")?
    );
    Ok(())
}
