//! SignalScope CLI: run the analysis on a CSV of bars and print JSON.
//!
//! Commands:
//! - `analyze`: full report (indicators, levels, gaps, signals, entry plan)
//! - `check`: validate the series only and list its conditions

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use signalscope_core::data::load_csv;
use signalscope_core::signals::SignalPolicy;
use signalscope_core::validate::validate_series;
use signalscope_core::{analyze, AnalysisConfig, Series, SeriesMeta};

#[derive(Parser)]
#[command(
    name = "signalscope",
    about = "SignalScope CLI: technical analysis report for an OHLCV series"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis and print the report as JSON.
    Analyze {
        #[command(flatten)]
        source: Source,

        /// TOML config file. Flags below override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Signal policy.
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Trailing window for levels and gap scanning.
        #[arg(long)]
        lookback: Option<usize>,

        /// Keep only the last N signals in the output.
        #[arg(long)]
        tail: Option<usize>,

        /// Write the report here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Single-line JSON.
        #[arg(long, default_value_t = false)]
        compact: bool,
    },
    /// Validate the series and print the conditions found.
    Check {
        #[command(flatten)]
        source: Source,

        /// Minimum number of bars.
        #[arg(long, default_value_t = 30)]
        min_bars: usize,
    },
}

#[derive(clap::Args)]
struct Source {
    /// CSV with timestamp,open,high,low,close,volume columns.
    #[arg(long)]
    input: PathBuf,

    /// Instrument id carried into the report.
    #[arg(long, default_value = "")]
    instrument: String,

    /// Bar interval carried into the report (e.g. 1h, 1d).
    #[arg(long, default_value = "")]
    interval: String,
}

impl Source {
    fn load(&self) -> Result<Series> {
        let meta = SeriesMeta::new(self.instrument.clone(), self.interval.clone());
        load_csv(&self.input, meta)
            .with_context(|| format!("loading bars from {}", self.input.display()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    Threshold,
    MajorityVote,
}

impl From<PolicyArg> for SignalPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Threshold => SignalPolicy::Threshold,
            PolicyArg::MajorityVote => SignalPolicy::MajorityVote,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            source,
            config,
            policy,
            lookback,
            tail,
            output,
            compact,
        } => {
            let config = build_config(config.as_deref(), policy, lookback)?;
            run_analyze(&source, &config, tail, output.as_deref(), compact)
        }
        Commands::Check { source, min_bars } => run_check(&source, min_bars),
    }
}

fn build_config(
    path: Option<&Path>,
    policy: Option<PolicyArg>,
    lookback: Option<usize>,
) -> Result<AnalysisConfig> {
    let mut config = match path {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(policy) = policy {
        config.signal_policy = policy.into();
    }
    if let Some(lookback) = lookback {
        config.lookback_window = lookback;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run_analyze(
    source: &Source,
    config: &AnalysisConfig,
    tail: Option<usize>,
    output: Option<&Path>,
    compact: bool,
) -> Result<()> {
    let series = source.load()?;
    let report = analyze(&series, config).context("analysis failed")?;
    info!(
        "{} bars, {} gap zones, fingerprint {}",
        series.len(),
        report.gap_zones.len(),
        report.fingerprint
    );

    let mut value = serde_json::to_value(&report)?;
    if let Some(n) = tail {
        value["signals"] = serde_json::to_value(report.recent_signals(n))?;
    }
    let text = if compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };

    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            info!("report written to {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn run_check(source: &Source, min_bars: usize) -> Result<()> {
    let series = source.load()?;
    let (series, conditions) =
        validate_series(&series, min_bars).context("series failed validation")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "bars": series.len(),
            "conditions": conditions,
        }))?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_analyze_flags() {
        let cli = Cli::try_parse_from([
            "signalscope",
            "analyze",
            "--input",
            "bars.csv",
            "--policy",
            "majority-vote",
            "--tail",
            "20",
            "--instrument",
            "BTCUSDT",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                source,
                policy,
                tail,
                compact,
                ..
            } => {
                assert_eq!(source.input, PathBuf::from("bars.csv"));
                assert_eq!(source.instrument, "BTCUSDT");
                assert_eq!(policy, Some(PolicyArg::MajorityVote));
                assert_eq!(tail, Some(20));
                assert!(!compact);
            }
            Commands::Check { .. } => panic!("expected analyze"),
        }
    }

    #[test]
    fn analyze_requires_input() {
        assert!(Cli::try_parse_from(["signalscope", "analyze"]).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let config = build_config(None, Some(PolicyArg::MajorityVote), Some(50)).unwrap();
        assert_eq!(config.signal_policy, SignalPolicy::MajorityVote);
        assert_eq!(config.lookback_window, 50);
        assert_eq!(config.rsi_window, 14);
    }

    #[test]
    fn zero_lookback_is_rejected() {
        assert!(build_config(None, None, Some(0)).is_err());
    }
}
