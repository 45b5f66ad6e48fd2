//! CLI definition and dispatch.

use chrono::DateTime;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::trade_tape_adapter::TradeTapeAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig};
use crate::domain::config_validation::{
    validate_backtest_config, validate_data_config, validate_strategy_config,
    DEFAULT_BAND_MULTIPLIER, DEFAULT_BAND_WINDOW, DEFAULT_INITIAL_CAPITAL, DEFAULT_LATENCY,
    DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW,
};
use crate::domain::error::TickbackError;
use crate::domain::metrics::Metrics;
use crate::domain::series::PriceSeries;
use crate::domain::signal::StrategySpec;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PricePort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tickback", about = "Deterministic tick-data backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the configured execution latency (in observations)
        #[arg(long)]
        latency: Option<usize>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the observation range of a trade tape
    Info {
        #[arg(long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            latency,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config)
            } else {
                run_backtest(&config, output.as_ref(), latency)
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info { data } => run_info(&data),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TickbackError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_backtest(
    config_path: &PathBuf,
    output_path: Option<&PathBuf>,
    latency_override: Option<usize>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_all(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Build BacktestConfig
    let mut bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Some(latency) = latency_override {
        bt_config.latency = latency;
    }
    eprintln!(
        "Strategy: {}, latency {} observations, capital {}",
        bt_config.strategy, bt_config.latency, bt_config.initial_capital
    );

    // Stage 3: Load the trade tape
    let data_path = match adapter.get_string("data", "path") {
        Some(p) => PathBuf::from(p),
        None => {
            // validate_data_config already rejected this.
            eprintln!("error: no data path configured");
            return ExitCode::from(2);
        }
    };
    eprintln!("Reading trade tape from {}", data_path.display());

    let tape = TradeTapeAdapter::new(data_path);
    let series = match fetch_series(&tape) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("  {} observations", series.len());

    // Stage 4: Run the pipeline
    let result = match backtest_engine::run_backtest(&series, &bt_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: Console summary to stderr
    let metrics = Metrics::compute(&result.states);
    eprintln!("\n=== Results ===");
    eprintln!("Final Equity:     {:.6}", metrics.final_equity);
    eprintln!("Total Return:     {:.2}%", metrics.total_return * 100.0);
    eprintln!("Max Drawdown:     {:.6}", metrics.max_drawdown);
    eprintln!("Realized Profit:  {:.6}", metrics.realized_profit);
    eprintln!("Trades:           {}", result.trades.len());
    eprintln!("  filled:         {}", result.filled_trades());
    eprintln!("  unfilled:       {}", result.unfilled_trades());

    // Stage 6: Write the CSV report
    let output = output_path
        .cloned()
        .or_else(|| adapter.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("portfolio.csv"));

    match CsvReportAdapter::new().write(&result, &output) {
        Ok(()) => {
            eprintln!("\nReport written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            (&e).into()
        }
    }
}

fn fetch_series(tape: &dyn PricePort) -> Result<PriceSeries, TickbackError> {
    let observations = tape.fetch_observations()?;
    PriceSeries::new(observations)
}

fn validate_all(adapter: &dyn ConfigPort) -> Result<(), TickbackError> {
    validate_backtest_config(adapter)?;
    validate_strategy_config(adapter)?;
    validate_data_config(adapter)?;
    Ok(())
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, TickbackError> {
    let latency = adapter.get_int("backtest", "latency", DEFAULT_LATENCY);
    if latency < 0 {
        return Err(TickbackError::ConfigInvalid {
            section: "backtest".into(),
            key: "latency".into(),
            reason: "latency must be non-negative".into(),
        });
    }

    Ok(BacktestConfig {
        strategy: build_strategy_spec(adapter)?,
        latency: latency as usize,
        initial_capital: adapter.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL),
    })
}

pub fn build_strategy_spec(adapter: &dyn ConfigPort) -> Result<StrategySpec, TickbackError> {
    let kind = adapter
        .get_string("strategy", "kind")
        .ok_or_else(|| TickbackError::ConfigMissing {
            section: "strategy".into(),
            key: "kind".into(),
        })?;

    let spec = match kind.trim() {
        "moving_average_crossover" => StrategySpec::MovingAverageCrossover {
            short_window: adapter.get_int("strategy", "short_window", DEFAULT_SHORT_WINDOW)
                as usize,
            long_window: adapter.get_int("strategy", "long_window", DEFAULT_LONG_WINDOW) as usize,
        },
        "mean_reversion_bands" => StrategySpec::MeanReversionBands {
            window: adapter.get_int("strategy", "window", DEFAULT_BAND_WINDOW) as usize,
            band_multiplier: adapter.get_double(
                "strategy",
                "band_multiplier",
                DEFAULT_BAND_MULTIPLIER,
            ),
        },
        other => {
            return Err(TickbackError::ConfigInvalid {
                section: "strategy".into(),
                key: "kind".into(),
                reason: format!("unknown strategy '{}'", other),
            });
        }
    };

    spec.validate()?;
    Ok(spec)
}

pub fn run_dry_run(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_all(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Config validated successfully");

    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nResolved run:");
    eprintln!("  strategy:        {}", bt_config.strategy);
    eprintln!("  latency:         {} observations", bt_config.latency);
    eprintln!("  initial capital: {}", bt_config.initial_capital);
    if let Some(path) = adapter.get_string("data", "path") {
        eprintln!("  data:            {}", path);
    }

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_data_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("Configuration is valid.");
    ExitCode::SUCCESS
}

fn run_info(data_path: &PathBuf) -> ExitCode {
    let tape = TradeTapeAdapter::new(data_path.clone());
    let observations = match tape.fetch_observations() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if observations.is_empty() {
        eprintln!("{}: no observations", data_path.display());
        return ExitCode::SUCCESS;
    }

    let first = &observations[0];
    let last = &observations[observations.len() - 1];
    println!(
        "{}: {} observations, {} to {}",
        data_path.display(),
        observations.len(),
        format_timestamp(first.timestamp),
        format_timestamp(last.timestamp),
    );
    println!("  first price: {}", first.price);
    println!("  last price:  {}", last.price);

    ExitCode::SUCCESS
}

fn format_timestamp(millis: i64) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string(),
        None => millis.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn build_backtest_config_uses_defaults() {
        let adapter = make_config("[strategy]\nkind = moving_average_crossover\n");
        let config = build_backtest_config(&adapter).unwrap();
        assert_eq!(config.latency, 10);
        assert!((config.initial_capital - 100.0).abs() < f64::EPSILON);
        assert!(matches!(
            config.strategy,
            StrategySpec::MovingAverageCrossover {
                short_window: 40,
                long_window: 100,
            }
        ));
    }

    #[test]
    fn build_backtest_config_reads_values() {
        let adapter = make_config(
            "[backtest]\ninitial_capital = 250\nlatency = 3\n\
             [strategy]\nkind = mean_reversion_bands\nwindow = 15\nband_multiplier = 1.5\n",
        );
        let config = build_backtest_config(&adapter).unwrap();
        assert_eq!(config.latency, 3);
        assert!((config.initial_capital - 250.0).abs() < f64::EPSILON);
        match config.strategy {
            StrategySpec::MeanReversionBands {
                window,
                band_multiplier,
            } => {
                assert_eq!(window, 15);
                assert!((band_multiplier - 1.5).abs() < f64::EPSILON);
            }
            other => panic!("unexpected strategy {:?}", other),
        }
    }

    #[test]
    fn build_backtest_config_rejects_negative_latency() {
        let adapter = make_config(
            "[backtest]\nlatency = -2\n[strategy]\nkind = moving_average_crossover\n",
        );
        let err = build_backtest_config(&adapter).unwrap_err();
        assert!(matches!(err, TickbackError::ConfigInvalid { key, .. } if key == "latency"));
    }

    #[test]
    fn build_strategy_spec_rejects_unknown_kind() {
        let adapter = make_config("[strategy]\nkind = momentum\n");
        let err = build_strategy_spec(&adapter).unwrap_err();
        assert!(matches!(err, TickbackError::ConfigInvalid { key, .. } if key == "kind"));
    }

    #[test]
    fn build_strategy_spec_runs_domain_validation() {
        let adapter = make_config(
            "[strategy]\nkind = moving_average_crossover\nshort_window = 50\nlong_window = 50\n",
        );
        let err = build_strategy_spec(&adapter).unwrap_err();
        assert!(matches!(err, TickbackError::Configuration { .. }));
    }

    #[test]
    fn format_timestamp_renders_millis() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00.000 UTC");
        assert_eq!(
            format_timestamp(1517961600000),
            "2018-02-07 00:00:00.000 UTC"
        );
    }
}
