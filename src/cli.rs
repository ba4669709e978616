//! CLI definition and dispatch.
//!
//! Reports go to stdout as JSON; progress and errors go to stderr so output
//! stays pipeable.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvBarAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::synthetic_adapter::SyntheticBarAdapter;
use crate::domain::analysis::{self, AnalysisConfig};
use crate::domain::error::MarketlensError;
use crate::domain::portfolio::{self, Holding};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::BarDataPort;

#[derive(Parser, Debug)]
#[command(name = "marketlens", about = "Stock analysis and portfolio risk engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one or more symbols
    Analyze {
        /// Symbols to analyze
        #[arg(required = true)]
        symbols: Vec<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory of per-symbol CSV files; synthetic data when absent
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Forecast horizon in trading days
        #[arg(long)]
        forecast_days: Option<usize>,
    },
    /// Analyze a weighted portfolio
    Portfolio {
        /// Holdings as SYMBOL=WEIGHT (bare SYMBOL means weight 1)
        holdings: Vec<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Show the available data range for a symbol
    Info {
        symbol: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            symbols,
            config,
            data_dir,
            forecast_days,
        } => run_analyze(&symbols, config.as_ref(), data_dir, forecast_days),
        Command::Portfolio {
            holdings,
            config,
            data_dir,
        } => run_portfolio(&holdings, config.as_ref(), data_dir),
        Command::Info {
            symbol,
            config,
            data_dir,
        } => run_info(&symbol, config.as_ref(), data_dir),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = MarketlensError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_analysis_config(adapter: Option<&dyn ConfigPort>) -> AnalysisConfig {
    let defaults = AnalysisConfig::default();
    match adapter {
        Some(adapter) => AnalysisConfig {
            history_days: adapter
                .get_int("analysis", "history_days", defaults.history_days as i64)
                .max(1) as usize,
            forecast_days: adapter
                .get_int("analysis", "forecast_days", defaults.forecast_days as i64)
                .max(1) as usize,
        },
        None => defaults,
    }
}

fn resolve_data_port(
    data_dir: Option<PathBuf>,
    adapter: Option<&dyn ConfigPort>,
) -> Box<dyn BarDataPort> {
    let dir = data_dir.or_else(|| {
        adapter
            .and_then(|a| a.get_string("data", "csv_dir"))
            .map(PathBuf::from)
    });
    match dir {
        Some(dir) => Box::new(CsvBarAdapter::new(dir)),
        None => Box::new(SyntheticBarAdapter),
    }
}

/// Parse a SYMBOL=WEIGHT argument. A bare symbol gets weight 1; an unparsable
/// weight degrades to 0 and is handled by weight normalization.
pub fn parse_holding(arg: &str) -> Holding {
    match arg.split_once('=') {
        Some((symbol, weight)) => {
            let weight = weight.trim().parse().unwrap_or_else(|_| {
                eprintln!("warning: ignoring non-numeric weight for {symbol}");
                0.0
            });
            Holding::new(symbol.trim(), weight)
        }
        None => Holding::new(arg.trim(), 1.0),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize report: {e}");
            ExitCode::from(1)
        }
    }
}

fn run_analyze(
    symbols: &[String],
    config_path: Option<&PathBuf>,
    data_dir: Option<PathBuf>,
    forecast_days: Option<usize>,
) -> ExitCode {
    let adapter = match config_path.map(load_config).transpose() {
        Ok(a) => a,
        Err(code) => return code,
    };
    let mut config = build_analysis_config(adapter.as_ref().map(|a| a as &dyn ConfigPort));
    if let Some(days) = forecast_days {
        config.forecast_days = days.max(1);
    }

    let data = resolve_data_port(data_dir, adapter.as_ref().map(|a| a as &dyn ConfigPort));

    let mut reports = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let bars = match data.fetch_bars(symbol, config.history_days) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        };
        match analysis::analyze_symbol(symbol, &bars, config.forecast_days) {
            Ok(report) => reports.push(report),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        }
    }

    if reports.len() == 1 {
        print_json(&reports[0])
    } else {
        print_json(&reports)
    }
}

fn run_portfolio(
    holdings: &[String],
    config_path: Option<&PathBuf>,
    data_dir: Option<PathBuf>,
) -> ExitCode {
    let adapter = match config_path.map(load_config).transpose() {
        Ok(a) => a,
        Err(code) => return code,
    };
    let data = resolve_data_port(data_dir, adapter.as_ref().map(|a| a as &dyn ConfigPort));

    let holdings: Vec<Holding> = holdings.iter().map(|h| parse_holding(h)).collect();
    let report = portfolio::analyze(&holdings, data.as_ref());
    print_json(&report)
}

fn run_info(
    symbol: &str,
    config_path: Option<&PathBuf>,
    data_dir: Option<PathBuf>,
) -> ExitCode {
    let adapter = match config_path.map(load_config).transpose() {
        Ok(a) => a,
        Err(code) => return code,
    };
    let config = build_analysis_config(adapter.as_ref().map(|a| a as &dyn ConfigPort));
    let data = resolve_data_port(data_dir, adapter.as_ref().map(|a| a as &dyn ConfigPort));

    let bars = match data.fetch_bars(symbol, config.history_days) {
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    if bars.is_empty() {
        let err = MarketlensError::NoData {
            symbol: symbol.to_string(),
        };
        eprintln!("error: {err}");
        return ExitCode::from(&err);
    }

    let info = serde_json::json!({
        "symbol": symbol,
        "bars": bars.len(),
        "first_date": bars[0].date,
        "last_date": bars[bars.len() - 1].date,
        "last_close": bars[bars.len() - 1].close,
    });
    print_json(&info)
}
