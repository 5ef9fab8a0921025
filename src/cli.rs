//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use crate::adapters::csv_bar_adapter::CsvBarAdapter;
use crate::adapters::csv_equity_log::CsvEquityLog;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_slot_adapter::JsonSlotAdapter;
use crate::domain::error::GridtraderError;
use crate::domain::execution::execution_step;
use crate::domain::ohlcv::TIMESTAMP_FORMAT;
use crate::domain::optimizer::{default_grids, optimize, trailing_window};
use crate::domain::settings::Settings;
use crate::domain::signal::Signal;
use crate::domain::strategy::StrategyConfig;
use crate::ports::bar_port::BarSeriesPort;
use crate::ports::equity_log_port::EquityLogPort;
use crate::ports::slot_port::StrategySlotPort;

#[derive(Parser, Debug)]
#[command(name = "gridtrader", about = "Grid-search trading strategy daemon")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a single optimize-execute cycle
    Cycle {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Apply the published configuration once, without re-optimizing
    Execute {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Run cycles continuously on the configured interval
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Stop after this many cycles (runs forever when omitted)
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Check a config file and echo the resolved settings
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show a summary of the configured bar series
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Cycle { config } => run_once(&config, run_cycle),
        Command::Execute { config } => run_once(&config, run_execute),
        Command::Run { config, ticks } => run_loop(&config, ticks),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config } => run_info(&config),
    }
}

/// What one completed cycle reports back to the caller.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub bars: usize,
    pub config: StrategyConfig,
    pub live_signal: Signal,
    pub equity: f64,
}

/// One full pass: snapshot the bars, re-optimize over the trailing window,
/// publish the winner, and append the next equity record.
pub fn run_cycle(
    bars_port: &dyn BarSeriesPort,
    slot_port: &dyn StrategySlotPort,
    equity_log: &dyn EquityLogPort,
    settings: &Settings,
) -> Result<CycleReport, GridtraderError> {
    let bars = bars_port.read_snapshot()?;
    if bars.len() < 2 {
        return Err(GridtraderError::InsufficientData {
            bars: bars.len(),
            minimum: 2,
        });
    }

    let window = trailing_window(&bars, settings.window);
    let config =
        optimize(window, &default_grids(), settings.metric).ok_or(GridtraderError::NoCandidates)?;
    slot_port.replace(&config)?;

    let prev_equity = equity_log.read_last()?.map(|r| r.equity);
    let outcome = execution_step(&bars, &config, prev_equity, settings.equity_baseline)?;
    equity_log.append(&outcome.record)?;

    Ok(CycleReport {
        bars: bars.len(),
        config,
        live_signal: outcome.live_signal,
        equity: outcome.record.equity,
    })
}

/// One execution pass: apply whatever configuration the optimizer last
/// published, append the next equity record, and report the live signal.
/// Never re-optimizes; an empty slot abandons the pass.
pub fn run_execute(
    bars_port: &dyn BarSeriesPort,
    slot_port: &dyn StrategySlotPort,
    equity_log: &dyn EquityLogPort,
    settings: &Settings,
) -> Result<CycleReport, GridtraderError> {
    let config = slot_port
        .read_latest()?
        .ok_or_else(|| GridtraderError::StrategySlot {
            reason: "no configuration published yet".into(),
        })?;

    let bars = bars_port.read_snapshot()?;
    let prev_equity = equity_log.read_last()?.map(|r| r.equity);
    let outcome = execution_step(&bars, &config, prev_equity, settings.equity_baseline)?;
    equity_log.append(&outcome.record)?;

    Ok(CycleReport {
        bars: bars.len(),
        config,
        live_signal: outcome.live_signal,
        equity: outcome.record.equity,
    })
}

type CyclePass = fn(
    &dyn BarSeriesPort,
    &dyn StrategySlotPort,
    &dyn EquityLogPort,
    &Settings,
) -> Result<CycleReport, GridtraderError>;

pub fn load_settings(path: &PathBuf) -> Result<Settings, ExitCode> {
    let adapter = FileConfigAdapter::from_file(path).map_err(|e| {
        let err = GridtraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })?;
    Settings::from_config(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn run_once(config_path: &PathBuf, pass: CyclePass) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let bars_port = CsvBarAdapter::new(settings.bars_path.clone());
    let slot_port = JsonSlotAdapter::new(settings.slot_path.clone());
    let equity_log = CsvEquityLog::new(settings.equity_log_path.clone());

    match pass(&bars_port, &slot_port, &equity_log, &settings) {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_loop(config_path: &PathBuf, ticks: Option<u64>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let bars_port = CsvBarAdapter::new(settings.bars_path.clone());
    let slot_port = JsonSlotAdapter::new(settings.slot_path.clone());
    let equity_log = CsvEquityLog::new(settings.equity_log_path.clone());

    eprintln!(
        "Running every {}s{}",
        settings.interval_secs,
        match ticks {
            Some(n) => format!(" for {n} cycles"),
            None => String::new(),
        }
    );

    let mut completed: u64 = 0;
    loop {
        // A failed cycle is logged and skipped; the loop never terminates
        // on a cycle error.
        match run_cycle(&bars_port, &slot_port, &equity_log, &settings) {
            Ok(report) => print_report(&report),
            Err(e) => eprintln!("cycle skipped: {e}"),
        }

        completed += 1;
        if let Some(limit) = ticks {
            if completed >= limit {
                break;
            }
        }
        thread::sleep(Duration::from_secs(settings.interval_secs));
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    println!("config ok");
    println!("  bars_path:       {}", settings.bars_path.display());
    println!("  slot_path:       {}", settings.slot_path.display());
    println!("  equity_log_path: {}", settings.equity_log_path.display());
    println!("  window:          {}", settings.window);
    println!("  metric:          {:?}", settings.metric);
    println!("  equity_baseline: {}", settings.equity_baseline);
    println!("  interval_secs:   {}", settings.interval_secs);
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let bars_port = CsvBarAdapter::new(settings.bars_path.clone());
    let bars = match bars_port.read_snapshot() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("bars: {}", bars.len());
    if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
        println!(
            "range: {} .. {}",
            first.timestamp.format(TIMESTAMP_FORMAT),
            last.timestamp.format(TIMESTAMP_FORMAT)
        );
        println!("last close: {}", last.close);
    }
    ExitCode::SUCCESS
}

fn print_report(report: &CycleReport) {
    eprintln!(
        "cycle: {} bars, selected {} ({}, {}) score {}, signal {}, equity {:.2}",
        report.bars,
        report.config.kind,
        report.config.p1,
        report.config.p2,
        report.config.score,
        report.live_signal,
        report.equity,
    );
}
