//! End-to-end cycle tests through the real file adapters.

mod common;

use common::*;
use gridtrader::adapters::csv_bar_adapter::CsvBarAdapter;
use gridtrader::adapters::csv_equity_log::CsvEquityLog;
use gridtrader::adapters::json_slot_adapter::JsonSlotAdapter;
use gridtrader::cli::{run_cycle, run_execute};
use gridtrader::domain::error::GridtraderError;
use gridtrader::ports::equity_log_port::EquityLogPort;
use gridtrader::ports::slot_port::StrategySlotPort;
use std::fs;
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    settings: gridtrader::domain::settings::Settings,
    bars_port: CsvBarAdapter,
    slot_port: JsonSlotAdapter,
    equity_log: CsvEquityLog,
}

impl Harness {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        let bars_port = CsvBarAdapter::new(settings.bars_path.clone());
        let slot_port = JsonSlotAdapter::new(settings.slot_path.clone());
        let equity_log = CsvEquityLog::new(settings.equity_log_path.clone());
        Self {
            _dir: dir,
            settings,
            bars_port,
            slot_port,
            equity_log,
        }
    }

    fn cycle(&self) -> Result<gridtrader::cli::CycleReport, GridtraderError> {
        run_cycle(
            &self.bars_port,
            &self.slot_port,
            &self.equity_log,
            &self.settings,
        )
    }

    fn execute(&self) -> Result<gridtrader::cli::CycleReport, GridtraderError> {
        run_execute(
            &self.bars_port,
            &self.slot_port,
            &self.equity_log,
            &self.settings,
        )
    }
}

mod full_cycle {
    use super::*;

    #[test]
    fn cycle_publishes_slot_and_appends_equity() {
        let harness = Harness::new();
        write_bars_csv(&harness.settings.bars_path, &oscillating_bars(200));

        let report = harness.cycle().unwrap();
        assert_eq!(report.bars, 200);

        let slot = harness.slot_port.read_latest().unwrap().unwrap();
        assert_eq!(slot, report.config);

        let last = harness.equity_log.read_last().unwrap().unwrap();
        assert_eq!(last.equity, report.equity);
    }

    #[test]
    fn winning_config_is_deterministic_across_fresh_runs() {
        let bars = oscillating_bars(200);

        let first = {
            let harness = Harness::new();
            write_bars_csv(&harness.settings.bars_path, &bars);
            harness.cycle().unwrap()
        };
        let second = {
            let harness = Harness::new();
            write_bars_csv(&harness.settings.bars_path, &bars);
            harness.cycle().unwrap()
        };

        assert_eq!(first.config, second.config);
        assert_eq!(first.live_signal, second.live_signal);
        assert_eq!(first.equity, second.equity);
    }

    #[test]
    fn repeated_cycles_on_unchanged_bars_never_rewrite_history() {
        let harness = Harness::new();
        write_bars_csv(&harness.settings.bars_path, &oscillating_bars(200));

        let first = harness.cycle().unwrap();
        let second = harness.cycle().unwrap();

        // Same tape, same winner; the log grows by one row per cycle.
        assert_eq!(second.config, first.config);
        let content = fs::read_to_string(&harness.settings.equity_log_path).unwrap();
        assert_eq!(content.lines().count(), 3);

        let rows: Vec<&str> = content.lines().skip(1).collect();
        let first_fields: Vec<&str> = rows[0].split(',').collect();
        let second_fields: Vec<&str> = rows[1].split(',').collect();
        assert_eq!(first_fields[0], second_fields[0]);
        assert_eq!(first_fields[1], second_fields[1]);
        assert_eq!(first_fields[2], second_fields[2]);
    }

    #[test]
    fn second_cycle_compounds_from_logged_equity() {
        let harness = Harness::new();
        write_bars_csv(&harness.settings.bars_path, &oscillating_bars(200));

        let first = harness.cycle().unwrap();
        let second = harness.cycle().unwrap();

        // The final bar's return and held position repeat exactly, so the
        // second equity is the first compounded by the same factor.
        let factor = first.equity / harness.settings.equity_baseline;
        assert!((second.equity - first.equity * factor).abs() < 1e-6 * first.equity);
    }

    #[test]
    fn equity_log_header_appears_once() {
        let harness = Harness::new();
        write_bars_csv(&harness.settings.bars_path, &oscillating_bars(200));

        harness.cycle().unwrap();
        harness.cycle().unwrap();
        harness.cycle().unwrap();

        let content = fs::read_to_string(&harness.settings.equity_log_path).unwrap();
        let headers = content
            .lines()
            .filter(|l| *l == "timestamp,price,position,equity")
            .count();
        assert_eq!(headers, 1);
    }

    #[test]
    fn new_bars_overwrite_the_slot() {
        let harness = Harness::new();
        write_bars_csv(&harness.settings.bars_path, &oscillating_bars(200));
        harness.cycle().unwrap();
        assert!(harness.slot_port.read_latest().unwrap().is_some());

        // Extend the tape; whatever wins now replaces the slot wholesale.
        write_bars_csv(&harness.settings.bars_path, &oscillating_bars(230));
        let report = harness.cycle().unwrap();
        let second_slot = harness.slot_port.read_latest().unwrap().unwrap();
        assert_eq!(second_slot, report.config);
    }
}

mod execute_pass {
    use super::*;
    use gridtrader::domain::scoring::ScoreOutcome;
    use gridtrader::domain::strategy::{StrategyConfig, StrategyKind};

    #[test]
    fn execute_applies_published_config_without_reoptimizing() {
        let harness = Harness::new();
        write_bars_csv(&harness.settings.bars_path, &oscillating_bars(200));
        let cycle = harness.cycle().unwrap();

        let exec = harness.execute().unwrap();
        assert_eq!(exec.config, cycle.config);

        // One log row per pass, slot untouched by execution.
        let content = fs::read_to_string(&harness.settings.equity_log_path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert_eq!(
            harness.slot_port.read_latest().unwrap().unwrap(),
            cycle.config
        );
    }

    #[test]
    fn execute_compounds_from_logged_equity() {
        let harness = Harness::new();
        write_bars_csv(&harness.settings.bars_path, &oscillating_bars(200));
        let cycle = harness.cycle().unwrap();

        let exec = harness.execute().unwrap();
        let factor = cycle.equity / harness.settings.equity_baseline;
        assert!((exec.equity - cycle.equity * factor).abs() < 1e-6 * cycle.equity);
    }

    #[test]
    fn execute_reads_a_hand_published_slot() {
        let harness = Harness::new();
        write_bars_csv(&harness.settings.bars_path, &oscillating_bars(200));
        let config = StrategyConfig {
            kind: StrategyKind::Mfi,
            p1: 15,
            p2: 10,
            score: ScoreOutcome::Scored(1.0),
        };
        harness.slot_port.replace(&config).unwrap();

        let exec = harness.execute().unwrap();
        assert_eq!(exec.config, config);
        assert!(harness.settings.equity_log_path.exists());
    }

    #[test]
    fn execute_single_bar_appends_zero_return_record() {
        let harness = Harness::new();
        write_bars_csv(&harness.settings.bars_path, &oscillating_bars(1));
        let config = StrategyConfig {
            kind: StrategyKind::Mfi,
            p1: 15,
            p2: 10,
            score: ScoreOutcome::Scored(1.0),
        };
        harness.slot_port.replace(&config).unwrap();

        let exec = harness.execute().unwrap();
        assert_eq!(exec.equity, harness.settings.equity_baseline);
        let last = harness.equity_log.read_last().unwrap().unwrap();
        assert_eq!(last.equity, harness.settings.equity_baseline);
    }

    #[test]
    fn execute_with_empty_slot_is_an_error() {
        let harness = Harness::new();
        write_bars_csv(&harness.settings.bars_path, &oscillating_bars(200));
        assert!(matches!(
            harness.execute(),
            Err(GridtraderError::StrategySlot { .. })
        ));
        assert!(!harness.settings.equity_log_path.exists());
    }
}

mod failure_modes {
    use super::*;

    #[test]
    fn missing_bar_file_is_a_bar_series_error() {
        let harness = Harness::new();
        assert!(matches!(
            harness.cycle(),
            Err(GridtraderError::BarSeries { .. })
        ));
    }

    #[test]
    fn single_bar_is_insufficient() {
        let harness = Harness::new();
        write_bars_csv(&harness.settings.bars_path, &oscillating_bars(1));
        assert!(matches!(
            harness.cycle(),
            Err(GridtraderError::InsufficientData { bars: 1, minimum: 2 })
        ));
    }

    #[test]
    fn failed_cycle_leaves_no_artifacts() {
        let harness = Harness::new();
        write_bars_csv(&harness.settings.bars_path, &oscillating_bars(1));
        let _ = harness.cycle();

        assert!(!harness.settings.slot_path.exists());
        assert!(!harness.settings.equity_log_path.exists());
    }

    #[test]
    fn recovery_after_failed_cycle() {
        let harness = Harness::new();
        write_bars_csv(&harness.settings.bars_path, &oscillating_bars(1));
        assert!(harness.cycle().is_err());

        write_bars_csv(&harness.settings.bars_path, &oscillating_bars(200));
        assert!(harness.cycle().is_ok());
        assert!(harness.settings.slot_path.exists());
    }
}
