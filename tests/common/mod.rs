#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use gridtrader::domain::ohlcv::{Bar, TIMESTAMP_FORMAT};
use gridtrader::domain::scoring::ScoreMetric;
use gridtrader::domain::settings::Settings;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub fn make_bar(minute: i64, close: f64) -> Bar {
    Bar {
        timestamp: NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
            + Duration::minutes(minute),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000.0 + (minute as f64 % 7.0) * 50.0,
    }
}

/// Deterministic triangle-wave closes around 100, period 20 bars.
pub fn oscillating_bars(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let phase = (i % 20) as f64;
            let close = if phase < 10.0 {
                95.0 + phase
            } else {
                105.0 - (phase - 10.0)
            };
            make_bar(i as i64, close)
        })
        .collect()
}

pub fn write_bars_csv(path: &Path, bars: &[Bar]) {
    let mut content = String::from("timestamp,open,high,low,close,volume\n");
    for bar in bars {
        writeln!(
            content,
            "{},{},{},{},{},{}",
            bar.timestamp.format(TIMESTAMP_FORMAT),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume,
        )
        .unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Settings resolving every path inside `dir`.
pub fn settings_in(dir: &TempDir) -> Settings {
    Settings {
        bars_path: dir.path().join("shared_live_data.csv"),
        slot_path: dir.path().join("strategy_config.json"),
        equity_log_path: dir.path().join("equity_curve.csv"),
        window: 180,
        metric: ScoreMetric::ProfitFactor,
        equity_baseline: 100_000.0,
        interval_secs: 1,
    }
}
