//! CSV bar-snapshot adapter.
//!
//! Reads the shared bar file written by the market-data poller. Headers are
//! matched case-insensitively, rows are sorted ascending by timestamp, and
//! duplicate timestamps resolve last-write-wins.

use crate::domain::error::GridtraderError;
use crate::domain::ohlcv::{Bar, TIMESTAMP_FORMAT};
use crate::ports::bar_port::BarSeriesPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

pub struct CsvBarAdapter {
    path: PathBuf,
}

impl CsvBarAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

fn bar_series_error(reason: String) -> GridtraderError {
    GridtraderError::BarSeries { reason }
}

fn parse_timestamp(text: &str) -> Result<NaiveDateTime, GridtraderError> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .map_err(|e| bar_series_error(format!("invalid timestamp '{}': {}", text, e)))
}

impl BarSeriesPort for CsvBarAdapter {
    fn read_snapshot(&self) -> Result<Vec<Bar>, GridtraderError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            bar_series_error(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let headers = reader
            .headers()
            .map_err(|e| bar_series_error(format!("CSV header error: {}", e)))?
            .clone();

        let column = |name: &str| -> Result<usize, GridtraderError> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| bar_series_error(format!("missing column '{}'", name)))
        };

        let ts_col = column("timestamp").or_else(|_| column("datetime"))?;
        let open_col = column("open")?;
        let high_col = column("high")?;
        let low_col = column("low")?;
        let close_col = column("close")?;
        let volume_col = column("volume")?;

        let field = |record: &csv::StringRecord, col: usize, name: &str| -> Result<f64, GridtraderError> {
            record
                .get(col)
                .ok_or_else(|| bar_series_error(format!("missing {} field", name)))?
                .trim()
                .parse()
                .map_err(|e| bar_series_error(format!("invalid {} value: {}", name, e)))
        };

        let mut bars = Vec::new();
        for result in reader.records() {
            let record =
                result.map_err(|e| bar_series_error(format!("CSV parse error: {}", e)))?;

            let raw_ts = record
                .get(ts_col)
                .ok_or_else(|| bar_series_error("missing timestamp field".into()))?;

            bars.push(Bar {
                timestamp: parse_timestamp(raw_ts)?,
                open: field(&record, open_col, "open")?,
                high: field(&record, high_col, "high")?,
                low: field(&record, low_col, "low")?,
                close: field(&record, close_col, "close")?,
                volume: field(&record, volume_col, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);

        // Last-write-wins on duplicate timestamps; the sort is stable, so
        // the later file row survives.
        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(prev) if prev.timestamp == bar.timestamp => *prev = bar,
                _ => deduped.push(bar),
            }
        }

        Ok(deduped)
    }
}
