//! Append-only CSV equity log adapter.
//!
//! The header row is written exactly once, when the file is first created.
//! Every later append adds a single data row and never rewrites history.

use crate::domain::error::GridtraderError;
use crate::domain::execution::EquityRecord;
use crate::domain::ohlcv::TIMESTAMP_FORMAT;
use crate::domain::signal::Signal;
use crate::ports::equity_log_port::EquityLogPort;
use chrono::NaiveDateTime;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

const HEADER: &str = "timestamp,price,position,equity";

pub struct CsvEquityLog {
    path: PathBuf,
}

impl CsvEquityLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

fn log_error(reason: String) -> GridtraderError {
    GridtraderError::EquityLog { reason }
}

impl EquityLogPort for CsvEquityLog {
    fn append(&self, record: &EquityRecord) -> Result<(), GridtraderError> {
        let new_file = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                log_error(format!("failed to open {}: {}", self.path.display(), e))
            })?;

        if new_file {
            writeln!(file, "{HEADER}")
                .map_err(|e| log_error(format!("failed to write header: {}", e)))?;
        }

        writeln!(
            file,
            "{},{},{},{}",
            record.timestamp.format(TIMESTAMP_FORMAT),
            record.price,
            record.position.as_i8(),
            record.equity,
        )
        .map_err(|e| log_error(format!("failed to append record: {}", e)))
    }

    fn read_last(&self) -> Result<Option<EquityRecord>, GridtraderError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(log_error(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let last_line = match content
            .lines()
            .filter(|l| !l.trim().is_empty() && *l != HEADER)
            .next_back()
        {
            Some(line) => line,
            None => return Ok(None),
        };

        parse_record(last_line).map(Some)
    }
}

fn parse_record(line: &str) -> Result<EquityRecord, GridtraderError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 4 {
        return Err(log_error(format!(
            "expected 4 fields, got {} in '{}'",
            fields.len(),
            line
        )));
    }

    let timestamp = NaiveDateTime::parse_from_str(fields[0], TIMESTAMP_FORMAT)
        .map_err(|e| log_error(format!("invalid timestamp '{}': {}", fields[0], e)))?;
    let price: f64 = fields[1]
        .parse()
        .map_err(|e| log_error(format!("invalid price '{}': {}", fields[1], e)))?;
    let raw_position: i64 = fields[2]
        .parse()
        .map_err(|e| log_error(format!("invalid position '{}': {}", fields[2], e)))?;
    let position = Signal::from_value(raw_position)
        .ok_or_else(|| log_error(format!("position out of range: {}", raw_position)))?;
    let equity: f64 = fields[3]
        .parse()
        .map_err(|e| log_error(format!("invalid equity '{}': {}", fields[3], e)))?;

    Ok(EquityRecord {
        timestamp,
        price,
        position,
        equity,
    })
}
