//! Runtime settings resolved from the configuration port.

use crate::domain::error::GridtraderError;
use crate::domain::execution::DEFAULT_EQUITY_BASELINE;
use crate::domain::optimizer::DEFAULT_TRAILING_WINDOW;
use crate::domain::scoring::{ScoreMetric, DEFAULT_BARS_PER_YEAR};
use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;

pub const DEFAULT_INTERVAL_SECS: u64 = 12;

#[derive(Debug, Clone)]
pub struct Settings {
    pub bars_path: PathBuf,
    pub slot_path: PathBuf,
    pub equity_log_path: PathBuf,
    pub window: usize,
    pub metric: ScoreMetric,
    pub equity_baseline: f64,
    pub interval_secs: u64,
}

impl Settings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, GridtraderError> {
        let bars_path = require_path(config, "data", "bars_path")?;
        let slot_path = require_path(config, "strategy", "slot_path")?;
        let equity_log_path = require_path(config, "equity", "log_path")?;

        let window = config.get_int("optimizer", "window", DEFAULT_TRAILING_WINDOW as i64);
        if window < 2 {
            return Err(GridtraderError::ConfigInvalid {
                section: "optimizer".into(),
                key: "window".into(),
                reason: format!("window must be at least 2, got {window}"),
            });
        }

        let metric = match config.get_string("optimizer", "metric").as_deref() {
            None | Some("profit_factor") => ScoreMetric::ProfitFactor,
            Some("weighted_sharpe") => {
                let bars_per_year =
                    config.get_double("optimizer", "bars_per_year", DEFAULT_BARS_PER_YEAR);
                if bars_per_year <= 0.0 {
                    return Err(GridtraderError::ConfigInvalid {
                        section: "optimizer".into(),
                        key: "bars_per_year".into(),
                        reason: format!("must be positive, got {bars_per_year}"),
                    });
                }
                ScoreMetric::WeightedSharpe { bars_per_year }
            }
            Some(other) => {
                return Err(GridtraderError::ConfigInvalid {
                    section: "optimizer".into(),
                    key: "metric".into(),
                    reason: format!(
                        "unknown metric '{other}' (expected profit_factor or weighted_sharpe)"
                    ),
                });
            }
        };

        let equity_baseline = config.get_double("equity", "baseline", DEFAULT_EQUITY_BASELINE);
        if equity_baseline <= 0.0 {
            return Err(GridtraderError::ConfigInvalid {
                section: "equity".into(),
                key: "baseline".into(),
                reason: format!("must be positive, got {equity_baseline}"),
            });
        }

        let interval_secs =
            config.get_int("scheduler", "interval_secs", DEFAULT_INTERVAL_SECS as i64);
        if interval_secs < 1 {
            return Err(GridtraderError::ConfigInvalid {
                section: "scheduler".into(),
                key: "interval_secs".into(),
                reason: format!("must be at least 1, got {interval_secs}"),
            });
        }

        Ok(Settings {
            bars_path,
            slot_path,
            equity_log_path,
            window: window as usize,
            metric,
            equity_baseline,
            interval_secs: interval_secs as u64,
        })
    }
}

fn require_path(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<PathBuf, GridtraderError> {
    config
        .get_string(section, key)
        .map(PathBuf::from)
        .ok_or_else(|| GridtraderError::ConfigMissing {
            section: section.into(),
            key: key.into(),
        })
}
