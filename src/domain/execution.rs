//! Execution step: apply the selected configuration to the latest bar and
//! advance the simulated equity.

use crate::domain::error::GridtraderError;
use crate::domain::ohlcv::Bar;
use crate::domain::signal::{self, Signal};
use crate::domain::strategy::StrategyConfig;
use chrono::NaiveDateTime;

/// Starting equity when the log is empty. Callers may override it, but the
/// baseline is always declared, never derived.
pub const DEFAULT_EQUITY_BASELINE: f64 = 100_000.0;

/// One appended row of the equity log.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityRecord {
    pub timestamp: NaiveDateTime,
    pub price: f64,
    /// Position held over the return interval ending at `timestamp`,
    /// decided one bar earlier.
    pub position: Signal,
    pub equity: f64,
}

/// What one execution pass produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    /// Unlagged signal of the most recent bar: the action to take next.
    pub live_signal: Signal,
    pub record: EquityRecord,
}

/// The equity recurrence: compound the prior equity by the realized return
/// times the position held over it.
pub fn compound(prev_equity: f64, bar_return: f64, position: Signal) -> f64 {
    prev_equity * (1.0 + bar_return * position.as_f64())
}

/// Re-evaluate `config` over the full bar series, compound equity over the
/// final return interval, and report the live signal.
///
/// Never rewrites history: each call derives exactly one record from the
/// prior equity value.
pub fn execution_step(
    bars: &[Bar],
    config: &StrategyConfig,
    prev_equity: Option<f64>,
    baseline: f64,
) -> Result<ExecutionOutcome, GridtraderError> {
    let last = bars.last().ok_or(GridtraderError::InsufficientData {
        bars: 0,
        minimum: 1,
    })?;

    let raw = config.kind.signals(bars, config.p1, config.p2);
    let positions = signal::lag_one(&raw);
    let held = positions.last().copied().unwrap_or(Signal::Flat);

    let last_return = if bars.len() > 1 {
        let prev_close = bars[bars.len() - 2].close;
        (last.close - prev_close) / prev_close
    } else {
        0.0
    };

    let equity = compound(prev_equity.unwrap_or(baseline), last_return, held);

    Ok(ExecutionOutcome {
        live_signal: raw.last().copied().unwrap_or(Signal::Flat),
        record: EquityRecord {
            timestamp: last.timestamp,
            price: last.close,
            position: held,
            equity,
        },
    })
}
