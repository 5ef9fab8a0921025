//! Strategy families: raw signal generation and candidate evaluation.

use crate::domain::indicator::{mfi, range, rsi};
use crate::domain::ohlcv::Bar;
use crate::domain::scoring::{ScoreMetric, ScoreOutcome};
use crate::domain::signal::{self, Signal};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Band offset in mean-range units for the mean-reversion family.
pub const BAND_WIDTH: f64 = 2.5;

/// Entry threshold on the RSI z-score.
pub const ZSCORE_THRESHOLD: f64 = 1.5;

/// The closed set of strategy families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    Mfi,
    MeanReversion,
    RsiBreakout,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Mfi => write!(f, "MFI"),
            StrategyKind::MeanReversion => write!(f, "MeanReversion"),
            StrategyKind::RsiBreakout => write!(f, "RSIBreakout"),
        }
    }
}

impl StrategyKind {
    /// Raw signal series for this family. Entry `t` uses data through bar
    /// `t` only; undefined (warmup) indicator values read as flat.
    pub fn signals(&self, bars: &[Bar], p1: u32, p2: u32) -> Vec<Signal> {
        match self {
            StrategyKind::Mfi => mfi_signals(bars, p1, p2),
            StrategyKind::MeanReversion => mean_reversion_signals(bars, p1, p2),
            StrategyKind::RsiBreakout => rsi_breakout_signals(bars, p1, p2),
        }
    }
}

/// The configuration the optimizer persists and the execution step consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub kind: StrategyKind,
    pub p1: u32,
    pub p2: u32,
    pub score: ScoreOutcome,
}

/// Result of evaluating one (family, p1, p2) candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub score: ScoreOutcome,
    /// Unlagged signal of the most recent bar: the action to take next.
    pub live_signal: Signal,
}

/// Score a candidate over `bars` under `metric`.
///
/// The scored return series pairs each close-to-close return with the
/// position held into that bar (decided one bar earlier), so no candidate
/// is ranked on lookahead.
pub fn evaluate(
    kind: StrategyKind,
    bars: &[Bar],
    p1: u32,
    p2: u32,
    metric: ScoreMetric,
) -> Evaluation {
    let raw = kind.signals(bars, p1, p2);
    let positions = signal::lag_one(&raw);
    let returns = signal::strategy_returns(bars, &positions);
    Evaluation {
        score: metric.score(&returns, &positions),
        live_signal: raw.last().copied().unwrap_or(Signal::Flat),
    }
}

/// Long below `50 - boundary`, short above `50 + boundary`.
fn mfi_signals(bars: &[Bar], boundary: u32, period: u32) -> Vec<Signal> {
    let index = mfi::calculate_mfi(bars, period as usize);
    let boundary = f64::from(boundary);
    index
        .iter()
        .map(|&value| {
            if !value.is_finite() {
                Signal::Flat
            } else if value < 50.0 - boundary {
                Signal::Long
            } else if value > 50.0 + boundary {
                Signal::Short
            } else {
                Signal::Flat
            }
        })
        .collect()
}

/// Long on a break below the lower band, short on a break above the upper.
///
/// Bands are taken from the previous bar: a window containing the current
/// bar also contains its high/low, and the close could never escape it.
fn mean_reversion_signals(bars: &[Bar], sensitivity: u32, period: u32) -> Vec<Signal> {
    let upper = range::rolling_high_max(bars, sensitivity as usize);
    let lower = range::rolling_low_min(bars, sensitivity as usize);
    let atr = range::mean_range(bars, period as usize);

    (0..bars.len())
        .map(|t| {
            if t == 0 {
                return Signal::Flat;
            }
            let (hi, lo, width) = (upper[t - 1], lower[t - 1], atr[t - 1]);
            if !hi.is_finite() || !lo.is_finite() || !width.is_finite() {
                return Signal::Flat;
            }
            let close = bars[t].close;
            if close < lo - BAND_WIDTH * width {
                Signal::Long
            } else if close > hi + BAND_WIDTH * width {
                Signal::Short
            } else {
                Signal::Flat
            }
        })
        .collect()
}

/// Long when the RSI z-score breaks above the threshold, short below.
fn rsi_breakout_signals(bars: &[Bar], rsi_period: u32, norm_window: u32) -> Vec<Signal> {
    let index = rsi::calculate_rsi(bars, rsi_period as usize);
    let z = rsi::rolling_zscore(&index, norm_window as usize);
    z.iter()
        .map(|&value| {
            if !value.is_finite() {
                Signal::Flat
            } else if value > ZSCORE_THRESHOLD {
                Signal::Long
            } else if value < -ZSCORE_THRESHOLD {
                Signal::Short
            } else {
                Signal::Flat
            }
        })
        .collect()
}
