//! Position signals and return-series derivation.
//!
//! A strategy emits a *raw* signal per bar, computed from data up to and
//! including that bar. The *realized* position series is the raw signal
//! shifted by exactly one bar, so the position held into bar `t` was decided
//! with information through `t - 1`.

use crate::domain::ohlcv::Bar;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-bar trading stance: short, flat, or long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Short,
    Flat,
    Long,
}

impl Signal {
    pub fn as_f64(self) -> f64 {
        f64::from(self.as_i8())
    }

    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Short => -1,
            Signal::Flat => 0,
            Signal::Long => 1,
        }
    }

    pub fn from_value(value: i64) -> Option<Signal> {
        match value {
            -1 => Some(Signal::Short),
            0 => Some(Signal::Flat),
            1 => Some(Signal::Long),
            _ => None,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Short => write!(f, "short"),
            Signal::Flat => write!(f, "flat"),
            Signal::Long => write!(f, "long"),
        }
    }
}

/// Realized position series: the raw signal shifted by one bar, flat at the
/// first bar.
pub fn lag_one(raw: &[Signal]) -> Vec<Signal> {
    if raw.is_empty() {
        return Vec::new();
    }
    let mut positions = Vec::with_capacity(raw.len());
    positions.push(Signal::Flat);
    positions.extend_from_slice(&raw[..raw.len() - 1]);
    positions
}

/// Simple close-to-close returns; entry `i` is the return ending at bar
/// `i + 1`, so the result is one shorter than the input.
pub fn close_returns(bars: &[Bar]) -> Vec<f64> {
    bars.windows(2)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect()
}

/// Per-bar strategy returns: the return ending at `t` times the position
/// held into `t`. Aligned with [`close_returns`].
pub fn strategy_returns(bars: &[Bar], positions: &[Signal]) -> Vec<f64> {
    close_returns(bars)
        .iter()
        .enumerate()
        .map(|(i, r)| r * positions[i + 1].as_f64())
        .collect()
}
