//! Volatility-band building blocks: rolling extremes of high/low and an
//! ATR-like mean bar range.

use crate::domain::indicator::{rolling_max, rolling_mean, rolling_min};
use crate::domain::ohlcv::Bar;

/// Rolling maximum of the high column.
pub fn rolling_high_max(bars: &[Bar], window: usize) -> Vec<f64> {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    rolling_max(&highs, window)
}

/// Rolling minimum of the low column.
pub fn rolling_low_min(bars: &[Bar], window: usize) -> Vec<f64> {
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    rolling_min(&lows, window)
}

/// Rolling mean of (high - low), a volatility proxy.
pub fn mean_range(bars: &[Bar], window: usize) -> Vec<f64> {
    let ranges: Vec<f64> = bars.iter().map(|b| b.high - b.low).collect();
    rolling_mean(&ranges, window)
}
