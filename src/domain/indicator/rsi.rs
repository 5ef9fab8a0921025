//! RSI via exponentially-weighted gain/loss averaging, and its rolling
//! z-score.
//!
//! Smoothing factor is `1 / period`. The loss denominator is epsilon-guarded
//! (all-gain series read as RSI near 100). The z-score normalizes RSI
//! against its own rolling mean and sample standard deviation; a zero
//! deviation is epsilon-guarded the same way.

use crate::domain::indicator::{ewm_mean, rolling_mean, rolling_std, EPSILON};
use crate::domain::ohlcv::Bar;

pub fn calculate_rsi(bars: &[Bar], period: usize) -> Vec<f64> {
    let n = bars.len();
    if period == 0 {
        return vec![f64::NAN; n];
    }

    let mut gains = vec![f64::NAN; n];
    let mut losses = vec![f64::NAN; n];
    for i in 1..n {
        let delta = bars[i].close - bars[i - 1].close;
        gains[i] = delta.max(0.0);
        losses[i] = (-delta).max(0.0);
    }

    let alpha = 1.0 / period as f64;
    let avg_gain = ewm_mean(&gains, alpha);
    let avg_loss = ewm_mean(&losses, alpha);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&gain, &loss)| {
            if !gain.is_finite() || !loss.is_finite() {
                return f64::NAN;
            }
            let denominator = if loss == 0.0 { EPSILON } else { loss };
            100.0 - 100.0 / (1.0 + gain / denominator)
        })
        .collect()
}

/// Window-normalized z-score of a series.
pub fn rolling_zscore(values: &[f64], window: usize) -> Vec<f64> {
    let mean = rolling_mean(values, window);
    let std = rolling_std(values, window);
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if !v.is_finite() || !mean[i].is_finite() || !std[i].is_finite() {
                return f64::NAN;
            }
            let denominator = if std[i] == 0.0 { EPSILON } else { std[i] };
            (v - mean[i]) / denominator
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bar(minute: u32, close: f64) -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(9, minute, 0)
                .unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn rsi_first_bar_undefined() {
        let bars: Vec<Bar> = (0..10).map(|i| make_bar(i, 100.0 + i as f64)).collect();
        let rsi = calculate_rsi(&bars, 5);
        assert!(rsi[0].is_nan());
        assert!(rsi[1].is_finite());
    }

    #[test]
    fn rsi_all_gains_near_hundred() {
        let bars: Vec<Bar> = (0..15).map(|i| make_bar(i, 100.0 + i as f64)).collect();
        let rsi = calculate_rsi(&bars, 14);
        assert!(rsi[14] > 99.9, "RSI {} should saturate high", rsi[14]);
    }

    #[test]
    fn rsi_all_losses_near_zero() {
        let bars: Vec<Bar> = (0..15).map(|i| make_bar(i, 100.0 - i as f64)).collect();
        let rsi = calculate_rsi(&bars, 14);
        assert!(rsi[14] < 0.1, "RSI {} should saturate low", rsi[14]);
    }

    #[test]
    fn rsi_in_range() {
        let bars: Vec<Bar> = (0..30)
            .map(|i| make_bar(i, 100.0 + ((i % 7) as f64 - 3.0) * 2.0))
            .collect();
        let rsi = calculate_rsi(&bars, 14);
        for value in rsi.iter().filter(|v| v.is_finite()) {
            assert!((0.0..=100.0).contains(value), "RSI {} out of range", value);
        }
    }

    #[test]
    fn rsi_zero_period() {
        let bars = vec![make_bar(0, 100.0), make_bar(1, 101.0)];
        assert!(calculate_rsi(&bars, 0).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn zscore_centered_series() {
        let values = [1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0];
        let z = rolling_zscore(&values, 3);
        assert!(z[0].is_nan());
        assert!(z[1].is_nan());
        // Window [1,2,3]: mean 2, sample std 1, z of 3 is 1.
        assert!((z[2] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zscore_constant_window_guarded() {
        let values = [2.0, 2.0, 2.0, 2.0];
        let z = rolling_zscore(&values, 3);
        // Zero deviation from a zero-std window: epsilon keeps it finite.
        assert!(z[2].is_finite());
        assert!(z[2].abs() < 1e-6);
    }

    #[test]
    fn zscore_skips_nan_inputs() {
        let values = [f64::NAN, 1.0, 2.0, 3.0];
        let z = rolling_zscore(&values, 2);
        assert!(z[0].is_nan());
        assert!(z[1].is_nan());
        assert!(z[2].is_finite());
    }
}
