//! Money Flow Index: a volume-weighted oscillator bounded [0, 100].
//!
//! Raw money flow is typical price times volume, classified as positive or
//! negative by the sign of the close-to-close change. The index compares
//! rolling sums of the two flows; a zero negative-flow sum is replaced with
//! a small epsilon so the ratio stays defined (the index then saturates
//! near 100).

use crate::domain::indicator::{rolling_sum, EPSILON};
use crate::domain::ohlcv::Bar;

pub fn calculate_mfi(bars: &[Bar], period: usize) -> Vec<f64> {
    let n = bars.len();
    let mut positive_flow = vec![0.0; n];
    let mut negative_flow = vec![0.0; n];

    // The first bar has no close change and contributes to neither flow.
    for i in 1..n {
        let flow = bars[i].typical_price() * bars[i].volume;
        let change = bars[i].close - bars[i - 1].close;
        if change > 0.0 {
            positive_flow[i] = flow;
        } else if change < 0.0 {
            negative_flow[i] = flow;
        }
    }

    let positive_sum = rolling_sum(&positive_flow, period);
    let negative_sum = rolling_sum(&negative_flow, period);

    positive_sum
        .iter()
        .zip(&negative_sum)
        .map(|(&pos, &neg)| {
            if !pos.is_finite() || !neg.is_finite() {
                return f64::NAN;
            }
            let denominator = if neg == 0.0 { EPSILON } else { neg };
            100.0 - 100.0 / (1.0 + pos / denominator)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bar(minute: u32, close: f64, volume: f64) -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(9, minute, 0)
                .unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume,
        }
    }

    #[test]
    fn mfi_warmup_is_nan() {
        let bars: Vec<Bar> = (0..10).map(|i| make_bar(i, 100.0 + i as f64, 1000.0)).collect();
        let mfi = calculate_mfi(&bars, 5);
        for i in 0..4 {
            assert!(mfi[i].is_nan(), "bar {} should be warmup", i);
        }
        for i in 4..10 {
            assert!(mfi[i].is_finite(), "bar {} should be defined", i);
        }
    }

    #[test]
    fn mfi_all_gains_saturates_high() {
        let bars: Vec<Bar> = (0..10).map(|i| make_bar(i, 100.0 + i as f64, 1000.0)).collect();
        let mfi = calculate_mfi(&bars, 5);
        // Zero negative flow: the epsilon guard drives the index toward 100.
        assert!(mfi[9] > 99.9);
    }

    #[test]
    fn mfi_all_losses_is_zero() {
        let bars: Vec<Bar> = (0..10).map(|i| make_bar(i, 100.0 - i as f64, 1000.0)).collect();
        let mfi = calculate_mfi(&bars, 5);
        assert!(mfi[9].abs() < 1e-6);
    }

    #[test]
    fn mfi_bounded() {
        let bars: Vec<Bar> = (0..40)
            .map(|i| make_bar(i, 100.0 + ((i % 7) as f64 - 3.0), 1000.0 + (i % 3) as f64 * 500.0))
            .collect();
        let mfi = calculate_mfi(&bars, 14);
        for value in mfi.iter().filter(|v| v.is_finite()) {
            assert!((0.0..=100.0).contains(value), "MFI {} out of range", value);
        }
    }

    #[test]
    fn mfi_balanced_flows_near_fifty() {
        // Alternating equal-size moves with equal volume.
        let bars: Vec<Bar> = (0..20)
            .map(|i| make_bar(i, if i % 2 == 0 { 100.0 } else { 101.0 }, 1000.0))
            .collect();
        let mfi = calculate_mfi(&bars, 4);
        // Windows of 4 alternating bars hold two up-moves and two down-moves
        // at nearly equal typical prices.
        assert!((mfi[10] - 50.0).abs() < 2.0);
    }

    #[test]
    fn mfi_empty_and_short_input() {
        assert!(calculate_mfi(&[], 5).is_empty());
        let bars = vec![make_bar(0, 100.0, 1000.0)];
        let mfi = calculate_mfi(&bars, 5);
        assert_eq!(mfi.len(), 1);
        assert!(mfi[0].is_nan());
    }
}
