//! Rolling-window and exponentially-weighted helpers shared by the
//! indicator implementations.
//!
//! Warmup convention: the first `window - 1` outputs of a rolling function
//! are NaN, and a window containing any non-finite input yields NaN. Callers
//! resolve NaN indicator values to a flat signal, never to long/short.

pub mod mfi;
pub mod range;
pub mod rsi;

/// Substituted for zero denominators in indicator ratios.
pub const EPSILON: f64 = 1e-9;

fn rolling<F>(values: &[f64], window: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 || window > values.len() {
        return out;
    }
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().all(|v| v.is_finite()) {
            out[i] = f(slice);
        }
    }
    out
}

pub fn rolling_sum(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |s| s.iter().sum())
}

pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |s| s.iter().sum::<f64>() / s.len() as f64)
}

pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |s| s.iter().fold(f64::MIN, |a, &b| a.max(b)))
}

pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |s| s.iter().fold(f64::MAX, |a, &b| a.min(b)))
}

/// Sample standard deviation (denominator `n - 1`); NaN for windows
/// shorter than 2.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    if window < 2 {
        return vec![f64::NAN; values.len()];
    }
    rolling(values, window, |s| {
        let mean = s.iter().sum::<f64>() / s.len() as f64;
        let var = s.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (s.len() - 1) as f64;
        var.sqrt()
    })
}

/// Exponentially-weighted mean with relative weights `(1 - alpha)^k`
/// normalized over the observations seen so far. Leading NaN inputs yield
/// NaN outputs; later NaN inputs decay the weights without contributing.
pub fn ewm_mean(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if !(0.0..=1.0).contains(&alpha) {
        return out;
    }
    let decay = 1.0 - alpha;
    let mut num = 0.0;
    let mut den = 0.0;
    for (i, &v) in values.iter().enumerate() {
        num *= decay;
        den *= decay;
        if v.is_finite() {
            num += v;
            den += 1.0;
        }
        if den > 0.0 {
            out[i] = num / den;
        }
    }
    out
}
