//! Risk-adjusted scoring of strategy return series.
//!
//! A score is a tagged outcome rather than a bare float: candidates
//! evaluated on too little data, too little trading activity, or degenerate
//! variance can never outrank a legitimately scored candidate.

use crate::domain::signal::Signal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum return observations before either metric produces a score.
pub const MIN_OBSERVATIONS: usize = 20;

/// Minimum position-change magnitude for a profit-factor score.
pub const MIN_CHANGES_PROFIT_FACTOR: i32 = 5;

/// Minimum position-change magnitude for a weighted-Sharpe score.
pub const MIN_CHANGES_SHARPE: i32 = 3;

/// Cap applied when a return series has no losing bars.
pub const PROFIT_FACTOR_CAP: f64 = 10.0;

/// Symmetric clip bound for the weighted Sharpe ratio.
pub const SHARPE_CLIP: f64 = 20.0;

/// 252 sessions of 6.5 hours of one-minute bars.
pub const DEFAULT_BARS_PER_YEAR: f64 = 98_280.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScoreOutcome {
    Scored(f64),
    InsufficientData,
    InsufficientActivity,
    DegenerateVariance,
}

impl ScoreOutcome {
    /// Strict ordering used by the optimizer: only a scored value ever
    /// beats, equal scores never displace the incumbent, and guarded
    /// outcomes rank below every scored value.
    pub fn beats(&self, other: &ScoreOutcome) -> bool {
        match (self, other) {
            (ScoreOutcome::Scored(a), ScoreOutcome::Scored(b)) => a > b,
            (ScoreOutcome::Scored(_), _) => true,
            _ => false,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            ScoreOutcome::Scored(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ScoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreOutcome::Scored(v) => write!(f, "{:.4}", v),
            ScoreOutcome::InsufficientData => write!(f, "insufficient data"),
            ScoreOutcome::InsufficientActivity => write!(f, "insufficient activity"),
            ScoreOutcome::DegenerateVariance => write!(f, "degenerate variance"),
        }
    }
}

/// Which metric the optimizer ranks candidates by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreMetric {
    ProfitFactor,
    WeightedSharpe { bars_per_year: f64 },
}

impl ScoreMetric {
    pub fn score(&self, returns: &[f64], positions: &[Signal]) -> ScoreOutcome {
        match self {
            ScoreMetric::ProfitFactor => profit_factor(returns, positions),
            ScoreMetric::WeightedSharpe { bars_per_year } => {
                weighted_sharpe(returns, positions, *bars_per_year)
            }
        }
    }
}

/// Total flip magnitude of a position series; a long-to-short reversal
/// counts as two.
fn position_changes(positions: &[Signal]) -> i32 {
    positions
        .windows(2)
        .map(|w| i32::from((w[1].as_i8() - w[0].as_i8()).abs()))
        .sum()
}

/// Sum of winning returns over the absolute sum of losing returns.
pub fn profit_factor(returns: &[f64], positions: &[Signal]) -> ScoreOutcome {
    if returns.len() < MIN_OBSERVATIONS {
        return ScoreOutcome::InsufficientData;
    }
    if position_changes(positions) < MIN_CHANGES_PROFIT_FACTOR {
        return ScoreOutcome::InsufficientActivity;
    }

    let gains: f64 = returns.iter().filter(|r| **r > 0.0).sum();
    let losses: f64 = returns.iter().filter(|r| **r < 0.0).sum();

    if losses == 0.0 {
        return ScoreOutcome::Scored(PROFIT_FACTOR_CAP);
    }
    ScoreOutcome::Scored(gains / losses.abs())
}

/// Recency-weighted, annualized mean/deviation ratio, clipped to
/// `[-SHARPE_CLIP, SHARPE_CLIP]`.
///
/// Weights are proportional to `exp` of an even ramp from -1 to 0, so the
/// newest observation carries `e` times the weight of the oldest.
pub fn weighted_sharpe(returns: &[f64], positions: &[Signal], bars_per_year: f64) -> ScoreOutcome {
    let n = returns.len();
    if n < MIN_OBSERVATIONS {
        return ScoreOutcome::InsufficientData;
    }

    let mean = returns.iter().sum::<f64>() / n as f64;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n as f64;
    if variance == 0.0 {
        return ScoreOutcome::DegenerateVariance;
    }

    if position_changes(positions) < MIN_CHANGES_SHARPE {
        return ScoreOutcome::InsufficientActivity;
    }

    let mut weights: Vec<f64> = (0..n)
        .map(|i| (-1.0 + i as f64 / (n - 1) as f64).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }

    let weighted_mean: f64 = returns.iter().zip(&weights).map(|(r, w)| r * w).sum();
    let weighted_var: f64 = returns
        .iter()
        .zip(&weights)
        .map(|(r, w)| w * (r - weighted_mean).powi(2))
        .sum();
    let weighted_std = weighted_var.sqrt();
    if weighted_std == 0.0 {
        return ScoreOutcome::DegenerateVariance;
    }

    let sharpe = (weighted_mean / weighted_std) * bars_per_year.sqrt();
    ScoreOutcome::Scored(sharpe.clamp(-SHARPE_CLIP, SHARPE_CLIP))
}
