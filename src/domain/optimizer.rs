//! Exhaustive grid search across the strategy families.
//!
//! Enumeration order is fixed — family-major, then p1 ascending, then p2
//! ascending — and a candidate replaces the incumbent only on a strictly
//! better score, so ties keep the earlier pair and repeated runs over the
//! same bars reproduce the same winner.

use crate::domain::ohlcv::Bar;
use crate::domain::scoring::ScoreMetric;
use crate::domain::strategy::{evaluate, StrategyConfig, StrategyKind};
use std::ops::Range;

/// Bars considered per optimization cycle.
pub const DEFAULT_TRAILING_WINDOW: usize = 180;

/// Family-specific (p1, p2) search grid.
#[derive(Debug, Clone)]
pub struct ParamGrid {
    pub kind: StrategyKind,
    pub p1: Range<u32>,
    pub p2: Range<u32>,
}

/// The default grids, in enumeration order.
pub fn default_grids() -> Vec<ParamGrid> {
    vec![
        ParamGrid {
            kind: StrategyKind::Mfi,
            p1: 10..35,
            p2: 5..40,
        },
        ParamGrid {
            kind: StrategyKind::MeanReversion,
            p1: 5..45,
            p2: 5..60,
        },
        ParamGrid {
            kind: StrategyKind::RsiBreakout,
            p1: 5..45,
            p2: 5..60,
        },
    ]
}

/// The most recent `window` bars (all of them when fewer exist).
pub fn trailing_window(bars: &[Bar], window: usize) -> &[Bar] {
    &bars[bars.len().saturating_sub(window)..]
}

/// Score every candidate and keep the strict best.
///
/// The first candidate seeds the selection, so a grid where nothing scores
/// still yields a deterministic configuration. `None` only for empty grids.
pub fn optimize(bars: &[Bar], grids: &[ParamGrid], metric: ScoreMetric) -> Option<StrategyConfig> {
    let mut best: Option<StrategyConfig> = None;
    for grid in grids {
        for p1 in grid.p1.clone() {
            for p2 in grid.p2.clone() {
                let candidate = evaluate(grid.kind, bars, p1, p2, metric);
                let replaces = match &best {
                    None => true,
                    Some(incumbent) => candidate.score.beats(&incumbent.score),
                };
                if replaces {
                    best = Some(StrategyConfig {
                        kind: grid.kind,
                        p1,
                        p2,
                        score: candidate.score,
                    });
                }
            }
        }
    }
    best
}
