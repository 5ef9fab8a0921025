//! Bar-series access port trait.

use crate::domain::error::GridtraderError;
use crate::domain::ohlcv::Bar;

/// Read-only access to the externally-updated bar series.
pub trait BarSeriesPort {
    /// Current snapshot, sorted ascending by timestamp with duplicate
    /// timestamps resolved last-write-wins. The backing store must make
    /// snapshots atomically visible; a torn or missing resource surfaces
    /// as an error and the cycle is skipped.
    fn read_snapshot(&self) -> Result<Vec<Bar>, GridtraderError>;
}
