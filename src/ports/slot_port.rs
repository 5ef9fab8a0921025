//! Strategy-configuration slot port trait.

use crate::domain::error::GridtraderError;
use crate::domain::strategy::StrategyConfig;

/// A durable single-record slot, overwritten wholesale each cycle.
pub trait StrategySlotPort {
    /// The most recently stored configuration, if any.
    fn read_latest(&self) -> Result<Option<StrategyConfig>, GridtraderError>;

    /// Atomically replace the slot contents; readers never observe a
    /// partially written configuration.
    fn replace(&self, config: &StrategyConfig) -> Result<(), GridtraderError>;
}
