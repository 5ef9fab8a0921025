//! Equity-log port trait.

use crate::domain::error::GridtraderError;
use crate::domain::execution::EquityRecord;

/// Durable append-only sequence of equity records.
pub trait EquityLogPort {
    /// Append one record; the log is never rewritten.
    fn append(&self, record: &EquityRecord) -> Result<(), GridtraderError>;

    /// The most recent record, if the log exists and is non-empty. Used to
    /// recover the running equity across restarts.
    fn read_last(&self) -> Result<Option<EquityRecord>, GridtraderError>;
}
