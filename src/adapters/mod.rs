//! Concrete port implementations.

pub mod csv_bar_adapter;
pub mod csv_equity_log;
pub mod file_config_adapter;
pub mod json_slot_adapter;
