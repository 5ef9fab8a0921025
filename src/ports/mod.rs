//! Port traits implemented by the adapters.

pub mod bar_port;
pub mod config_port;
pub mod equity_log_port;
pub mod slot_port;
