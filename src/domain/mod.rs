//! Core domain types and logic.

pub mod error;
pub mod execution;
pub mod indicator;
pub mod ohlcv;
pub mod optimizer;
pub mod scoring;
pub mod settings;
pub mod signal;
pub mod strategy;
