//! Core domain types and the backtest pipeline.

pub mod series;
pub mod composite;
pub mod rolling;
pub mod signal;
pub mod execution;
pub mod portfolio;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod error;
