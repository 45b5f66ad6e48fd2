//! tickback — deterministic tick-series strategy backtester.
//!
//! Hexagonal architecture: the pipeline lives in [`domain`], port traits in
//! [`ports`], concrete I/O implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
