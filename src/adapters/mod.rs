//! Concrete adapters behind the port traits.

pub mod csv_report_adapter;
pub mod file_config_adapter;
pub mod trade_tape_adapter;
