//! Report sink port: the output boundary of the core.

use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TickbackError;

pub trait ReportPort {
    fn write(&self, result: &BacktestResult, output_path: &Path) -> Result<(), TickbackError>;
}
