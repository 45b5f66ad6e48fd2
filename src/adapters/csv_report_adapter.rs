//! CSV report adapter.
//!
//! Writes the per-observation portfolio state sequence, one row per
//! timestamp, together with the derived drawdown and cumulative realized
//! profit columns. `period_return` is blank on the first row, where no
//! prior equity exists.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TickbackError;
use crate::domain::metrics::{cumulative_profit, drawdown_series};
use crate::ports::report_port::ReportPort;
use std::path::Path;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &BacktestResult, output_path: &Path) -> Result<(), TickbackError> {
        let drawdowns = drawdown_series(&result.states);
        let profits = cumulative_profit(&result.states);

        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| TickbackError::Data {
            reason: format!("failed to open {}: {}", output_path.display(), e),
        })?;
        wtr.write_record([
            "timestamp",
            "position",
            "cash",
            "holdings_value",
            "total_equity",
            "period_return",
            "drawdown",
            "cumulative_profit",
        ])
        .map_err(|e| TickbackError::Data {
            reason: format!("CSV write error: {}", e),
        })?;

        for (i, state) in result.states.iter().enumerate() {
            let period_return = state
                .period_return
                .map(|r| r.to_string())
                .unwrap_or_default();
            wtr.write_record([
                state.timestamp.to_string(),
                state.position.to_string(),
                state.cash.to_string(),
                state.holdings_value.to_string(),
                state.total_equity.to_string(),
                period_return,
                drawdowns[i].to_string(),
                profits[i].to_string(),
            ])
            .map_err(|e| TickbackError::Data {
                reason: format!("CSV write error: {}", e),
            })?;
        }

        wtr.flush()?;
        Ok(())
    }
}
