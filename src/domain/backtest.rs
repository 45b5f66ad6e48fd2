//! Backtest driver: wires the pipeline stages for one run.

use super::error::TickbackError;
use super::execution::{unfilled_count, ExecutedTrade, ExecutionModel};
use super::portfolio::{PortfolioSimulator, PortfolioState};
use super::series::PriceSeries;
use super::signal::{SignalGenerator, SignalPoint, StrategySpec};

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub strategy: StrategySpec,
    /// Execution delay in observations.
    pub latency: usize,
    pub initial_capital: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub signals: Vec<SignalPoint>,
    pub trades: Vec<ExecutedTrade>,
    pub states: Vec<PortfolioState>,
}

impl BacktestResult {
    pub fn filled_trades(&self) -> usize {
        self.trades.iter().filter(|t| t.is_filled()).count()
    }

    pub fn unfilled_trades(&self) -> usize {
        unfilled_count(&self.trades)
    }
}

/// PriceSeries -> signals -> latency-shifted trades -> portfolio states.
/// Evaluated once, front to back; each stage consumes the previous stage's
/// immutable output. All parameter validation happens up front, before any
/// stage runs.
pub fn run_backtest(
    series: &PriceSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, TickbackError> {
    let generator = SignalGenerator::new(config.strategy.clone())?;
    let simulator = PortfolioSimulator::new(config.initial_capital)?;

    let signals = generator.generate(series)?;
    let trades = ExecutionModel::new(config.latency).apply_latency(&signals, series);
    let states = simulator.simulate(&trades, series);

    Ok(BacktestResult {
        signals,
        trades,
        states,
    })
}
