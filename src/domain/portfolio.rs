//! Portfolio simulation: cash, position, and equity per timestamp.
//!
//! Explicit forward-iterating state machine with unit position sizing: one
//! unit long, one unit short, or flat. Scaling by capital or order size is a
//! concern for callers, not the core.

use super::error::TickbackError;
use super::execution::{ExecutedTrade, Fill};
use super::series::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioState {
    pub timestamp: i64,
    pub position: i64,
    pub cash: f64,
    pub holdings_value: f64,
    pub total_equity: f64,
    /// `equity_t / equity_{t-1} - 1`; `None` at the first timestamp only.
    pub period_return: Option<f64>,
}

pub struct PortfolioSimulator {
    initial_capital: f64,
}

impl PortfolioSimulator {
    pub fn new(initial_capital: f64) -> Result<Self, TickbackError> {
        if !initial_capital.is_finite() || initial_capital <= 0.0 {
            return Err(TickbackError::Configuration {
                param: "initial_capital".into(),
                reason: "must be positive".into(),
            });
        }
        Ok(PortfolioSimulator { initial_capital })
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    /// One `PortfolioState` per series index.
    ///
    /// Unfilled trades are skipped entirely. At a filled trade's execution
    /// index the position moves to the trade's target direction and cash is
    /// adjusted by the traded quantity at the execution price; holdings are
    /// marked to market at every index, trade or not. The execution price at
    /// a trade index is by construction the price observed at that index, so
    /// the two valuations agree there.
    pub fn simulate(&self, trades: &[ExecutedTrade], series: &PriceSeries) -> Vec<PortfolioState> {
        let fills: Vec<(usize, i64, f64)> = trades
            .iter()
            .filter_map(|t| match t.fill {
                Fill::Filled { price, .. } => {
                    Some((t.execution_index, t.target.direction(), price))
                }
                Fill::Unfilled => None,
            })
            .collect();

        let mut states = Vec::with_capacity(series.len());
        let mut next_fill = 0;
        let mut position = 0_i64;
        let mut cash = self.initial_capital;
        let mut previous_equity: Option<f64> = None;

        for (i, obs) in series.observations().iter().enumerate() {
            while next_fill < fills.len() && fills[next_fill].0 == i {
                let (_, target, price) = fills[next_fill];
                cash -= (target - position) as f64 * price;
                position = target;
                next_fill += 1;
            }

            let holdings_value = position as f64 * obs.price;
            let total_equity = cash + holdings_value;
            let period_return = previous_equity.map(|prev| total_equity / prev - 1.0);

            states.push(PortfolioState {
                timestamp: obs.timestamp,
                position,
                cash,
                holdings_value,
                total_equity,
                period_return,
            });
            previous_equity = Some(total_equity);
        }

        states
    }
}
