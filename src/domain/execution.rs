//! Latency-shifted trade execution.
//!
//! A signal decided at index i executes at the price observed at index
//! i + latency. Latency is an integer offset of observations, not wall-clock
//! time: it models reaction/order-transmission delay without lookahead.

use super::series::PriceSeries;
use super::signal::{Signal, SignalPoint};

/// Outcome of attempting to fill a trade at its execution index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Filled { timestamp: i64, price: f64 },
    /// The execution index falls past the end of the series. The trade is
    /// excluded from simulation rather than filled at the last available
    /// price, which would misstate latency cost.
    Unfilled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutedTrade {
    pub decision_index: usize,
    pub decision_timestamp: i64,
    pub execution_index: usize,
    /// Signal the position moves to once this trade fills.
    pub target: Signal,
    pub fill: Fill,
}

impl ExecutedTrade {
    pub fn is_filled(&self) -> bool {
        matches!(self.fill, Fill::Filled { .. })
    }
}

/// Maps position-change events in a signal series to executed trades.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionModel {
    latency: usize,
}

impl ExecutionModel {
    pub fn new(latency: usize) -> Self {
        ExecutionModel { latency }
    }

    pub fn latency(&self) -> usize {
        self.latency
    }

    /// One trade per index where the signal differs from the previous signal
    /// (Flat before the first index). Purely a function of its inputs; no
    /// randomness, no clock.
    pub fn apply_latency(
        &self,
        signals: &[SignalPoint],
        series: &PriceSeries,
    ) -> Vec<ExecutedTrade> {
        let mut trades = Vec::new();
        let mut previous = Signal::Flat;

        for (i, point) in signals.iter().enumerate() {
            if point.signal != previous {
                let execution_index = i + self.latency;
                let fill = match series.get(execution_index) {
                    Some(obs) => Fill::Filled {
                        timestamp: obs.timestamp,
                        price: obs.price,
                    },
                    None => Fill::Unfilled,
                };
                trades.push(ExecutedTrade {
                    decision_index: i,
                    decision_timestamp: point.timestamp,
                    execution_index,
                    target: point.signal,
                    fill,
                });
            }
            previous = point.signal;
        }

        trades
    }
}

/// Diagnostic count of trades truncated by end-of-series latency.
pub fn unfilled_count(trades: &[ExecutedTrade]) -> usize {
    trades.iter().filter(|t| !t.is_filled()).count()
}
