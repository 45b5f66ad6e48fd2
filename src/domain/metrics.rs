//! Derived performance views over a portfolio state sequence.
//!
//! Everything here is a pure projection over `&[PortfolioState]` and can be
//! recomputed identically from a persisted state sequence alone; no signal or
//! trade data is consulted.

use super::portfolio::PortfolioState;

/// Running maximum of total equity minus current total equity, per timestamp.
pub fn drawdown_series(states: &[PortfolioState]) -> Vec<f64> {
    let mut out = Vec::with_capacity(states.len());
    let mut peak = f64::NEG_INFINITY;
    for state in states {
        peak = peak.max(state.total_equity);
        out.push(peak - state.total_equity);
    }
    out
}

/// Running realized profit from closed (or flipped) positions, per timestamp.
///
/// Trades are reconstructed from position deltas between consecutive states;
/// the trade price falls out of the matching cash delta. Open positions
/// contribute nothing until they close, so a buy-and-hold run stays at zero.
pub fn cumulative_profit(states: &[PortfolioState]) -> Vec<f64> {
    let mut out = Vec::with_capacity(states.len());
    let mut realized = 0.0_f64;
    let mut entry_price = 0.0_f64;

    for (i, state) in states.iter().enumerate() {
        if i > 0 {
            let prev = &states[i - 1];
            let delta = state.position - prev.position;
            if delta != 0 {
                let trade_price = (prev.cash - state.cash) / delta as f64;
                if prev.position != 0 {
                    realized += prev.position as f64 * (trade_price - entry_price);
                }
                if state.position != 0 {
                    entry_price = trade_price;
                }
            }
        }
        out.push(realized);
    }

    out
}

/// Aggregate summary of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub final_equity: f64,
    pub total_return: f64,
    pub max_drawdown: f64,
    pub realized_profit: f64,
}

impl Metrics {
    pub fn compute(states: &[PortfolioState]) -> Self {
        let initial_equity = states.first().map(|s| s.total_equity).unwrap_or(0.0);
        let final_equity = states.last().map(|s| s.total_equity).unwrap_or(0.0);

        let total_return = if initial_equity > 0.0 {
            (final_equity - initial_equity) / initial_equity
        } else {
            0.0
        };

        let max_drawdown = drawdown_series(states)
            .into_iter()
            .fold(0.0_f64, f64::max);

        let realized_profit = cumulative_profit(states).last().copied().unwrap_or(0.0);

        Metrics {
            final_equity,
            total_return,
            max_drawdown,
            realized_profit,
        }
    }
}
