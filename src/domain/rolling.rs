//! Rolling mean and standard deviation over a price series.
//!
//! Partial-window policy: before the window fills, the statistic covers
//! however many observations exist (minimum 1). This is the single policy the
//! engine uses; strategies that want full-window behavior gate eligibility on
//! the index instead (see `domain::signal`).
//!
//! Sample standard deviation (divides by count - 1). A one-observation window
//! has no defined standard deviation and yields `None`.

use super::error::TickbackError;
use super::series::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct RollingStat {
    pub timestamp: i64,
    pub mean: f64,
    pub stddev: Option<f64>,
}

/// One `RollingStat` per series index, O(1) amortized per observation via
/// running sum and sum-of-squares.
pub fn compute(series: &PriceSeries, window_size: usize) -> Result<Vec<RollingStat>, TickbackError> {
    if window_size < 1 {
        return Err(TickbackError::Configuration {
            param: "window_size".into(),
            reason: "must be at least 1".into(),
        });
    }

    let observations = series.observations();
    let mut stats = Vec::with_capacity(observations.len());
    let mut sum = 0.0_f64;
    let mut sum_sq = 0.0_f64;

    for (i, obs) in observations.iter().enumerate() {
        sum += obs.price;
        sum_sq += obs.price * obs.price;

        if i >= window_size {
            let old = observations[i - window_size].price;
            sum -= old;
            sum_sq -= old * old;
        }

        let count = (i + 1).min(window_size);
        let n = count as f64;
        let mean = sum / n;

        let stddev = if count > 1 {
            // Float cancellation can leave a tiny negative variance; clamp.
            let variance = (sum_sq - sum * sum / n) / (n - 1.0);
            Some(variance.max(0.0).sqrt())
        } else {
            None
        };

        stats.push(RollingStat {
            timestamp: obs.timestamp,
            mean,
            stddev,
        });
    }

    Ok(stats)
}
