//! Timestamped price series, immutable once built.

use super::error::TickbackError;

/// A single timestamped price observation. Timestamps are integer ordinals in
/// whatever unit the data source uses (epoch milliseconds for trade tapes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub timestamp: i64,
    pub price: f64,
}

/// An ordered, validated sequence of observations.
///
/// Construction enforces the core's preconditions: non-empty, strictly
/// increasing timestamps, strictly positive finite prices. Adapters are
/// responsible for cleaning their input (sorting, collapsing equal-timestamp
/// ties) before handoff; the series itself never repairs anything.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    observations: Vec<Observation>,
}

impl PriceSeries {
    pub fn new(observations: Vec<Observation>) -> Result<Self, TickbackError> {
        if observations.is_empty() {
            return Err(TickbackError::InvalidInput {
                reason: "empty series".into(),
            });
        }

        for (i, obs) in observations.iter().enumerate() {
            if !obs.price.is_finite() || obs.price <= 0.0 {
                return Err(TickbackError::InvalidInput {
                    reason: format!("non-positive price {} at index {}", obs.price, i),
                });
            }
            if i > 0 && obs.timestamp <= observations[i - 1].timestamp {
                return Err(TickbackError::InvalidInput {
                    reason: format!(
                        "non-increasing timestamp {} at index {} (previous {})",
                        obs.timestamp,
                        i,
                        observations[i - 1].timestamp
                    ),
                });
            }
        }

        Ok(PriceSeries { observations })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Observation> {
        self.observations.get(index)
    }

    pub fn price_at(&self, index: usize) -> Option<f64> {
        self.observations.get(index).map(|o| o.price)
    }

    pub fn timestamp_at(&self, index: usize) -> Option<i64> {
        self.observations.get(index).map(|o| o.timestamp)
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Trailing window of up to `size` observations ending at `end` inclusive.
    /// Shorter than `size` near the start of the series.
    pub fn window(&self, end: usize, size: usize) -> &[Observation] {
        let end = end.min(self.observations.len().saturating_sub(1));
        let start = (end + 1).saturating_sub(size);
        &self.observations[start..=end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_observations(prices: &[f64]) -> Vec<Observation> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| Observation {
                timestamp: i as i64,
                price,
            })
            .collect()
    }

    #[test]
    fn valid_series_constructs() {
        let series = PriceSeries::new(make_observations(&[10.0, 11.0, 12.0])).unwrap();
        assert_eq!(series.len(), 3);
        assert!(!series.is_empty());
    }

    #[test]
    fn empty_series_fails() {
        let err = PriceSeries::new(vec![]).unwrap_err();
        assert!(matches!(err, TickbackError::InvalidInput { .. }));
    }

    #[test]
    fn non_increasing_timestamps_fail() {
        let observations = vec![
            Observation {
                timestamp: 5,
                price: 10.0,
            },
            Observation {
                timestamp: 5,
                price: 11.0,
            },
        ];
        let err = PriceSeries::new(observations).unwrap_err();
        assert!(
            matches!(err, TickbackError::InvalidInput { reason } if reason.contains("timestamp"))
        );
    }

    #[test]
    fn decreasing_timestamps_fail() {
        let observations = vec![
            Observation {
                timestamp: 10,
                price: 10.0,
            },
            Observation {
                timestamp: 4,
                price: 11.0,
            },
        ];
        assert!(PriceSeries::new(observations).is_err());
    }

    #[test]
    fn zero_price_fails() {
        let err = PriceSeries::new(make_observations(&[10.0, 0.0])).unwrap_err();
        assert!(matches!(err, TickbackError::InvalidInput { reason } if reason.contains("price")));
    }

    #[test]
    fn negative_price_fails() {
        assert!(PriceSeries::new(make_observations(&[10.0, -1.0])).is_err());
    }

    #[test]
    fn nan_price_fails() {
        assert!(PriceSeries::new(make_observations(&[10.0, f64::NAN])).is_err());
    }

    #[test]
    fn indexed_access() {
        let series = PriceSeries::new(make_observations(&[10.0, 11.0, 12.0])).unwrap();
        assert_eq!(series.price_at(1), Some(11.0));
        assert_eq!(series.timestamp_at(2), Some(2));
        assert_eq!(series.price_at(3), None);
        assert_eq!(series.get(0).unwrap().price, 10.0);
    }

    #[test]
    fn trailing_window_full() {
        let series = PriceSeries::new(make_observations(&[1.0, 2.0, 3.0, 4.0, 5.0])).unwrap();
        let w = series.window(4, 3);
        assert_eq!(w.len(), 3);
        assert_eq!(w[0].price, 3.0);
        assert_eq!(w[2].price, 5.0);
    }

    #[test]
    fn trailing_window_partial_at_start() {
        let series = PriceSeries::new(make_observations(&[1.0, 2.0, 3.0, 4.0, 5.0])).unwrap();
        let w = series.window(1, 3);
        assert_eq!(w.len(), 2);
        assert_eq!(w[0].price, 1.0);
    }
}
