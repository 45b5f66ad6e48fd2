//! Weighted composite index over aligned price series.
//!
//! Combines several instruments into one synthetic index price per timestamp
//! (e.g. a fixed-weight crypto basket), which then feeds the pipeline like
//! any other series. Components must share an identical timeline; aligning
//! mismatched timelines is the data adapter's job.

use super::error::TickbackError;
use super::series::{Observation, PriceSeries};

#[derive(Debug, Clone)]
pub struct IndexComponent {
    pub weight: f64,
    pub series: PriceSeries,
}

/// Index price at each timestamp: sum of weight x component price.
pub fn weighted_index(components: &[IndexComponent]) -> Result<PriceSeries, TickbackError> {
    if components.is_empty() {
        return Err(TickbackError::InvalidInput {
            reason: "no index components".into(),
        });
    }

    for component in components {
        if !component.weight.is_finite() || component.weight <= 0.0 {
            return Err(TickbackError::Configuration {
                param: "weight".into(),
                reason: format!("must be positive, got {}", component.weight),
            });
        }
    }

    let first = &components[0].series;
    for component in &components[1..] {
        if component.series.len() != first.len() {
            return Err(TickbackError::InvalidInput {
                reason: format!(
                    "component length mismatch: {} vs {}",
                    component.series.len(),
                    first.len()
                ),
            });
        }
    }

    let mut observations = Vec::with_capacity(first.len());
    for i in 0..first.len() {
        let timestamp = first.timestamp_at(i).unwrap_or_default();
        let mut price = 0.0;
        for component in components {
            let obs = component.series.get(i).ok_or_else(|| {
                TickbackError::InvalidInput {
                    reason: format!("missing observation at index {}", i),
                }
            })?;
            if obs.timestamp != timestamp {
                return Err(TickbackError::InvalidInput {
                    reason: format!(
                        "timestamp mismatch at index {}: {} vs {}",
                        i, obs.timestamp, timestamp
                    ),
                });
            }
            price += component.weight * obs.price;
        }
        observations.push(Observation { timestamp, price });
    }

    PriceSeries::new(observations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_series(prices: &[f64]) -> PriceSeries {
        let observations = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| Observation {
                timestamp: i as i64,
                price,
            })
            .collect();
        PriceSeries::new(observations).unwrap()
    }

    #[test]
    fn weighted_sum_per_timestamp() {
        let components = vec![
            IndexComponent {
                weight: 0.4,
                series: make_series(&[100.0, 110.0]),
            },
            IndexComponent {
                weight: 0.6,
                series: make_series(&[200.0, 190.0]),
            },
        ];
        let index = weighted_index(&components).unwrap();

        assert_eq!(index.len(), 2);
        assert!((index.price_at(0).unwrap() - 160.0).abs() < 1e-12);
        assert!((index.price_at(1).unwrap() - 158.0).abs() < 1e-12);
    }

    #[test]
    fn single_component_scales_prices() {
        let components = vec![IndexComponent {
            weight: 0.5,
            series: make_series(&[100.0, 200.0]),
        }];
        let index = weighted_index(&components).unwrap();
        assert!((index.price_at(1).unwrap() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn empty_components_fail() {
        let err = weighted_index(&[]).unwrap_err();
        assert!(matches!(err, TickbackError::InvalidInput { .. }));
    }

    #[test]
    fn non_positive_weight_fails() {
        let components = vec![IndexComponent {
            weight: 0.0,
            series: make_series(&[100.0]),
        }];
        let err = weighted_index(&components).unwrap_err();
        assert!(matches!(err, TickbackError::Configuration { param, .. } if param == "weight"));
    }

    #[test]
    fn length_mismatch_fails() {
        let components = vec![
            IndexComponent {
                weight: 0.5,
                series: make_series(&[100.0, 110.0]),
            },
            IndexComponent {
                weight: 0.5,
                series: make_series(&[100.0]),
            },
        ];
        assert!(weighted_index(&components).is_err());
    }

    #[test]
    fn timestamp_mismatch_fails() {
        let shifted = PriceSeries::new(vec![
            Observation {
                timestamp: 10,
                price: 100.0,
            },
            Observation {
                timestamp: 20,
                price: 110.0,
            },
        ])
        .unwrap();
        let components = vec![
            IndexComponent {
                weight: 0.5,
                series: make_series(&[100.0, 110.0]),
            },
            IndexComponent {
                weight: 0.5,
                series: shifted,
            },
        ];
        let err = weighted_index(&components).unwrap_err();
        assert!(
            matches!(err, TickbackError::InvalidInput { reason } if reason.contains("timestamp"))
        );
    }
}
