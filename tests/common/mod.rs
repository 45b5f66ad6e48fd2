#![allow(dead_code)]

use tickback::domain::error::TickbackError;
use tickback::domain::series::{Observation, PriceSeries};
use tickback::ports::data_port::PricePort;

pub struct MockPricePort {
    pub observations: Vec<Observation>,
    pub error: Option<String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            observations: Vec::new(),
            error: None,
        }
    }

    pub fn with_observations(mut self, observations: Vec<Observation>) -> Self {
        self.observations = observations;
        self
    }

    pub fn with_prices(self, prices: &[f64]) -> Self {
        self.with_observations(make_observations(prices))
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn fetch_observations(&self) -> Result<Vec<Observation>, TickbackError> {
        if let Some(reason) = &self.error {
            return Err(TickbackError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.observations.clone())
    }
}

pub fn make_observations(prices: &[f64]) -> Vec<Observation> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| Observation {
            timestamp: i as i64,
            price,
        })
        .collect()
}

pub fn make_series(prices: &[f64]) -> PriceSeries {
    PriceSeries::new(make_observations(prices)).unwrap()
}
