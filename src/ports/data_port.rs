//! Price source port: the input boundary of the core.
//!
//! Implementations must hand over observations sorted by timestamp with
//! equal-timestamp ties already collapsed (later row wins) and prices
//! positive; `PriceSeries::new` rejects anything less.

use crate::domain::error::TickbackError;
use crate::domain::series::Observation;

pub trait PricePort {
    fn fetch_observations(&self) -> Result<Vec<Observation>, TickbackError>;
}
