//! Trade tape CSV adapter.
//!
//! Reads headerless exchange trade dumps with columns
//! trade_id, price, qty, quote_qty, time, is_buyer_maker, is_best_match
//! and reduces them to timestamped price observations. Rows are sorted by
//! timestamp and equal-timestamp ties are collapsed to the last row seen,
//! so the output satisfies the strictly increasing ordering that
//! `PriceSeries::new` demands.

use crate::domain::error::TickbackError;
use crate::domain::series::Observation;
use crate::ports::data_port::PricePort;
use std::fs;
use std::path::PathBuf;

const PRICE_COLUMN: usize = 1;
const TIME_COLUMN: usize = 4;

pub struct TradeTapeAdapter {
    path: PathBuf,
}

impl TradeTapeAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PricePort for TradeTapeAdapter {
    fn fetch_observations(&self) -> Result<Vec<Observation>, TickbackError> {
        let content = fs::read_to_string(&self.path).map_err(|e| TickbackError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(content.as_bytes());
        let mut observations = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TickbackError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let price: f64 = record
                .get(PRICE_COLUMN)
                .ok_or_else(|| TickbackError::Data {
                    reason: "missing price column".into(),
                })?
                .parse()
                .map_err(|e| TickbackError::Data {
                    reason: format!("invalid price value: {}", e),
                })?;

            let timestamp: i64 = record
                .get(TIME_COLUMN)
                .ok_or_else(|| TickbackError::Data {
                    reason: "missing time column".into(),
                })?
                .parse()
                .map_err(|e| TickbackError::Data {
                    reason: format!("invalid time value: {}", e),
                })?;

            observations.push(Observation { timestamp, price });
        }

        // Stable sort keeps file order within a timestamp, so the last row
        // of a tie is the last trade printed at that time.
        observations.sort_by_key(|o| o.timestamp);

        let mut collapsed: Vec<Observation> = Vec::with_capacity(observations.len());
        for obs in observations {
            match collapsed.last_mut() {
                Some(last) if last.timestamp == obs.timestamp => *last = obs,
                _ => collapsed.push(obs),
            }
        }

        Ok(collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_tape(rows: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trades.csv");
        fs::write(&path, rows).unwrap();
        (dir, path)
    }

    #[test]
    fn fetch_parses_price_and_time_columns() {
        let (_dir, path) = write_tape(
            "1,0.002503,5.0,0.012515,1517961600000,True,True\n\
             2,0.002504,1.0,0.002504,1517961600100,False,True\n",
        );
        let adapter = TradeTapeAdapter::new(path);

        let obs = adapter.fetch_observations().unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].timestamp, 1517961600000);
        assert_eq!(obs[0].price, 0.002503);
        assert_eq!(obs[1].timestamp, 1517961600100);
        assert_eq!(obs[1].price, 0.002504);
    }

    #[test]
    fn fetch_sorts_by_timestamp() {
        let (_dir, path) = write_tape(
            "2,20.0,1.0,20.0,300,True,True\n\
             1,10.0,1.0,10.0,100,True,True\n\
             3,15.0,1.0,15.0,200,True,True\n",
        );
        let adapter = TradeTapeAdapter::new(path);

        let obs = adapter.fetch_observations().unwrap();
        let timestamps: Vec<i64> = obs.iter().map(|o| o.timestamp).collect();
        assert_eq!(timestamps, vec![100, 200, 300]);
        assert_eq!(obs[1].price, 15.0);
    }

    #[test]
    fn equal_timestamps_collapse_to_last_row() {
        let (_dir, path) = write_tape(
            "1,10.0,1.0,10.0,100,True,True\n\
             2,11.0,1.0,11.0,100,True,True\n\
             3,12.0,1.0,12.0,100,True,True\n\
             4,20.0,1.0,20.0,200,True,True\n",
        );
        let adapter = TradeTapeAdapter::new(path);

        let obs = adapter.fetch_observations().unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].timestamp, 100);
        assert_eq!(obs[0].price, 12.0);
        assert_eq!(obs[1].price, 20.0);
    }

    #[test]
    fn missing_file_is_data_error() {
        let adapter = TradeTapeAdapter::new(PathBuf::from("/nonexistent/trades.csv"));
        let err = adapter.fetch_observations().unwrap_err();
        assert!(matches!(err, TickbackError::Data { .. }));
    }

    #[test]
    fn malformed_price_is_data_error() {
        let (_dir, path) = write_tape("1,not_a_price,1.0,10.0,100,True,True\n");
        let adapter = TradeTapeAdapter::new(path);

        let err = adapter.fetch_observations().unwrap_err();
        assert!(matches!(err, TickbackError::Data { .. }));
    }

    #[test]
    fn short_row_is_data_error() {
        let (_dir, path) = write_tape("1,10.0\n");
        let adapter = TradeTapeAdapter::new(path);

        let err = adapter.fetch_observations().unwrap_err();
        assert!(matches!(err, TickbackError::Data { .. }));
    }

    #[test]
    fn empty_file_yields_no_observations() {
        let (_dir, path) = write_tape("");
        let adapter = TradeTapeAdapter::new(path);

        let obs = adapter.fetch_observations().unwrap();
        assert!(obs.is_empty());
    }
}
