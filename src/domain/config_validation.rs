//! Configuration validation.
//!
//! Validates every config field before a run starts; nothing in the pipeline
//! executes against unvalidated parameters.

use crate::ports::config_port::ConfigPort;

use super::error::TickbackError;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 100.0;
pub const DEFAULT_LATENCY: i64 = 10;
pub const DEFAULT_SHORT_WINDOW: i64 = 40;
pub const DEFAULT_LONG_WINDOW: i64 = 100;
pub const DEFAULT_BAND_WINDOW: i64 = 20;
pub const DEFAULT_BAND_MULTIPLIER: f64 = 2.0;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TickbackError> {
    validate_initial_capital(config)?;
    validate_latency(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TickbackError> {
    let kind = config
        .get_string("strategy", "kind")
        .ok_or_else(|| TickbackError::ConfigMissing {
            section: "strategy".to_string(),
            key: "kind".to_string(),
        })?;

    match kind.trim() {
        "moving_average_crossover" => validate_crossover_params(config),
        "mean_reversion_bands" => validate_band_params(config),
        other => Err(TickbackError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "kind".to_string(),
            reason: format!(
                "unknown strategy '{}' (expected moving_average_crossover or mean_reversion_bands)",
                other
            ),
        }),
    }
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), TickbackError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(TickbackError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), TickbackError> {
    let value = config.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL);
    if !value.is_finite() || value <= 0.0 {
        return Err(TickbackError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_latency(config: &dyn ConfigPort) -> Result<(), TickbackError> {
    let value = config.get_int("backtest", "latency", DEFAULT_LATENCY);
    if value < 0 {
        return Err(TickbackError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "latency".to_string(),
            reason: "latency must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_crossover_params(config: &dyn ConfigPort) -> Result<(), TickbackError> {
    let short = config.get_int("strategy", "short_window", DEFAULT_SHORT_WINDOW);
    let long = config.get_int("strategy", "long_window", DEFAULT_LONG_WINDOW);

    if short < 1 {
        return Err(TickbackError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "short_window".to_string(),
            reason: "short_window must be at least 1".to_string(),
        });
    }
    if long < 1 {
        return Err(TickbackError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "long_window".to_string(),
            reason: "long_window must be at least 1".to_string(),
        });
    }
    if short >= long {
        return Err(TickbackError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "short_window".to_string(),
            reason: "short_window must be less than long_window".to_string(),
        });
    }
    Ok(())
}

fn validate_band_params(config: &dyn ConfigPort) -> Result<(), TickbackError> {
    let window = config.get_int("strategy", "window", DEFAULT_BAND_WINDOW);
    if window < 1 {
        return Err(TickbackError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "window".to_string(),
            reason: "window must be at least 1".to_string(),
        });
    }

    let multiplier = config.get_double("strategy", "band_multiplier", DEFAULT_BAND_MULTIPLIER);
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(TickbackError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "band_multiplier".to_string(),
            reason: "band_multiplier must be non-negative".to_string(),
        });
    }
    Ok(())
}
