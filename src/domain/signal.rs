//! Signal generation: per-index directional decisions from price history.

use std::fmt;

use super::error::TickbackError;
use super::rolling;
use super::series::PriceSeries;

/// Directional decision at a single timestamp. Not yet a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Long,
    Flat,
    Short,
}

impl Signal {
    /// Signed unit position this signal targets.
    pub fn direction(&self) -> i64 {
        match self {
            Signal::Long => 1,
            Signal::Flat => 0,
            Signal::Short => -1,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Long => write!(f, "long"),
            Signal::Flat => write!(f, "flat"),
            Signal::Short => write!(f, "short"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalPoint {
    pub timestamp: i64,
    pub signal: Signal,
}

/// Strategy variant and its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategySpec {
    MovingAverageCrossover {
        short_window: usize,
        long_window: usize,
    },
    MeanReversionBands {
        window: usize,
        band_multiplier: f64,
    },
}

impl StrategySpec {
    pub fn validate(&self) -> Result<(), TickbackError> {
        match self {
            StrategySpec::MovingAverageCrossover {
                short_window,
                long_window,
            } => {
                if *short_window < 1 {
                    return Err(TickbackError::Configuration {
                        param: "short_window".into(),
                        reason: "must be at least 1".into(),
                    });
                }
                if *long_window < 1 {
                    return Err(TickbackError::Configuration {
                        param: "long_window".into(),
                        reason: "must be at least 1".into(),
                    });
                }
                if short_window >= long_window {
                    return Err(TickbackError::Configuration {
                        param: "short_window".into(),
                        reason: format!(
                            "short_window {} must be less than long_window {}",
                            short_window, long_window
                        ),
                    });
                }
                Ok(())
            }
            StrategySpec::MeanReversionBands {
                window,
                band_multiplier,
            } => {
                if *window < 1 {
                    return Err(TickbackError::Configuration {
                        param: "window".into(),
                        reason: "must be at least 1".into(),
                    });
                }
                if !band_multiplier.is_finite() || *band_multiplier < 0.0 {
                    return Err(TickbackError::Configuration {
                        param: "band_multiplier".into(),
                        reason: "must be non-negative".into(),
                    });
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for StrategySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategySpec::MovingAverageCrossover {
                short_window,
                long_window,
            } => write!(f, "MAC({},{})", short_window, long_window),
            StrategySpec::MeanReversionBands {
                window,
                band_multiplier,
            } => write!(f, "MRB({},{})", window, band_multiplier),
        }
    }
}

/// Produces one signal per series index for a validated strategy.
#[derive(Debug)]
pub struct SignalGenerator {
    spec: StrategySpec,
}

impl SignalGenerator {
    pub fn new(spec: StrategySpec) -> Result<Self, TickbackError> {
        spec.validate()?;
        Ok(SignalGenerator { spec })
    }

    pub fn spec(&self) -> &StrategySpec {
        &self.spec
    }

    pub fn generate(&self, series: &PriceSeries) -> Result<Vec<SignalPoint>, TickbackError> {
        match &self.spec {
            StrategySpec::MovingAverageCrossover {
                short_window,
                long_window,
            } => generate_crossover(series, *short_window, *long_window),
            StrategySpec::MeanReversionBands {
                window,
                band_multiplier,
            } => generate_bands(series, *window, *band_multiplier),
        }
    }
}

/// Long while the short mean is above the long mean, Flat otherwise. Indices
/// before `short_window` are Flat by definition: no decision before the
/// shorter window has meaningful history. This variant never emits Short; a
/// crossover below produces Flat.
fn generate_crossover(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> Result<Vec<SignalPoint>, TickbackError> {
    let short_stats = rolling::compute(series, short_window)?;
    let long_stats = rolling::compute(series, long_window)?;

    let signals = series
        .observations()
        .iter()
        .enumerate()
        .map(|(i, obs)| {
            let signal = if i < short_window {
                Signal::Flat
            } else if short_stats[i].mean > long_stats[i].mean {
                Signal::Long
            } else {
                Signal::Flat
            };
            SignalPoint {
                timestamp: obs.timestamp,
                signal,
            }
        })
        .collect();

    Ok(signals)
}

/// Bollinger-style bands around the rolling mean. Indices before `window` are
/// excluded from eligibility entirely (Flat). An undefined stddev counts as a
/// zero-width band. Long takes precedence over Short in the degenerate
/// configuration where both conditions hold (band_multiplier of zero with the
/// price pinned to the mean cannot trigger either, so this only matters for
/// pathological inputs).
fn generate_bands(
    series: &PriceSeries,
    window: usize,
    band_multiplier: f64,
) -> Result<Vec<SignalPoint>, TickbackError> {
    let stats = rolling::compute(series, window)?;

    let signals = series
        .observations()
        .iter()
        .enumerate()
        .map(|(i, obs)| {
            let signal = if i < window {
                Signal::Flat
            } else {
                let stddev = stats[i].stddev.unwrap_or(0.0);
                let upper = stats[i].mean + band_multiplier * stddev;
                let lower = stats[i].mean - band_multiplier * stddev;
                if obs.price < lower {
                    Signal::Long
                } else if obs.price > upper {
                    Signal::Short
                } else {
                    Signal::Flat
                }
            };
            SignalPoint {
                timestamp: obs.timestamp,
                signal,
            }
        })
        .collect();

    Ok(signals)
}
