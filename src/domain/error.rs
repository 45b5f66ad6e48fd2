//! Domain error types.
//!
//! All failures are construction-time and fatal; the pipeline itself performs
//! no retries and raises nothing once its inputs validate. An unfilled trade
//! is not an error (see `domain::execution::Fill`).

/// Top-level error type for tickback.
#[derive(Debug, thiserror::Error)]
pub enum TickbackError {
    #[error("invalid input series: {reason}")]
    InvalidInput { reason: String },

    #[error("invalid configuration for {param}: {reason}")]
    Configuration { param: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TickbackError> for std::process::ExitCode {
    fn from(err: &TickbackError) -> Self {
        let code: u8 = match err {
            TickbackError::Io(_) => 1,
            TickbackError::Configuration { .. }
            | TickbackError::ConfigParse { .. }
            | TickbackError::ConfigMissing { .. }
            | TickbackError::ConfigInvalid { .. } => 2,
            TickbackError::Data { .. } => 3,
            TickbackError::InvalidInput { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
