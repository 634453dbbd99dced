//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for fincross.
#[derive(Debug, thiserror::Error)]
pub enum FincrossError {
    #[error("duplicate date in price series: {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("empty price series: nothing to aggregate")]
    EmptySeries,

    #[error("no stored data for {symbol}")]
    NoData { symbol: String },

    #[error("market data fetch failed for {symbol}: {reason}")]
    Fetch { symbol: String, reason: String },

    #[error("market data rate limit still active for {symbol} after {attempts} attempts")]
    RateLimited { symbol: String, attempts: u32 },

    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

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

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FincrossError> for std::process::ExitCode {
    fn from(err: &FincrossError) -> Self {
        let code: u8 = match err {
            FincrossError::Io(_) => 1,
            FincrossError::ConfigParse { .. }
            | FincrossError::ConfigMissing { .. }
            | FincrossError::ConfigInvalid { .. } => 2,
            FincrossError::Database { .. } | FincrossError::DatabaseQuery { .. } => 3,
            FincrossError::Fetch { .. } | FincrossError::RateLimited { .. } => 4,
            FincrossError::DuplicateDate { .. }
            | FincrossError::EmptySeries
            | FincrossError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
