//! Domain error types.
//!
//! Recoverable degradations (short history, training fallback) are encoded in
//! result values; these errors cover the cases where no analysis is possible.

/// Top-level error type for marketlens.
#[derive(Debug, thiserror::Error)]
pub enum MarketlensError {
    #[error("no bar data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("all candidate models failed to fit for {symbol}")]
    AllModelsFailed { symbol: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MarketlensError> for std::process::ExitCode {
    fn from(err: &MarketlensError) -> Self {
        let code: u8 = match err {
            MarketlensError::Io(_) => 1,
            MarketlensError::ConfigParse { .. } | MarketlensError::ConfigInvalid { .. } => 2,
            MarketlensError::Data { .. } => 3,
            MarketlensError::AllModelsFailed { .. } => 4,
            MarketlensError::NoData { .. } | MarketlensError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
