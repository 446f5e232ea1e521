//! Error types for dashboard operations

use thiserror::Error;

/// Dashboard specific errors
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// Provider rejected the call because of its request quota
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded {
        provider: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Alpha Vantage API error
    #[error("Alpha Vantage error: {0}")]
    AlphaVantageError(String),

    /// Quote payload could not be translated
    #[error("Malformed quote field {field}: {value:?}")]
    MalformedQuote {
        field: &'static str,
        value: String,
    },

    /// Forecast model could not be fitted
    #[error("Model error: {0}")]
    ModelError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Bot command error
    #[error("Command error: {0}")]
    CommandError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

impl DashboardError {
    /// Shorthand for an empty or missing upstream payload
    pub fn unavailable(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

/// Convert anyhow::Error to DashboardError
impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        DashboardError::Other(err.to_string())
    }
}
