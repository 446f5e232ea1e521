//! Configuration for dashboard operations

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Data provider preferred for quotes and history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DataProvider {
    /// Yahoo Finance (default, no API key required)
    #[default]
    Yahoo,
    /// Alpha Vantage first, Yahoo Finance as fallback (requires API key)
    AlphaVantage,
}

impl FromStr for DataProvider {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "yahoo" | "yf" => Ok(Self::Yahoo),
            "alphavantage" | "alpha_vantage" | "alpha-vantage" | "av" => Ok(Self::AlphaVantage),
            other => Err(DashboardError::ConfigError(format!(
                "Unknown data provider: {other}"
            ))),
        }
    }
}

/// Knobs for the forecasting strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Trailing window fed to the tree ensemble
    pub lookback: usize,
    /// Number of trees in the ensemble
    pub trees: usize,
    /// Seed for bootstrap sampling
    pub seed: u64,
    /// Chronological share of examples used for training
    pub train_fraction: f64,
    /// Trailing bars used by the linear trend fit
    pub linear_window: usize,
    /// Horizon used when the caller does not ask for one
    pub default_horizon: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            lookback: 30,
            trees: 100,
            seed: 42,
            train_fraction: 0.8,
            linear_window: 60,
            default_horizon: 7,
        }
    }
}

/// Configuration for dashboard operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Preferred data provider
    pub provider: DataProvider,

    /// Request timeout for provider calls
    pub request_timeout: Duration,

    /// History range requested for daily bars (e.g. "3mo")
    pub history_range: String,

    /// Alpha Vantage API key (optional)
    pub alpha_vantage_api_key: Option<String>,

    /// Forecast settings
    pub forecast: ForecastConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            provider: DataProvider::Yahoo,
            request_timeout: Duration::from_secs(10),
            history_range: "3mo".to_string(),
            alpha_vantage_api_key: None,
            forecast: ForecastConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Build a validated configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env_api_key().with_env_provider()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.provider == DataProvider::AlphaVantage && self.alpha_vantage_api_key.is_none() {
            return Err(DashboardError::ConfigError(
                "Alpha Vantage API key required when using AlphaVantage provider".to_string(),
            ));
        }

        if self.forecast.lookback == 0 {
            return Err(DashboardError::ConfigError(
                "forecast lookback must be greater than 0".to_string(),
            ));
        }

        if self.forecast.trees == 0 {
            return Err(DashboardError::ConfigError(
                "forecast trees must be greater than 0".to_string(),
            ));
        }

        if !(self.forecast.train_fraction > 0.0 && self.forecast.train_fraction < 1.0) {
            return Err(DashboardError::ConfigError(format!(
                "train_fraction must be in (0, 1), got {}",
                self.forecast.train_fraction
            )));
        }

        if self.forecast.linear_window < 2 {
            return Err(DashboardError::ConfigError(
                "linear_window must be at least 2".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for DashboardConfig
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    provider: Option<DataProvider>,
    request_timeout: Option<Duration>,
    history_range: Option<String>,
    alpha_vantage_api_key: Option<String>,
    forecast: Option<ForecastConfig>,
}

impl DashboardConfigBuilder {
    /// Set the preferred data provider
    pub fn provider(mut self, provider: DataProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the daily history range
    pub fn history_range(mut self, range: impl Into<String>) -> Self {
        self.history_range = Some(range.into());
        self
    }

    /// Set Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Set forecast settings
    pub fn forecast(mut self, forecast: ForecastConfig) -> Self {
        self.forecast = Some(forecast);
        self
    }

    /// Load Alpha Vantage API key from environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("ALPHA_VANTAGE_API_KEY") {
            self.alpha_vantage_api_key = Some(key);
        }
        self
    }

    /// Load the preferred provider from `DASHBOARD_PROVIDER`
    pub fn with_env_provider(mut self) -> Result<Self> {
        if let Ok(value) = std::env::var("DASHBOARD_PROVIDER") {
            self.provider = Some(value.parse()?);
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<DashboardConfig> {
        let defaults = DashboardConfig::default();

        let config = DashboardConfig {
            provider: self.provider.unwrap_or(defaults.provider),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            history_range: self.history_range.unwrap_or(defaults.history_range),
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            forecast: self.forecast.unwrap_or(defaults.forecast),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.provider, DataProvider::Yahoo);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.forecast.lookback, 30);
        assert_eq!(config.forecast.seed, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = DashboardConfig::builder()
            .provider(DataProvider::Yahoo)
            .history_range("6mo")
            .request_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.history_range, "6mo");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_validation_alpha_vantage_no_key() {
        let config = DashboardConfig {
            provider: DataProvider::AlphaVantage,
            alpha_vantage_api_key: None,
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_alpha_vantage_with_key() {
        let config = DashboardConfig {
            provider: DataProvider::AlphaVantage,
            alpha_vantage_api_key: Some("test_key".to_string()),
            ..Default::default()
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_train_fraction() {
        let config = DashboardConfig {
            forecast: ForecastConfig {
                train_fraction: 1.0,
                ..ForecastConfig::default()
            },
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("yahoo".parse::<DataProvider>().unwrap(), DataProvider::Yahoo);
        assert_eq!(
            "Alpha-Vantage".parse::<DataProvider>().unwrap(),
            DataProvider::AlphaVantage
        );
        assert!("bloomberg".parse::<DataProvider>().is_err());
    }
}
