//! Provider chain with fallback
//!
//! Sources are tried in order. Each gets a single attempt; failures are logged
//! and the next source is tried. The last error is returned when every source
//! fails.

use crate::api::{AlphaVantageClient, MarketDataSource, YahooFinanceClient, alpha_vantage, yahoo};
use crate::config::{DashboardConfig, DataProvider};
use crate::error::{DashboardError, Result};
use crate::models::{CompanyOverview, Quote, Series};
use async_trait::async_trait;
use std::sync::Arc;

/// Ordered chain of named data sources
#[derive(Clone)]
pub struct HybridSource {
    sources: Vec<(String, Arc<dyn MarketDataSource>)>,
}

impl std::fmt::Debug for HybridSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridSource")
            .field("sources", &self.source_names())
            .finish()
    }
}

impl HybridSource {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Append a source to the end of the chain
    pub fn with_source(mut self, name: impl Into<String>, source: Arc<dyn MarketDataSource>) -> Self {
        self.sources.push((name.into(), source));
        self
    }

    /// Build the chain for the configured provider.
    ///
    /// Alpha Vantage comes first when preferred (validation guarantees its
    /// key); Yahoo Finance is always the last resort.
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let mut chain = Self::new();

        if let (DataProvider::AlphaVantage, Some(key)) = (config.provider, &config.alpha_vantage_api_key) {
            let client = AlphaVantageClient::new(key.clone(), config.request_timeout)?;
            chain = chain.with_source(alpha_vantage::PROVIDER, Arc::new(client));
        }

        let yahoo = YahooFinanceClient::new(config.history_range.clone(), config.request_timeout);
        Ok(chain.with_source(yahoo::PROVIDER, Arc::new(yahoo)))
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl Default for HybridSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataSource for HybridSource {
    async fn fetch_series(&self, symbol: &str) -> Result<Series> {
        let mut last_error = None;
        for (name, source) in &self.sources {
            match source.fetch_series(symbol).await {
                Ok(series) if !series.is_empty() => {
                    tracing::debug!(symbol, provider = %name, bars = series.len(), "Fetched history");
                    return Ok(series);
                }
                Ok(_) => {
                    tracing::warn!(symbol, provider = %name, "Empty history, trying next provider");
                    last_error = Some(DashboardError::unavailable(symbol, format!("{name} returned no bars")));
                }
                Err(e) => {
                    tracing::warn!(symbol, provider = %name, "History fetch failed: {}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DashboardError::unavailable(symbol, "no data providers configured")))
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote> {
        let mut last_error = None;
        for (name, source) in &self.sources {
            match source.fetch_quote(symbol).await {
                Ok(quote) => return Ok(quote),
                Err(e) => {
                    tracing::warn!(symbol, provider = %name, "Quote fetch failed: {}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DashboardError::unavailable(symbol, "no data providers configured")))
    }

    async fn fetch_overview(&self, symbol: &str) -> Result<CompanyOverview> {
        let mut last_error = None;
        for (name, source) in &self.sources {
            match source.fetch_overview(symbol).await {
                Ok(overview) if overview.has_figures() => return Ok(overview),
                Ok(_) => {
                    tracing::debug!(symbol, provider = %name, "No fundamentals, trying next provider");
                    last_error = Some(DashboardError::unavailable(symbol, format!("{name} has no fundamentals")));
                }
                Err(e) => {
                    tracing::warn!(symbol, provider = %name, "Overview fetch failed: {}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DashboardError::unavailable(symbol, "no data providers configured")))
    }
}
