//! API clients for market data providers

pub mod alpha_vantage;
pub mod hybrid;
pub mod yahoo;

pub use alpha_vantage::AlphaVantageClient;
pub use hybrid::HybridSource;
pub use yahoo::YahooFinanceClient;

use crate::error::Result;
use crate::models::{CompanyOverview, Quote, Series};
use async_trait::async_trait;

/// Source of daily history, current quotes and company fundamentals
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Daily bars, ascending by date
    async fn fetch_series(&self, symbol: &str) -> Result<Series>;

    /// Latest quote
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote>;

    /// Market cap, P/E and descriptive fields
    async fn fetch_overview(&self, symbol: &str) -> Result<CompanyOverview>;
}
