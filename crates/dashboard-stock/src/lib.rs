//! Stock dashboard core
//!
//! This crate holds everything behind the stock dashboard and its chatbot:
//!
//! - Market data from Yahoo Finance and Alpha Vantage, chained with fallback
//! - Technical indicators (SMA, EMA, MACD, RSI, Bollinger Bands) and
//!   support/resistance levels
//! - A threshold-based recommendation score
//! - Price forecasts from an autoregressive tree ensemble or a linear trend
//! - A keyword-routed chatbot answering price, analysis, recommendation and
//!   comparison questions
//!
//! # Example
//!
//! ```rust,ignore
//! use dashboard_stock::{DashboardConfig, HybridSource, StockChatbot};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DashboardConfig::from_env()?;
//!     let source = Arc::new(HybridSource::from_config(&config)?);
//!
//!     let bot = StockChatbot::new(source);
//!     println!("{}", bot.respond("What's the price of AAPL?").await);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod bot;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod market;
pub mod models;
pub mod router;

pub use api::{AlphaVantageClient, HybridSource, MarketDataSource, YahooFinanceClient};
pub use bot::{ChatSession, Command, StockChatbot};
pub use config::{DashboardConfig, DataProvider, ForecastConfig};
pub use engine::{IndicatorFrame, Levels, Recommendation, compute_indicators, recommend};
pub use error::{DashboardError, Result};
pub use forecast::{ForecastMethod, ForecastResult};
pub use models::{Bar, CompanyOverview, Quote, Series};
pub use router::{Intent, SmartRouter};
