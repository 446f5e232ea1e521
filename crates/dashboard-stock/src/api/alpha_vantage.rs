//! Alpha Vantage API client

use crate::api::MarketDataSource;
use crate::error::{DashboardError, Result};
use crate::models::{Bar, CompanyOverview, GlobalQuote, Quote, Series};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

const BASE_URL: &str = "https://www.alphavantage.co/query";
pub(crate) const PROVIDER: &str = "Alpha Vantage";

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageClient {
    /// Create a client with a fixed per-request timeout
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Create from environment variable ALPHA_VANTAGE_API_KEY
    pub fn from_env(timeout: Duration) -> Result<Self> {
        let api_key = std::env::var("ALPHA_VANTAGE_API_KEY").map_err(|_| {
            DashboardError::ConfigError(
                "ALPHA_VANTAGE_API_KEY environment variable not set".to_string(),
            )
        })?;

        Self::new(api_key, timeout)
    }

    /// Point the client at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn query(&self, function: &str, symbol: &str, extra: &[(&str, &str)]) -> Result<Value> {
        let mut params = HashMap::new();
        params.insert("function", function);
        params.insert("symbol", symbol);
        params.insert("apikey", self.api_key.as_str());
        params.extend(extra.iter().copied());

        tracing::debug!(function, symbol, "Alpha Vantage request");
        let response = self.client.get(&self.base_url).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(DashboardError::AlphaVantageError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let data: Value = response.json().await?;
        check_payload(&data)?;
        Ok(data)
    }

    /// Daily bars from `TIME_SERIES_DAILY` (compact output)
    pub async fn get_daily(&self, symbol: &str) -> Result<Series> {
        let data = self
            .query("TIME_SERIES_DAILY", &provider_symbol(symbol), &[("outputsize", "compact")])
            .await?;
        parse_daily(symbol, &data)
    }

    /// Current quote from `GLOBAL_QUOTE`
    pub async fn get_quote(&self, symbol: &str) -> Result<Quote> {
        let data = self.query("GLOBAL_QUOTE", &provider_symbol(symbol), &[]).await?;
        parse_global_quote(symbol, &data)
    }

    /// Fundamentals from `OVERVIEW`
    pub async fn get_overview(&self, symbol: &str) -> Result<CompanyOverview> {
        let data = self.query("OVERVIEW", &provider_symbol(symbol), &[]).await?;
        parse_overview(symbol, &data)
    }
}

#[async_trait]
impl MarketDataSource for AlphaVantageClient {
    async fn fetch_series(&self, symbol: &str) -> Result<Series> {
        self.get_daily(symbol).await
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote> {
        self.get_quote(symbol).await
    }

    async fn fetch_overview(&self, symbol: &str) -> Result<CompanyOverview> {
        self.get_overview(symbol).await
    }
}

/// Strip the Indian exchange suffixes, which the provider does not accept
pub fn provider_symbol(symbol: &str) -> String {
    let symbol = symbol.trim();
    symbol
        .strip_suffix(".NS")
        .or_else(|| symbol.strip_suffix(".BO"))
        .unwrap_or(symbol)
        .to_string()
}

/// Turn provider error payloads into errors
fn check_payload(data: &Value) -> Result<()> {
    if let Some(error) = data.get("Error Message") {
        return Err(DashboardError::AlphaVantageError(error.to_string()));
    }

    if data.get("Note").is_some() || data.get("Information").is_some() {
        return Err(DashboardError::RateLimitExceeded {
            provider: PROVIDER.to_string(),
        });
    }

    Ok(())
}

fn field(values: &Value, key: &'static str) -> Result<f64> {
    values[key]
        .as_str()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| DashboardError::MalformedQuote {
            field: key,
            value: values[key].to_string(),
        })
}

/// Parse a `TIME_SERIES_DAILY` payload into an ascending series
pub fn parse_daily(symbol: &str, data: &Value) -> Result<Series> {
    let series = data
        .get("Time Series (Daily)")
        .and_then(Value::as_object)
        .ok_or_else(|| DashboardError::unavailable(symbol, "no daily time series in response"))?;

    let bars = series
        .iter()
        .map(|(date, values)| {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
                DashboardError::AlphaVantageError(format!("Invalid date in time series: {date}"))
            })?;
            Ok(Bar::new(
                date,
                field(values, "1. open")?,
                field(values, "2. high")?,
                field(values, "3. low")?,
                field(values, "4. close")?,
                field(values, "5. volume")?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    if bars.is_empty() {
        return Err(DashboardError::unavailable(symbol, "empty daily time series"));
    }

    Ok(Series::new(symbol, bars))
}

/// Parse a `GLOBAL_QUOTE` payload; an empty quote object means no data
pub fn parse_global_quote(symbol: &str, data: &Value) -> Result<Quote> {
    let raw = data
        .get("Global Quote")
        .filter(|q| q.as_object().is_some_and(|o| !o.is_empty()))
        .ok_or_else(|| DashboardError::unavailable(symbol, "empty global quote"))?;

    let wire: GlobalQuote = serde_json::from_value(raw.clone())?;
    let mut quote = Quote::try_from(wire)?;
    // Keep the caller's symbol, suffix included
    quote.symbol = symbol.to_string();
    Ok(quote)
}

/// Parse an `OVERVIEW` payload. Figures the provider reports as "None" or
/// "-" are left unset.
pub fn parse_overview(symbol: &str, data: &Value) -> Result<CompanyOverview> {
    if data.get("Symbol").is_none() {
        return Err(DashboardError::unavailable(symbol, "no company overview in response"));
    }

    let text = |key: &str| {
        data[key]
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "None" && *s != "-")
            .map(str::to_string)
    };
    let number = |key: &str| {
        text(key)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    };

    Ok(CompanyOverview {
        symbol: symbol.to_string(),
        name: text("Name"),
        sector: text("Sector"),
        industry: text("Industry"),
        market_cap: number("MarketCapitalization"),
        pe_ratio: number("PERatio"),
        dividend_yield: number("DividendYield"),
    })
}
