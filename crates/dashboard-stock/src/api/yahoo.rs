//! Yahoo Finance API client

use crate::api::MarketDataSource;
use crate::error::{DashboardError, Result};
use crate::models::{Bar, CompanyOverview, Quote, Series};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveDate, Utc};
use std::time::Duration;
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

pub(crate) const PROVIDER: &str = "Yahoo Finance";

/// Ranges tried, in order, after the configured one comes back empty
pub const FALLBACK_RANGES: [&str; 2] = ["1mo", "5d"];

/// Yahoo Finance API client
#[derive(Debug, Clone)]
pub struct YahooFinanceClient {
    ranges: Vec<String>,
    timeout: Duration,
}

impl YahooFinanceClient {
    /// Create a client that requests `range` first, then the shorter fallbacks
    pub fn new(range: impl Into<String>, timeout: Duration) -> Self {
        let mut ranges = vec![range.into()];
        for fallback in FALLBACK_RANGES {
            if !ranges.iter().any(|r| r == fallback) {
                ranges.push(fallback.to_string());
            }
        }
        Self { ranges, timeout }
    }

    /// History ranges attempted by [`MarketDataSource::fetch_series`]
    pub fn ranges(&self) -> &[String] {
        &self.ranges
    }

    /// Daily bars for a range such as `"3mo"`
    pub async fn get_historical_range(&self, symbol: &str, range: &str) -> Result<Series> {
        let end = Utc::now();
        let start = range_start(range, end)?;
        self.get_historical_quotes(symbol, start, end).await
    }

    /// Daily bars between two instants
    pub async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Series> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| DashboardError::YahooFinanceError(e.to_string()))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp()).map_err(|e| {
            DashboardError::YahooFinanceError(format!("Invalid start timestamp: {e}"))
        })?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp()).map_err(|e| {
            DashboardError::YahooFinanceError(format!("Invalid end timestamp: {e}"))
        })?;

        let response = tokio::time::timeout(
            self.timeout,
            provider.get_quote_history(symbol, start_odt, end_odt),
        )
        .await
        .map_err(|_| DashboardError::YahooFinanceError(format!("Request for {symbol} timed out")))?
        .map_err(|e| DashboardError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| DashboardError::YahooFinanceError(e.to_string()))?;

        let bars: Vec<Bar> = quotes
            .iter()
            .filter_map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
                Some(Bar::new(date, q.open, q.high, q.low, q.close, q.volume as f64))
            })
            .collect();

        if bars.is_empty() {
            return Err(DashboardError::unavailable(symbol, "no bars returned"));
        }

        Ok(Series::new(symbol, bars))
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new("3mo", Duration::from_secs(10))
    }
}

#[async_trait]
impl MarketDataSource for YahooFinanceClient {
    async fn fetch_series(&self, symbol: &str) -> Result<Series> {
        let mut last_error = None;
        for range in &self.ranges {
            match self.get_historical_range(symbol, range).await {
                Ok(series) => return Ok(series),
                Err(e) => {
                    tracing::warn!(symbol, range = %range, "Yahoo history fetch failed: {}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DashboardError::unavailable(symbol, "no ranges configured")))
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote> {
        let series = self.get_historical_range(symbol, "5d").await?;
        quote_from_series(&series)
    }

    /// The chart API carries no fundamentals
    async fn fetch_overview(&self, symbol: &str) -> Result<CompanyOverview> {
        Ok(CompanyOverview::unknown(symbol))
    }
}

/// Start instant for a Yahoo-style range string
pub fn range_start(range: &str, end: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let days = match range {
        "1d" => 1,
        "5d" => 5,
        "1mo" => 30,
        "3mo" => 90,
        "6mo" => 180,
        "1y" => 365,
        "2y" => 730,
        "5y" => 1825,
        "10y" => 3650,
        "ytd" => {
            return NaiveDate::from_ymd_opt(end.year(), 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
                .ok_or_else(|| DashboardError::ConfigError(format!("Invalid range: {range}")));
        }
        "max" => 36500,
        _ => return Err(DashboardError::ConfigError(format!("Invalid range: {range}"))),
    };

    Ok(end - ChronoDuration::days(days))
}

/// Quote from the last two daily bars; previous close is the open when only one bar exists
pub fn quote_from_series(series: &Series) -> Result<Quote> {
    let bars = series.tail(2);
    let (previous, last) = match bars {
        [prev, last] => (prev.close, last),
        [last] => (last.open, last),
        _ => return Err(DashboardError::unavailable(&series.symbol, "no bars for quote")),
    };

    Ok(Quote::from_prices(
        &series.symbol,
        last.open,
        last.high,
        last.low,
        last.close,
        last.volume,
        last.date,
        previous,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_fallback_ranges() {
        let client = YahooFinanceClient::new("3mo", Duration::from_secs(5));
        assert_eq!(client.ranges(), ["3mo", "1mo", "5d"]);

        let client = YahooFinanceClient::new("1mo", Duration::from_secs(5));
        assert_eq!(client.ranges(), ["1mo", "5d"]);
    }

    #[test]
    fn test_range_start() {
        let end = DateTime::parse_from_rfc3339("2024-06-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!((end - range_start("3mo", end).unwrap()).num_days(), 90);
        assert_eq!((end - range_start("5d", end).unwrap()).num_days(), 5);
        assert_eq!(range_start("ytd", end).unwrap().date_naive(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(range_start("7w", end).is_err());
    }

    #[test]
    fn test_quote_from_series() {
        let series = Series::new(
            "AAPL",
            vec![
                Bar::new(day(7), 170.0, 172.0, 169.0, 171.0, 1_000.0),
                Bar::new(day(8), 171.0, 175.0, 170.5, 174.42, 2_000.0),
            ],
        );

        let quote = quote_from_series(&series).unwrap();
        assert_eq!(quote.price, 174.42);
        assert_eq!(quote.previous_close, 171.0);
        assert_eq!(quote.trading_day, day(8));
        assert!((quote.change - 3.42).abs() < 1e-9);
        assert!((quote.change_percent.unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_quote_from_single_bar() {
        let series = Series::new("X", vec![Bar::new(day(8), 10.0, 12.0, 9.0, 11.0, 5.0)]);
        let quote = quote_from_series(&series).unwrap();
        assert_eq!(quote.previous_close, 10.0);

        let empty = Series::new("X", vec![]);
        assert!(quote_from_series(&empty).is_err());
    }

    #[tokio::test]
    async fn test_overview_has_no_figures() {
        let overview = YahooFinanceClient::default().fetch_overview("AAPL").await.unwrap();
        assert_eq!(overview.symbol, "AAPL");
        assert!(!overview.has_figures());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_series() {
        let client = YahooFinanceClient::default();
        let series = client.fetch_series("AAPL").await.unwrap();
        assert!(!series.is_empty());
        assert_eq!(series.symbol, "AAPL");
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_quote() {
        let client = YahooFinanceClient::default();
        let quote = client.fetch_quote("MSFT").await.unwrap();
        assert!(quote.price > 0.0);
    }
}
