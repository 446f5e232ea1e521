//! Market data records shared by every component
//!
//! `Series` is an ascending, de-duplicated run of daily bars for one symbol.
//! `Quote` is the typed point-in-time snapshot; `GlobalQuote` is its wire form
//! with the numbered string keys that formatting call sites depend on.
//! `CompanyOverview` carries the fundamentals shown in comparisons.

use crate::error::{DashboardError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Ordered bars for a single symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub symbol: String,
    bars: Vec<Bar>,
}

impl Series {
    /// Build a series, sorting by date and keeping the last bar for a repeated date.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        // Stable sort keeps arrival order among equal dates, so the later one survives.
        bars.sort_by_key(|bar| bar.date);
        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self {
            symbol: symbol.into(),
            bars: deduped,
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Closing prices in date order
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|bar| bar.close)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|bar| bar.date)
    }

    /// The most recent `n` bars (all of them when `n` exceeds the length)
    pub fn tail(&self, n: usize) -> &[Bar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }
}

/// Point-in-time quote snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub price: f64,
    pub volume: f64,
    pub trading_day: NaiveDate,
    pub previous_close: f64,
    pub change: f64,
    /// Undefined when the previous close is zero
    pub change_percent: Option<f64>,
}

impl Quote {
    /// Build a quote from price fields, deriving change and change percent.
    #[allow(clippy::too_many_arguments)]
    pub fn from_prices(
        symbol: impl Into<String>,
        open: f64,
        high: f64,
        low: f64,
        price: f64,
        volume: f64,
        trading_day: NaiveDate,
        previous_close: f64,
    ) -> Self {
        let change = price - previous_close;
        Self {
            symbol: symbol.into(),
            open,
            high,
            low,
            price,
            volume,
            trading_day,
            previous_close,
            change,
            change_percent: percent_change(previous_close, price),
        }
    }
}

/// Company fundamentals; providers fill in what they know
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyOverview {
    pub symbol: String,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
}

impl CompanyOverview {
    /// Overview with nothing but the symbol
    pub fn unknown(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            sector: None,
            industry: None,
            market_cap: None,
            pe_ratio: None,
            dividend_yield: None,
        }
    }

    /// Whether market cap or P/E is known
    pub fn has_figures(&self) -> bool {
        self.market_cap.is_some() || self.pe_ratio.is_some()
    }
}

/// `(to - from) / from * 100`, undefined when `from` is zero
pub fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        None
    } else {
        Some((to - from) / from * 100.0)
    }
}

/// Quote in the provider wire format
///
/// Field names are the literal keys used by the `GLOBAL_QUOTE` payload; every
/// value is a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    pub symbol: String,
    #[serde(rename = "02. open")]
    pub open: String,
    #[serde(rename = "03. high")]
    pub high: String,
    #[serde(rename = "04. low")]
    pub low: String,
    #[serde(rename = "05. price")]
    pub price: String,
    #[serde(rename = "06. volume")]
    pub volume: String,
    #[serde(rename = "07. latest trading day")]
    pub latest_trading_day: String,
    #[serde(rename = "08. previous close")]
    pub previous_close: String,
    #[serde(rename = "09. change")]
    pub change: String,
    #[serde(rename = "10. change percent")]
    pub change_percent: String,
}

impl From<&Quote> for GlobalQuote {
    fn from(quote: &Quote) -> Self {
        Self {
            symbol: quote.symbol.clone(),
            open: quote.open.to_string(),
            high: quote.high.to_string(),
            low: quote.low.to_string(),
            price: quote.price.to_string(),
            volume: quote.volume.to_string(),
            latest_trading_day: quote.trading_day.format("%Y-%m-%d").to_string(),
            previous_close: quote.previous_close.to_string(),
            change: quote.change.to_string(),
            change_percent: match quote.change_percent {
                Some(pct) => format!("{pct:.2}%"),
                None => "nan%".to_string(),
            },
        }
    }
}

impl TryFrom<GlobalQuote> for Quote {
    type Error = DashboardError;

    fn try_from(wire: GlobalQuote) -> Result<Self> {
        let change_percent = wire
            .change_percent
            .trim()
            .trim_end_matches('%')
            .parse::<f64>()
            .ok()
            .filter(|pct| pct.is_finite());

        Ok(Self {
            open: parse_field("02. open", &wire.open)?,
            high: parse_field("03. high", &wire.high)?,
            low: parse_field("04. low", &wire.low)?,
            price: parse_field("05. price", &wire.price)?,
            volume: parse_field("06. volume", &wire.volume)?,
            trading_day: NaiveDate::parse_from_str(&wire.latest_trading_day, "%Y-%m-%d").map_err(
                |_| DashboardError::MalformedQuote {
                    field: "07. latest trading day",
                    value: wire.latest_trading_day.clone(),
                },
            )?,
            previous_close: parse_field("08. previous close", &wire.previous_close)?,
            change: parse_field("09. change", &wire.change)?,
            change_percent,
            symbol: wire.symbol,
        })
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| DashboardError::MalformedQuote {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_series_sorts_and_dedupes() {
        let series = Series::new(
            "AAPL",
            vec![
                Bar::new(day(5), 1.0, 1.0, 1.0, 3.0, 10.0),
                Bar::new(day(4), 1.0, 1.0, 1.0, 2.0, 10.0),
                Bar::new(day(5), 1.0, 1.0, 1.0, 4.0, 10.0),
            ],
        );

        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![2.0, 4.0]);
        assert_eq!(series.last_date(), Some(day(5)));
    }

    #[test]
    fn test_series_tail() {
        let bars = (1..=5)
            .map(|d| Bar::new(day(d), 1.0, 1.0, 1.0, f64::from(d), 1.0))
            .collect();
        let series = Series::new("X", bars);

        assert_eq!(series.tail(2).len(), 2);
        assert_eq!(series.tail(2)[0].close, 4.0);
        assert_eq!(series.tail(50).len(), 5);
    }

    #[test]
    fn test_percent_change_zero_base() {
        assert_eq!(percent_change(0.0, 10.0), None);
        assert_eq!(percent_change(100.0, 110.0), Some(10.0));
    }

    #[test]
    fn test_global_quote_keys() {
        let quote = Quote::from_prices("AAPL", 100.0, 105.0, 99.0, 104.0, 1000.0, day(8), 100.0);
        let value = serde_json::to_value(GlobalQuote::from(&quote)).unwrap();

        assert_eq!(value["01. symbol"], "AAPL");
        assert_eq!(value["05. price"], "104");
        assert_eq!(value["07. latest trading day"], "2024-03-08");
        assert_eq!(value["09. change"], "4");
        assert_eq!(value["10. change percent"], "4.00%");
        assert_eq!(value.as_object().unwrap().len(), 10);
    }

    #[test]
    fn test_quote_from_alpha_vantage_payload() {
        let payload = serde_json::json!({
            "01. symbol": "IBM",
            "02. open": "168.1000",
            "03. high": "169.9800",
            "04. low": "167.5200",
            "05. price": "169.3100",
            "06. volume": "3409612",
            "07. latest trading day": "2024-03-08",
            "08. previous close": "167.8900",
            "09. change": "1.4200",
            "10. change percent": "0.8458%"
        });

        let wire: GlobalQuote = serde_json::from_value(payload).unwrap();
        let quote = Quote::try_from(wire).unwrap();

        assert_eq!(quote.symbol, "IBM");
        assert_eq!(quote.price, 169.31);
        assert_eq!(quote.volume, 3_409_612.0);
        assert_eq!(quote.change_percent, Some(0.8458));
    }

    #[test]
    fn test_malformed_quote_is_error() {
        let quote = Quote::from_prices("AAPL", 1.0, 1.0, 1.0, 1.0, 1.0, day(8), 1.0);
        let mut wire = GlobalQuote::from(&quote);
        wire.price = "n/a".to_string();

        assert!(matches!(
            Quote::try_from(wire),
            Err(DashboardError::MalformedQuote { field: "05. price", .. })
        ));
    }

    #[test]
    fn test_undefined_change_percent_survives_wire() {
        let quote = Quote::from_prices("NEW", 1.0, 1.0, 1.0, 5.0, 1.0, day(8), 0.0);
        let wire = GlobalQuote::from(&quote);
        assert_eq!(wire.change_percent, "nan%");

        let back = Quote::try_from(wire).unwrap();
        assert_eq!(back.change_percent, None);
    }
}
