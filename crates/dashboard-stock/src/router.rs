//! Keyword router for chat queries
//!
//! A query is lower-cased and tested against [`INTENT_TABLE`] from top to
//! bottom. The first group with a keyword contained in the query decides the
//! intent, so the order of the table is part of the behaviour: "should I buy
//! or compare" is a recommendation, not a comparison.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handler a query is dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Current price of one symbol
    Price,
    /// Technical read-out for one symbol
    Analysis,
    /// Buy/sell guidance for one symbol
    Recommendation,
    /// Side-by-side quotes for several symbols
    Comparison,
    MarketOverview,
    TopStocks,
    News,
    Help,
    /// Nothing matched
    Fallback,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Analysis => "analysis",
            Self::Recommendation => "recommendation",
            Self::Comparison => "comparison",
            Self::MarketOverview => "market-overview",
            Self::TopStocks => "top-stocks",
            Self::News => "news",
            Self::Help => "help",
            Self::Fallback => "fallback",
        }
    }

    /// Whether the handler needs a symbol from the query
    pub fn needs_symbol(&self) -> bool {
        matches!(self, Self::Price | Self::Analysis | Self::Recommendation)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Keyword groups in priority order
pub const INTENT_TABLE: &[(Intent, &[&str])] = &[
    (Intent::Price, &["price", "cost", "trading at"]),
    (Intent::Analysis, &["analyze", "analysis"]),
    (Intent::Recommendation, &["buy", "sell", "invest"]),
    (Intent::Comparison, &["compare", "vs", "versus"]),
    (Intent::MarketOverview, &["market", "markets"]),
    (Intent::TopStocks, &["top", "best"]),
    (Intent::News, &["news", "latest"]),
    (Intent::Help, &["help", "what can you"]),
];

/// Company names and tickers mapped to listing symbols, scanned in order
pub const SYMBOL_ALIASES: &[(&str, &str)] = &[
    // US
    ("APPLE", "AAPL"),
    ("AAPL", "AAPL"),
    ("MICROSOFT", "MSFT"),
    ("MSFT", "MSFT"),
    ("GOOGLE", "GOOGL"),
    ("GOOGL", "GOOGL"),
    ("AMAZON", "AMZN"),
    ("AMZN", "AMZN"),
    ("TESLA", "TSLA"),
    ("TSLA", "TSLA"),
    ("META", "META"),
    ("FACEBOOK", "META"),
    ("NVIDIA", "NVDA"),
    ("NVDA", "NVDA"),
    ("NETFLIX", "NFLX"),
    ("NFLX", "NFLX"),
    // India
    ("RELIANCE", "RELIANCE.NS"),
    ("RELIANCE.NS", "RELIANCE.NS"),
    ("TCS", "TCS.NS"),
    ("TCS.NS", "TCS.NS"),
    ("TATA", "TCS.NS"),
    ("INFOSYS", "INFY.NS"),
    ("INFY", "INFY.NS"),
    ("INFY.NS", "INFY.NS"),
    ("HDFC", "HDFCBANK.NS"),
    ("HDFCBANK", "HDFCBANK.NS"),
    ("HDFCBANK.NS", "HDFCBANK.NS"),
    ("ICICI", "ICICIBANK.NS"),
    ("ICICIBANK", "ICICIBANK.NS"),
    ("ICICIBANK.NS", "ICICIBANK.NS"),
    ("WIPRO", "WIPRO.NS"),
    ("WIPRO.NS", "WIPRO.NS"),
    ("ITC", "ITC.NS"),
    ("ITC.NS", "ITC.NS"),
    ("SBI", "SBIN.NS"),
    ("SBIN", "SBIN.NS"),
    ("SBIN.NS", "SBIN.NS"),
];

/// US tickers recognised when comparing
pub const COMPARABLE_US: &[&str] = &["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA"];

/// NSE symbols recognised by bare ticker when comparing
pub const COMPARABLE_INDIAN: &[&str] =
    &["RELIANCE.NS", "TCS.NS", "INFY.NS", "HDFCBANK.NS", "ICICIBANK.NS"];

/// Stateless query classifier
#[derive(Debug, Clone, Default)]
pub struct SmartRouter;

impl SmartRouter {
    pub fn new() -> Self {
        Self
    }

    /// Classify a query; the first matching keyword group wins
    pub fn classify(&self, query: &str) -> Intent {
        let query_lower = query.to_lowercase();
        let intent = INTENT_TABLE
            .iter()
            .find(|(_, keywords)| Self::matches_any(&query_lower, keywords))
            .map_or(Intent::Fallback, |(intent, _)| *intent);

        tracing::debug!(%intent, "Classified query");
        intent
    }

    /// Check if query contains any of the keywords
    fn matches_any(query: &str, keywords: &[&str]) -> bool {
        keywords.iter().any(|kw| query.contains(kw))
    }
}

fn is_exchange_suffixed(token: &str) -> bool {
    token.ends_with(".NS") || token.ends_with(".BO")
}

/// Upper-cased whitespace tokens with surrounding punctuation removed
fn tokens(query: &str) -> impl Iterator<Item = String> + '_ {
    query.split_whitespace().filter_map(|word| {
        let token = word
            .trim_matches(|c: char| !c.is_ascii_alphanumeric())
            .to_uppercase();
        (!token.is_empty()).then_some(token)
    })
}

/// Resolve the symbol a query is about.
///
/// The alias table is scanned first, by substring; failing that, the first
/// token carrying an `.NS` or `.BO` suffix is taken as-is.
pub fn extract_symbol(query: &str) -> Option<String> {
    let query_upper = query.to_uppercase();

    if let Some((_, symbol)) = SYMBOL_ALIASES
        .iter()
        .find(|(alias, _)| query_upper.contains(alias))
    {
        return Some((*symbol).to_string());
    }

    tokens(query).find(|token| is_exchange_suffixed(token))
}

/// Distinct symbols named in a comparison query, in order of appearance
pub fn extract_comparison_symbols(query: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();

    for token in tokens(query) {
        let resolved = if is_exchange_suffixed(&token) || COMPARABLE_US.contains(&token.as_str()) {
            Some(token)
        } else {
            let listed = format!("{token}.NS");
            COMPARABLE_INDIAN.contains(&listed.as_str()).then_some(listed)
        };

        if let Some(symbol) = resolved {
            if !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }
    }

    symbols
}
