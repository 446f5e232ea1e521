//! Stock chatbot
//!
//! Free-text questions are classified by [`SmartRouter`] and answered by
//! exactly one handler. Handlers that need market data go through the
//! injected [`MarketDataSource`]; a failing fetch turns into an apology in the
//! reply, never into an error for the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use dashboard_stock::api::HybridSource;
//! use dashboard_stock::bot::{ChatSession, StockChatbot};
//! use dashboard_stock::config::DashboardConfig;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let source = HybridSource::from_config(&DashboardConfig::from_env()?)?;
//!     let bot = StockChatbot::new(Arc::new(source));
//!     let mut session = ChatSession::new();
//!     println!("{}", bot.converse(&mut session, "What's the price of AAPL?").await);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod commands;
pub mod replies;
pub mod session;

pub use analysis::Snapshot;
pub use commands::Command;
pub use session::{ChatSession, ChatTurn, Role};

use crate::api::MarketDataSource;
use crate::catalog::{Market, display_name};
use crate::error::{DashboardError, Result};
use crate::models::{CompanyOverview, Quote};
use crate::router::{Intent, SmartRouter, extract_comparison_symbols, extract_symbol};
use dashboard_utils::format::NOT_AVAILABLE;
use dashboard_utils::{or_na, signed, signed_percent, thousands};
use std::sync::Arc;

/// Most symbols shown in one comparison
pub const MAX_COMPARED: usize = 3;

/// Keyword-routed stock chatbot
#[derive(Clone)]
pub struct StockChatbot {
    source: Arc<dyn MarketDataSource>,
    router: SmartRouter,
}

impl StockChatbot {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            source,
            router: SmartRouter::new(),
        }
    }

    pub fn router(&self) -> &SmartRouter {
        &self.router
    }

    /// Answer one query. Never fails; errors become an apology text.
    pub async fn respond(&self, text: &str) -> String {
        let intent = self.router.classify(text);
        tracing::info!(%intent, "Handling chat query");

        match self.dispatch(intent, text).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(%intent, "Chat handler failed: {}", e);
                format!(
                    "⚠️ Sorry, I encountered an error: {e}\n\nPlease try rephrasing your question or ask for help."
                )
            }
        }
    }

    /// Record the query, answer it, and record the answer
    pub async fn converse(&self, session: &mut ChatSession, text: &str) -> String {
        session.push(Role::User, text);
        let reply = self.respond(text).await;
        session.push(Role::Assistant, reply.clone());
        reply
    }

    async fn dispatch(&self, intent: Intent, text: &str) -> Result<String> {
        match intent {
            Intent::Price => Ok(self.price_reply(text).await),
            Intent::Analysis => Ok(self.analysis_reply(text).await),
            Intent::Recommendation => Ok(self.recommendation_reply(text).await),
            Intent::Comparison => self.comparison_reply(text).await,
            Intent::MarketOverview => Ok(replies::MARKET_OVERVIEW.to_string()),
            Intent::TopStocks => Ok(top_stocks_reply(text).to_string()),
            Intent::News => Ok(replies::NEWS.to_string()),
            Intent::Help => Ok(replies::HELP.to_string()),
            Intent::Fallback => Ok(replies::FALLBACK.to_string()),
        }
    }

    async fn price_reply(&self, text: &str) -> String {
        let Some(symbol) = extract_symbol(text) else {
            return replies::ASK_PRICE_SYMBOL.to_string();
        };

        match self.source.fetch_quote(&symbol).await {
            Ok(quote) => render_quote(&quote),
            Err(e) => {
                tracing::warn!(symbol = %symbol, "Price lookup failed: {}", e);
                format!(
                    "❌ Sorry, I couldn't fetch the price for {symbol}. Please check the symbol and try again."
                )
            }
        }
    }

    async fn analysis_reply(&self, text: &str) -> String {
        let Some(symbol) = extract_symbol(text) else {
            return replies::ASK_ANALYSIS_SYMBOL.to_string();
        };
        self.analyze(&symbol).await
    }

    async fn analyze(&self, symbol: &str) -> String {
        let series = match self.source.fetch_series(symbol).await {
            Ok(series) => series,
            Err(DashboardError::DataUnavailable { .. }) => {
                return format!("❌ No data available for {symbol}");
            }
            Err(e) => return format!("❌ Error analyzing {symbol}: {e}"),
        };

        match Snapshot::from_series(&series) {
            Some(snapshot) => snapshot.render(),
            None => format!("❌ No data available for {symbol}"),
        }
    }

    async fn recommendation_reply(&self, text: &str) -> String {
        let Some(symbol) = extract_symbol(text) else {
            return replies::ASK_RECOMMENDATION_SYMBOL.to_string();
        };
        let mut reply = self.analyze(&symbol).await;
        reply.push_str(replies::DISCLAIMER);
        reply
    }

    async fn comparison_reply(&self, text: &str) -> Result<String> {
        let symbols = extract_comparison_symbols(text);
        if symbols.len() < 2 {
            return Ok(replies::COMPARISON_USAGE.to_string());
        }

        self.compare(&symbols[..symbols.len().min(MAX_COMPARED)]).await
    }

    async fn compare(&self, symbols: &[String]) -> Result<String> {
        let mut quotes = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            quotes.push(self.source.fetch_quote(symbol).await?);
        }

        let mut reply = String::from("📊 **Stock Comparison**\n\n");
        for quote in &quotes {
            let overview = self.overview(&quote.symbol).await;
            let cur = Market::of(&quote.symbol).currency();
            reply.push_str(&format!(
                "\n**{name} ({symbol})**\n💰 Price: {cur}{price:.2}\n{marker} Change: {change}\n🏢 Market Cap: {market_cap}\n📊 P/E Ratio: {pe}\n\n---\n",
                name = display_name(&quote.symbol),
                symbol = quote.symbol,
                price = quote.price,
                marker = change_marker(quote.change),
                change = signed_percent(quote.change_percent),
                market_cap = billions(cur, overview.market_cap),
                pe = or_na(overview.pe_ratio, 2),
            ));
        }

        if let Some(best) = best_performer(&quotes) {
            reply.push_str(&format!(
                "\n🏆 **Best Performer:** {} ({})",
                best.symbol,
                signed_percent(best.change_percent)
            ));
        }

        Ok(reply)
    }

    /// Fundamentals are optional in a comparison; failures leave them unset
    async fn overview(&self, symbol: &str) -> CompanyOverview {
        self.source.fetch_overview(symbol).await.unwrap_or_else(|e| {
            tracing::warn!(symbol, "Overview lookup failed: {}", e);
            CompanyOverview::unknown(symbol)
        })
    }
}

impl std::fmt::Debug for StockChatbot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockChatbot").finish_non_exhaustive()
    }
}

fn change_marker(change: f64) -> &'static str {
    if change >= 0.0 { "🟢" } else { "🔴" }
}

fn billions(currency: &str, value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{currency}{:.2}B", v / 1e9),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Quote with the highest percent change; undefined changes rank last and
/// the earliest quote wins a tie
pub fn best_performer(quotes: &[Quote]) -> Option<&Quote> {
    let rank = |q: &Quote| q.change_percent.unwrap_or(f64::NEG_INFINITY);
    quotes.iter().fold(None, |best: Option<&Quote>, q| match best {
        Some(b) if rank(q) <= rank(b) => Some(b),
        _ => Some(q),
    })
}

fn top_stocks_reply(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    if replies::INDIAN_MARKERS.iter().any(|m| lower.contains(m)) {
        replies::TOP_INDIAN_STOCKS
    } else {
        replies::TOP_US_STOCKS
    }
}

fn render_quote(quote: &Quote) -> String {
    let cur = Market::of(&quote.symbol).currency();
    format!(
        r"
📊 **{name} ({symbol})**

💰 **Current Price:** {cur}{price:.2}
{marker} **Change:** {cur}{change} ({change_percent})
📈 **Day High:** {cur}{high}
📉 **Day Low:** {cur}{low}
📦 **Volume:** {volume}

🕐 Last updated: {updated}

Would you like me to analyze this stock or get more details?
",
        name = display_name(&quote.symbol),
        symbol = quote.symbol,
        price = quote.price,
        marker = change_marker(quote.change),
        change = signed(quote.change, 2),
        change_percent = signed_percent(quote.change_percent),
        high = or_na(Some(quote.high), 2),
        low = or_na(Some(quote.low), 2),
        volume = thousands(quote.volume),
        updated = chrono::Local::now().format("%I:%M %p"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketDataSource;
    use crate::models::{Bar, Series};
    use chrono::{Days, NaiveDate};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()
    }

    fn quote(symbol: &str, price: f64, previous_close: f64) -> Quote {
        Quote::from_prices(symbol, previous_close, price + 1.0, price - 1.0, price, 1_234_567.0, day(), previous_close)
    }

    fn rising_series(symbol: &str, n: u32) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let date = start.checked_add_days(Days::new(u64::from(i))).unwrap();
                let c = 100.0 + f64::from(i);
                Bar::new(date, c, c, c, c, 1.0)
            })
            .collect();
        Series::new(symbol, bars)
    }

    fn bot_with(source: MockMarketDataSource) -> StockChatbot {
        StockChatbot::new(Arc::new(source))
    }

    #[tokio::test]
    async fn test_price_reply() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_quote()
            .withf(|symbol| symbol == "AAPL")
            .times(1)
            .returning(|symbol| Ok(quote(symbol, 174.42, 171.0)));

        let reply = bot_with(source).respond("What's the price of AAPL?").await;
        assert!(reply.contains("Apple Inc. (AAPL)"));
        assert!(reply.contains("**Current Price:** $174.42"));
        assert!(reply.contains("🟢 **Change:** $+3.42 (+2.00%)"));
        assert!(reply.contains("**Volume:** 1,234,567"));
    }

    #[tokio::test]
    async fn test_price_reply_fetch_failure() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_quote()
            .returning(|symbol| Err(DashboardError::unavailable(symbol, "down")));

        let reply = bot_with(source).respond("price of TCS").await;
        assert_eq!(
            reply,
            "❌ Sorry, I couldn't fetch the price for TCS.NS. Please check the symbol and try again."
        );
    }

    #[tokio::test]
    async fn test_missing_symbol_prompts() {
        let source = MockMarketDataSource::new();
        let bot = bot_with(source);

        assert_eq!(bot.respond("what's the price?").await, replies::ASK_PRICE_SYMBOL);
        assert_eq!(bot.respond("analyze something").await, replies::ASK_ANALYSIS_SYMBOL);
        assert_eq!(bot.respond("should I invest").await, replies::ASK_RECOMMENDATION_SYMBOL);
    }

    #[tokio::test]
    async fn test_static_replies_do_not_fetch() {
        let mut source = MockMarketDataSource::new();
        source.expect_fetch_quote().never();
        source.expect_fetch_series().never();
        let bot = bot_with(source);

        assert_eq!(bot.respond("hello").await, replies::FALLBACK);
        assert_eq!(bot.respond("help").await, replies::HELP);
        assert_eq!(bot.respond("Market overview").await, replies::MARKET_OVERVIEW);
        assert_eq!(bot.respond("any news?").await, replies::NEWS);
        assert_eq!(bot.respond("top indian stocks").await, replies::TOP_INDIAN_STOCKS);
        assert_eq!(bot.respond("best tech stocks").await, replies::TOP_US_STOCKS);
    }

    #[tokio::test]
    async fn test_analysis_reply() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_series()
            .withf(|symbol| symbol == "RELIANCE.NS")
            .returning(|symbol| Ok(rising_series(symbol, 60)));

        let reply = bot_with(source).respond("Analyze RELIANCE").await;
        assert!(reply.contains("Analysis for Reliance Industries Ltd (RELIANCE.NS)"));
        assert!(reply.contains("**AI Recommendation:** 🟢 BUY"));
        assert!(!reply.contains("Important Disclaimer"));
    }

    #[tokio::test]
    async fn test_recommendation_appends_disclaimer() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_series()
            .returning(|symbol| Ok(rising_series(symbol, 60)));

        let reply = bot_with(source).respond("Should I buy TCS?").await;
        assert!(reply.contains("(TCS.NS)"));
        assert!(reply.ends_with(replies::DISCLAIMER));
    }

    #[tokio::test]
    async fn test_analysis_without_data() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_series()
            .returning(|symbol| Err(DashboardError::unavailable(symbol, "empty")));

        let reply = bot_with(source).respond("analysis of INFY").await;
        assert_eq!(reply, "❌ No data available for INFY.NS");
    }

    #[tokio::test]
    async fn test_comparison_reply() {
        let mut source = MockMarketDataSource::new();
        source.expect_fetch_quote().times(2).returning(|symbol| match symbol {
            "AAPL" => Ok(quote(symbol, 101.0, 100.0)),
            _ => Ok(quote(symbol, 105.0, 100.0)),
        });
        source.expect_fetch_overview().times(2).returning(|symbol| match symbol {
            "AAPL" => Ok(CompanyOverview {
                market_cap: Some(2_650_000_000_000.0),
                pe_ratio: Some(28.5),
                ..CompanyOverview::unknown(symbol)
            }),
            _ => Err(DashboardError::RateLimitExceeded { provider: "Alpha Vantage".to_string() }),
        });

        let reply = bot_with(source).respond("Compare AAPL and MSFT").await;
        assert!(reply.starts_with("📊 **Stock Comparison**"));
        assert!(reply.contains(
            "**Apple Inc. (AAPL)**\n💰 Price: $101.00\n🟢 Change: +1.00%\n🏢 Market Cap: $2650.00B\n📊 P/E Ratio: 28.50\n"
        ));
        assert!(reply.contains(
            "**Microsoft Corporation (MSFT)**\n💰 Price: $105.00\n🟢 Change: +5.00%\n🏢 Market Cap: N/A\n📊 P/E Ratio: N/A\n"
        ));
        assert!(reply.ends_with("🏆 **Best Performer:** MSFT (+5.00%)"));
    }

    #[tokio::test]
    async fn test_comparison_tie_names_first_symbol() {
        let mut source = MockMarketDataSource::new();
        source.expect_fetch_quote().times(2).returning(|symbol| match symbol {
            "AAPL" => Ok(quote(symbol, 101.0, 100.0)),
            _ => Ok(quote(symbol, 202.0, 200.0)),
        });
        source
            .expect_fetch_overview()
            .returning(|symbol| Ok(CompanyOverview::unknown(symbol)));

        let reply = bot_with(source).respond("Compare AAPL and MSFT").await;
        assert!(reply.ends_with("🏆 **Best Performer:** AAPL (+1.00%)"));
    }

    #[tokio::test]
    async fn test_comparison_limits_and_usage() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_quote()
            .times(3)
            .returning(|symbol| Ok(quote(symbol, 100.0, 100.0)));
        source
            .expect_fetch_overview()
            .times(3)
            .returning(|symbol| Ok(CompanyOverview::unknown(symbol)));
        let bot = bot_with(source);

        let reply = bot.respond("compare AAPL MSFT GOOGL NVDA").await;
        assert!(!reply.contains("NVDA"));

        assert_eq!(bot.respond("compare AAPL").await, replies::COMPARISON_USAGE);
    }

    #[tokio::test]
    async fn test_comparison_fetch_error() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_quote()
            .returning(|_| Err(DashboardError::RateLimitExceeded { provider: "Alpha Vantage".to_string() }));

        let reply = bot_with(source).respond("TCS vs INFY").await;
        assert_eq!(
            reply,
            "⚠️ Sorry, I encountered an error: Rate limit exceeded for Alpha Vantage\n\nPlease try rephrasing your question or ask for help."
        );
    }

    #[tokio::test]
    async fn test_converse_records_turns() {
        let source = MockMarketDataSource::new();
        let bot = bot_with(source);
        let mut session = ChatSession::new();

        let reply = bot.converse(&mut session, "help").await;
        assert_eq!(session.len(), 2);
        assert_eq!(session.turns()[0].role, Role::User);
        assert_eq!(session.turns()[0].text, "help");
        assert_eq!(session.turns()[1].role, Role::Assistant);
        assert_eq!(session.turns()[1].text, reply);
    }

    #[test]
    fn test_best_performer() {
        let mut flat = quote("A", 100.0, 100.0);
        flat.change_percent = None;
        let quotes = vec![flat, quote("B", 99.0, 100.0)];
        assert_eq!(best_performer(&quotes).unwrap().symbol, "B");
        assert!(best_performer(&[]).is_none());
    }

    #[test]
    fn test_best_performer_keeps_first_on_tie() {
        let quotes = vec![quote("AAPL", 101.0, 100.0), quote("MSFT", 202.0, 200.0), quote("GOOGL", 99.0, 100.0)];
        assert_eq!(best_performer(&quotes).unwrap().symbol, "AAPL");

        let mut undefined = quote("X", 1.0, 1.0);
        undefined.change_percent = None;
        let mut also_undefined = quote("Y", 1.0, 1.0);
        also_undefined.change_percent = None;
        assert_eq!(best_performer(&[undefined, also_undefined]).unwrap().symbol, "X");
    }
}
