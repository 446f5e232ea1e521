//! Quick technical read-out used by the chat analysis reply
//!
//! This is a lighter scoring than [`crate::engine::recommend`]: it looks at RSI
//! bands, price against SMA 20 and the SMA 20/50 cross, and it never returns
//! STRONG SELL.

use crate::catalog::{Market, display_name};
use crate::engine::Recommendation;
use crate::engine::indicators::{rsi, sma};
use crate::models::{Series, percent_change};
use dashboard_utils::format::NOT_AVAILABLE;
use dashboard_utils::{or_na, signed_percent};

const TREND_BARS: usize = 20;

/// Indicator values behind the chat analysis
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub symbol: String,
    pub price: f64,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub rsi: Option<f64>,
    /// Percent change over the last 20 bars
    pub trend_20: Option<f64>,
}

impl Snapshot {
    /// `None` for an empty series
    pub fn from_series(series: &Series) -> Option<Self> {
        let closes = series.closes();
        let price = *closes.last()?;
        let latest = |values: Vec<Option<f64>>| values.last().copied().flatten();

        let trend_20 = closes
            .len()
            .checked_sub(TREND_BARS)
            .and_then(|start| percent_change(closes[start], price));

        Some(Self {
            symbol: series.symbol.clone(),
            price,
            sma_20: latest(sma(&closes, 20)),
            sma_50: latest(sma(&closes, 50)),
            rsi: latest(rsi(&closes, 14)),
            trend_20,
        })
    }

    pub fn score(&self) -> i32 {
        outlook_score(self.price, self.sma_20, self.sma_50, self.rsi)
    }

    pub fn outlook(&self) -> Recommendation {
        outlook(self.score())
    }

    fn above_sma_20(&self) -> bool {
        self.sma_20.is_some_and(|sma| self.price > sma)
    }

    fn rsi_tag(&self) -> &'static str {
        match self.rsi {
            Some(r) if r < 30.0 => " (Oversold)",
            Some(r) if r > 70.0 => " (Overbought)",
            Some(_) => " (Neutral)",
            None => "",
        }
    }

    fn rsi_insight(&self) -> &'static str {
        match self.rsi {
            Some(r) if r < 30.0 => "oversold conditions - potential buy",
            Some(r) if r > 70.0 => "overbought conditions - caution",
            _ => "neutral momentum",
        }
    }

    /// Chat-ready analysis text
    pub fn render(&self) -> String {
        let cur = Market::of(&self.symbol).currency();
        let trend_word = if self.trend_20.is_some_and(|t| t > 0.0) {
            "Bullish"
        } else {
            "Bearish"
        };

        format!(
            r"
📊 **Analysis for {name} ({symbol})**

💰 **Current Price:** {cur}{price:.2}

**Technical Indicators:**
📈 SMA 20: {sma_20}
📈 SMA 50: {sma_50}
📊 RSI: {rsi}{rsi_tag}
📉 20-day Trend: {trend}

**AI Recommendation:** {outlook}

**Key Insights:**
• Price is {position} 20-day moving average
• RSI indicates {rsi_insight}
• {trend_word} short-term trend

⚠️ *This is for educational purposes only, not financial advice.*

Would you like more details or compare with another stock?
",
            name = display_name(&self.symbol),
            symbol = self.symbol,
            price = self.price,
            sma_20 = money(cur, self.sma_20),
            sma_50 = money(cur, self.sma_50),
            rsi = or_na(self.rsi, 2),
            rsi_tag = self.rsi_tag(),
            trend = signed_percent(self.trend_20),
            outlook = self.outlook(),
            position = if self.above_sma_20() { "above" } else { "below" },
            rsi_insight = self.rsi_insight(),
        )
    }
}

fn money(currency: &str, value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{currency}{v:.2}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// RSI < 30 +2, < 45 +1, > 70 -2; price above SMA 20 +1; SMA 20 above SMA 50 +1.
///
/// Missing values add nothing.
pub fn outlook_score(price: f64, sma_20: Option<f64>, sma_50: Option<f64>, rsi: Option<f64>) -> i32 {
    let mut score = 0;

    match rsi {
        Some(r) if r < 30.0 => score += 2,
        Some(r) if r < 45.0 => score += 1,
        Some(r) if r > 70.0 => score -= 2,
        _ => {}
    }

    if sma_20.is_some_and(|sma| price > sma) {
        score += 1;
    }

    if matches!((sma_20, sma_50), (Some(short), Some(long)) if short > long) {
        score += 1;
    }

    score
}

/// `>= 3` STRONG BUY, `>= 1` BUY, `>= -1` HOLD, otherwise SELL
pub fn outlook(score: i32) -> Recommendation {
    match score {
        s if s >= 3 => Recommendation::StrongBuy,
        s if s >= 1 => Recommendation::Buy,
        s if s >= -1 => Recommendation::Hold,
        _ => Recommendation::Sell,
    }
}
