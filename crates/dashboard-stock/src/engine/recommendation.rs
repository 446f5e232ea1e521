//! Threshold-based recommendation scoring

use crate::engine::indicators::{IndicatorFrame, IndicatorRow};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum frame length before a recommendation is produced
pub const MIN_ROWS: usize = 50;

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;

/// Discrete recommendation, ordered from most bearish to most bullish
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongSell,
    Sell,
    Hold,
    Buy,
    StrongBuy,
}

impl Recommendation {
    /// Map a summed signal score to a label.
    ///
    /// Checked in order: `>= 3`, `>= 1`, `<= -3`, `<= -1`, otherwise hold.
    pub fn from_score(score: i32) -> Self {
        if score >= 3 {
            Self::StrongBuy
        } else if score >= 1 {
            Self::Buy
        } else if score <= -3 {
            Self::StrongSell
        } else if score <= -1 {
            Self::Sell
        } else {
            Self::Hold
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::StrongSell => "STRONG SELL",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
            Self::Buy => "BUY",
            Self::StrongBuy => "STRONG BUY",
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Self::StrongSell | Self::Sell => "🔴",
            Self::Hold => "🟡",
            Self::Buy | Self::StrongBuy => "🟢",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.marker(), self.label())
    }
}

/// Display text for an optional recommendation
pub fn describe(recommendation: Option<Recommendation>) -> String {
    recommendation.map_or_else(|| "Insufficient Data".to_string(), |r| r.to_string())
}

// Comparisons with a missing operand are false, like NaN comparisons.
fn lt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

fn gt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

/// Sum of the independent signals on one row
pub fn signal_score(row: &IndicatorRow) -> i32 {
    let close = Some(row.close());
    let mut score = 0;

    if lt(row.rsi, Some(RSI_OVERSOLD)) {
        score += 2;
    } else if gt(row.rsi, Some(RSI_OVERBOUGHT)) {
        score -= 2;
    }

    if gt(row.macd, row.signal_line) {
        score += 1;
    } else {
        score -= 1;
    }

    if gt(close, row.sma_20) {
        score += 1;
    } else {
        score -= 1;
    }

    if lt(close, row.bb_lower) {
        score += 1;
    } else if gt(close, row.bb_upper) {
        score -= 1;
    }

    score
}

/// Recommendation for the latest row, or `None` below [`MIN_ROWS`] rows
pub fn recommend(frame: &IndicatorFrame) -> Option<Recommendation> {
    if frame.len() < MIN_ROWS {
        return None;
    }

    let latest = frame.latest()?;
    let score = signal_score(latest);
    tracing::debug!(symbol = %frame.symbol, score, "Scored latest indicators");
    Some(Recommendation::from_score(score))
}
