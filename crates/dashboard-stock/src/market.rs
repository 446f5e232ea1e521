//! Snapshot of the major market indices

use crate::api::MarketDataSource;
use crate::catalog::MARKET_INDICES;
use serde::{Deserialize, Serialize};

/// Latest level of one index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: Option<f64>,
}

/// Quote every tracked index in turn; indices that fail to load are skipped.
pub async fn overview(source: &dyn MarketDataSource) -> Vec<IndexSnapshot> {
    let mut snapshots = Vec::with_capacity(MARKET_INDICES.len());

    for (symbol, name) in MARKET_INDICES {
        match source.fetch_quote(symbol).await {
            Ok(quote) => snapshots.push(IndexSnapshot {
                name: (*name).to_string(),
                symbol: (*symbol).to_string(),
                price: quote.price,
                change: quote.change,
                change_percent: quote.change_percent,
            }),
            Err(e) => tracing::warn!(symbol, "Skipping index: {}", e),
        }
    }

    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketDataSource;
    use crate::error::DashboardError;
    use crate::models::Quote;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_overview_skips_failures() {
        let mut source = MockMarketDataSource::new();
        source.expect_fetch_quote().times(5).returning(|symbol| {
            if symbol == "^DJI" {
                return Err(DashboardError::unavailable(symbol, "down"));
            }
            let day = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
            Ok(Quote::from_prices(symbol, 100.0, 101.0, 99.0, 101.0, 0.0, day, 100.0))
        });

        let snapshots = overview(&source).await;
        assert_eq!(snapshots.len(), 4);
        assert_eq!(snapshots[0].name, "NIFTY 50");
        assert_eq!(snapshots[0].change_percent, Some(1.0));
        assert!(snapshots.iter().all(|s| s.symbol != "^DJI"));
    }
}
