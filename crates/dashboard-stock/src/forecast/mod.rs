//! Price forecasting
//!
//! Two strategies share one result type: an autoregressive tree ensemble
//! ([`autoregressive`]) and a straight-line trend fit ([`linear`]). Both return
//! `None` when the history is too short to fit.

pub mod autoregressive;
pub mod calendar;
pub mod forest;
pub mod linear;

pub use autoregressive::AutoregressiveForecaster;
pub use forest::ForestRegressor;
pub use linear::linear_forecast;

use crate::config::ForecastConfig;
use crate::error::DashboardError;
use crate::models::{Series, percent_change};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution};
use std::fmt;
use std::str::FromStr;

/// Bars required before a confidence figure is reported
pub const CONFIDENCE_MIN_BARS: usize = 50;

/// A predicted close on a future business day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Output of either forecasting strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub points: Vec<ForecastPoint>,
    /// Last observed close
    pub current_price: f64,
    /// Change from the current price to the final point, in percent
    pub predicted_change_percent: Option<f64>,
}

impl ForecastResult {
    /// Collect `(date, price)` pairs into a result.
    ///
    /// With no points the predicted change is zero.
    pub fn new(current_price: f64, points: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let points: Vec<ForecastPoint> = points
            .into_iter()
            .map(|(date, price)| ForecastPoint { date, price })
            .collect();

        let predicted_change_percent = match points.last() {
            Some(last) => percent_change(current_price, last.price),
            None => Some(0.0),
        };

        Self {
            points,
            current_price,
            predicted_change_percent,
        }
    }

    /// Final predicted price, if any points were produced
    pub fn final_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }
}

/// Forecasting strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMethod {
    /// Autoregressive tree ensemble
    #[default]
    Forest,
    /// Least-squares trend line
    Linear,
}

impl FromStr for ForecastMethod {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forest" | "rf" | "random-forest" | "random_forest" => Ok(Self::Forest),
            "linear" | "trend" => Ok(Self::Linear),
            other => Err(DashboardError::ConfigError(format!(
                "Unknown forecast method: {other}"
            ))),
        }
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forest => write!(f, "forest"),
            Self::Linear => write!(f, "linear"),
        }
    }
}

/// Forecast `horizon` business days with the chosen strategy
pub fn run(
    method: ForecastMethod,
    series: &Series,
    horizon: usize,
    config: &ForecastConfig,
) -> Option<ForecastResult> {
    tracing::info!(symbol = %series.symbol, %method, horizon, "Running forecast");
    match method {
        ForecastMethod::Forest => AutoregressiveForecaster::new(config).forecast(series, horizon),
        ForecastMethod::Linear => linear_forecast(series, horizon, config.linear_window),
    }
}

/// Heuristic confidence (0-100) from the volatility of daily returns.
///
/// Zero when fewer than [`CONFIDENCE_MIN_BARS`] bars are available.
pub fn prediction_confidence(series: &Series) -> u8 {
    if series.len() < CONFIDENCE_MIN_BARS {
        return 0;
    }

    let returns: Vec<f64> = series
        .bars()
        .windows(2)
        .filter_map(|w| percent_change(w[0].close, w[1].close).map(|pct| pct / 100.0))
        .collect();
    if returns.len() < 2 {
        return 0;
    }
    let Some(volatility) = Data::new(returns).std_dev() else {
        return 0;
    };

    match volatility {
        v if v < 0.02 => 85,
        v if v < 0.03 => 70,
        v if v < 0.05 => 55,
        _ => 40,
    }
}
