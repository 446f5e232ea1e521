//! Autoregressive forecasting with a tree ensemble
//!
//! Each training example maps `lookback` consecutive closes to the next close.
//! Forecasting is iterative: every predicted value is pushed into the input
//! window for the following step, so later steps build on earlier predictions
//! rather than on observed prices.

use super::ForecastResult;
use super::calendar;
use super::forest::ForestRegressor;
use crate::config::ForecastConfig;
use crate::models::Series;
use std::collections::VecDeque;

/// Fewest sliding-window examples the ensemble is trained on
pub const MIN_TRAINING_EXAMPLES: usize = 20;

/// Supervised examples built from a price series
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedExamples {
    pub features: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl WindowedExamples {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Slide a `lookback`-wide window over `closes`.
///
/// Needs at least `lookback + 1` closes.
pub fn sliding_windows(closes: &[f64], lookback: usize) -> Option<WindowedExamples> {
    if lookback == 0 || closes.len() < lookback + 1 {
        return None;
    }

    let (features, targets) = closes
        .windows(lookback + 1)
        .map(|w| (w[..lookback].to_vec(), w[lookback]))
        .unzip();

    Some(WindowedExamples { features, targets })
}

/// A fitted ensemble plus its fit quality on the chronological split
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub forest: ForestRegressor,
    /// R² on the training portion
    pub train_score: Option<f64>,
    /// R² on the held-out tail
    pub holdout_score: Option<f64>,
}

/// Tree-ensemble forecaster over a trailing price window
#[derive(Debug, Clone)]
pub struct AutoregressiveForecaster {
    lookback: usize,
    trees: usize,
    seed: u64,
    train_fraction: f64,
}

impl Default for AutoregressiveForecaster {
    fn default() -> Self {
        Self::new(&ForecastConfig::default())
    }
}

impl AutoregressiveForecaster {
    pub fn new(config: &ForecastConfig) -> Self {
        Self {
            lookback: config.lookback,
            trees: config.trees,
            seed: config.seed,
            train_fraction: config.train_fraction,
        }
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Train on the first part of the examples, in time order, and score on the rest.
    pub fn train(&self, closes: &[f64]) -> Option<TrainedModel> {
        let examples = sliding_windows(closes, self.lookback)?;
        if examples.len() < MIN_TRAINING_EXAMPLES {
            tracing::debug!(
                examples = examples.len(),
                required = MIN_TRAINING_EXAMPLES,
                "Too few training examples"
            );
            return None;
        }

        let split = ((examples.len() as f64 * self.train_fraction) as usize).clamp(1, examples.len());
        let (train_x, test_x) = examples.features.split_at(split);
        let (train_y, test_y) = examples.targets.split_at(split);

        let forest = match ForestRegressor::fit(train_x, train_y, self.trees, self.seed) {
            Ok(forest) => forest,
            Err(e) => {
                tracing::warn!("Forest training failed: {}", e);
                return None;
            }
        };

        let train_score = forest.score(train_x, train_y);
        let holdout_score = forest.score(test_x, test_y);
        tracing::debug!(?train_score, ?holdout_score, train = split, "Trained forecast ensemble");

        Some(TrainedModel {
            forest,
            train_score,
            holdout_score,
        })
    }

    /// Forecast `horizon` business days past the end of `series`.
    ///
    /// Returns `None` when the series is too short to build and train on
    /// sliding windows.
    pub fn forecast(&self, series: &Series, horizon: usize) -> Option<ForecastResult> {
        let closes = series.closes();
        if closes.len() < self.lookback + 1 {
            tracing::debug!(
                symbol = %series.symbol,
                bars = closes.len(),
                "Too few bars for autoregressive forecast"
            );
            return None;
        }

        let model = self.train(&closes)?;
        let mut window: VecDeque<f64> = closes[closes.len() - self.lookback..].iter().copied().collect();

        let mut prices = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            let input: Vec<f64> = window.iter().copied().collect();
            let predicted = model.forest.predict(&input);
            prices.push(predicted);
            window.pop_front();
            window.push_back(predicted);
        }

        let dates = calendar::next_business_days(series.last_date()?, horizon);
        Some(ForecastResult::new(series.last_close()?, dates.into_iter().zip(prices)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bar;
    use approx::assert_relative_eq;
    use chrono::{Days, NaiveDate};

    fn series_from(closes: &[f64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let date = start.checked_add_days(Days::new(i as u64)).unwrap();
                Bar::new(date, c, c, c, c, 1.0)
            })
            .collect();
        Series::new("AR", bars)
    }

    fn small_forecaster() -> AutoregressiveForecaster {
        AutoregressiveForecaster::new(&ForecastConfig {
            lookback: 5,
            trees: 15,
            ..ForecastConfig::default()
        })
    }

    #[test]
    fn test_sliding_windows() {
        let examples = sliding_windows(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert_eq!(examples.features, vec![vec![1.0, 2.0, 3.0], vec![2.0, 3.0, 4.0]]);
        assert_eq!(examples.targets, vec![4.0, 5.0]);

        assert!(sliding_windows(&[1.0, 2.0, 3.0], 3).is_none());
        assert_eq!(sliding_windows(&[1.0, 2.0, 3.0, 4.0], 3).unwrap().len(), 1);
    }

    #[test]
    fn test_insufficient_history() {
        let forecaster = small_forecaster();
        // 5 bars < lookback + 1
        assert!(forecaster.forecast(&series_from(&[1.0; 5]), 3).is_none());
        // 24 bars -> 19 examples, below the training minimum
        assert!(forecaster.forecast(&series_from(&[1.0; 24]), 3).is_none());
        // 25 bars -> 20 examples
        assert!(forecaster.forecast(&series_from(&[1.0; 25]), 3).is_some());
    }

    #[test]
    fn test_constant_series_forecasts_constant() {
        let result = small_forecaster()
            .forecast(&series_from(&[42.0; 40]), 4)
            .unwrap();

        assert_eq!(result.points.len(), 4);
        for point in &result.points {
            assert_relative_eq!(point.price, 42.0);
        }
        assert_relative_eq!(result.predicted_change_percent.unwrap(), 0.0);
    }

    #[test]
    fn test_zero_horizon_keeps_current_price() {
        let closes: Vec<f64> = (0..40).map(|i| 10.0 + f64::from(i)).collect();
        let result = small_forecaster().forecast(&series_from(&closes), 0).unwrap();

        assert!(result.points.is_empty());
        assert_eq!(result.current_price, 49.0);
        assert_eq!(result.predicted_change_percent, Some(0.0));
    }

    #[test]
    fn test_forecast_is_deterministic() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (f64::from(i) * 0.3).sin() * 5.0 + f64::from(i) * 0.2)
            .collect();
        let series = series_from(&closes);
        let forecaster = small_forecaster();

        let a = forecaster.forecast(&series, 5).unwrap();
        let b = forecaster.forecast(&series, 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_predictions_within_observed_range() {
        // tree leaves average observed targets, so even compounded steps
        // cannot leave the training range
        let closes: Vec<f64> = (0..60).map(|i| 50.0 + f64::from(i % 10)).collect();
        let result = small_forecaster().forecast(&series_from(&closes), 10).unwrap();

        for point in &result.points {
            assert!((50.0..=59.0).contains(&point.price));
        }
    }

    #[test]
    fn test_dates_follow_series_end() {
        let result = small_forecaster()
            .forecast(&series_from(&[10.0; 30]), 3)
            .unwrap();
        // last bar is 2024-01-30 (Tuesday)
        let dates: Vec<_> = result.points.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
            ]
        );
    }

    #[test]
    fn test_train_reports_scores() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + f64::from(i)).collect();
        let model = small_forecaster().train(&closes).unwrap();
        assert!(model.train_score.unwrap() > 0.9);
        assert!(model.holdout_score.is_some());
    }
}
