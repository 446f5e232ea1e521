//! Linear trend extrapolation

use super::{ForecastResult, calendar};
use crate::models::Series;

/// Minimum bars before a linear trend is fitted
pub const MIN_BARS: usize = 30;

/// Least-squares line through `values` against their index: `(slope, intercept)`
pub fn fit_line(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;

    let (sxy, sxx) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sxy, sxx), (i, &y)| {
            let dx = i as f64 - mean_x;
            (sxy + dx * (y - mean_y), sxx + dx * dx)
        });

    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

/// Fit close against day index over the trailing `window` bars and evaluate
/// the line at the next `horizon` indices.
///
/// Returns `None` with fewer than [`MIN_BARS`] bars.
pub fn linear_forecast(series: &Series, horizon: usize, window: usize) -> Option<ForecastResult> {
    if series.len() < MIN_BARS {
        tracing::debug!(symbol = %series.symbol, bars = series.len(), "Too few bars for linear forecast");
        return None;
    }

    let recent: Vec<f64> = series.tail(window).iter().map(|bar| bar.close).collect();
    let (slope, intercept) = fit_line(&recent)?;
    let start = recent.len();

    let prices = (start..start + horizon).map(|x| intercept + slope * x as f64);
    let dates = calendar::next_business_days(series.last_date()?, horizon);

    tracing::debug!(symbol = %series.symbol, slope, intercept, "Fitted linear trend");
    Some(ForecastResult::new(series.last_close()?, dates.into_iter().zip(prices)))
}
