//! Technical indicator engine
//!
//! Augments a [`Series`] with moving averages, MACD, RSI and Bollinger
//! Bands. Every rolling column uses trailing windows only and is `None`
//! until its window has filled.

use crate::models::{Bar, Series};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution};
use ta::Next;
use ta::indicators::{ExponentialMovingAverage, SimpleMovingAverage};

/// Minimum number of bars before any indicator is computed
pub const MIN_BARS: usize = 20;

const SMA_SHORT: usize = 20;
const SMA_LONG: usize = 50;
const EMA_FAST: usize = 12;
const EMA_SLOW: usize = 26;
const SIGNAL_SPAN: usize = 9;
const RSI_WINDOW: usize = 14;
const BB_WINDOW: usize = 20;
const BB_WIDTH: f64 = 2.0;
const LEVELS_LOOKBACK: usize = 50;

/// A bar together with its derived indicator values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    #[serde(flatten)]
    pub bar: Bar,
    #[serde(rename = "SMA_20")]
    pub sma_20: Option<f64>,
    #[serde(rename = "SMA_50")]
    pub sma_50: Option<f64>,
    #[serde(rename = "EMA_12")]
    pub ema_12: Option<f64>,
    #[serde(rename = "EMA_26")]
    pub ema_26: Option<f64>,
    #[serde(rename = "MACD")]
    pub macd: Option<f64>,
    #[serde(rename = "Signal_Line")]
    pub signal_line: Option<f64>,
    #[serde(rename = "RSI")]
    pub rsi: Option<f64>,
    #[serde(rename = "BB_Upper")]
    pub bb_upper: Option<f64>,
    #[serde(rename = "BB_Middle")]
    pub bb_middle: Option<f64>,
    #[serde(rename = "BB_Lower")]
    pub bb_lower: Option<f64>,
}

impl IndicatorRow {
    /// A row with no derived values
    pub fn bare(bar: Bar) -> Self {
        Self {
            bar,
            sma_20: None,
            sma_50: None,
            ema_12: None,
            ema_26: None,
            macd: None,
            signal_line: None,
            rsi: None,
            bb_upper: None,
            bb_middle: None,
            bb_lower: None,
        }
    }

    pub fn close(&self) -> f64 {
        self.bar.close
    }

    /// Value of one derived column
    pub fn get(&self, column: Column) -> Option<f64> {
        match column {
            Column::Sma20 => self.sma_20,
            Column::Sma50 => self.sma_50,
            Column::Ema12 => self.ema_12,
            Column::Ema26 => self.ema_26,
            Column::Macd => self.macd,
            Column::SignalLine => self.signal_line,
            Column::Rsi => self.rsi,
            Column::BbUpper => self.bb_upper,
            Column::BbMiddle => self.bb_middle,
            Column::BbLower => self.bb_lower,
        }
    }
}

/// Derived indicator columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Sma20,
    Sma50,
    Ema12,
    Ema26,
    Macd,
    SignalLine,
    Rsi,
    BbUpper,
    BbMiddle,
    BbLower,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Sma20,
        Column::Sma50,
        Column::Ema12,
        Column::Ema26,
        Column::Macd,
        Column::SignalLine,
        Column::Rsi,
        Column::BbUpper,
        Column::BbMiddle,
        Column::BbLower,
    ];

    /// Conventional column name used by chart series
    pub fn name(&self) -> &'static str {
        match self {
            Column::Sma20 => "SMA_20",
            Column::Sma50 => "SMA_50",
            Column::Ema12 => "EMA_12",
            Column::Ema26 => "EMA_26",
            Column::Macd => "MACD",
            Column::SignalLine => "Signal_Line",
            Column::Rsi => "RSI",
            Column::BbUpper => "BB_Upper",
            Column::BbMiddle => "BB_Middle",
            Column::BbLower => "BB_Lower",
        }
    }
}

/// A series extended with indicator columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub symbol: String,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn latest(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    /// Whether the engine produced derived columns for this frame
    pub fn has_indicators(&self) -> bool {
        self.rows.len() >= MIN_BARS
    }

    /// One column as `(date, value)` points for charting
    pub fn column(&self, column: Column) -> Vec<(chrono::NaiveDate, Option<f64>)> {
        self.rows
            .iter()
            .map(|row| (row.bar.date, row.get(column)))
            .collect()
    }
}

/// Compute every indicator for `series`.
///
/// Below [`MIN_BARS`] bars the rows carry the bars unchanged with no derived
/// values.
pub fn compute_indicators(series: &Series) -> IndicatorFrame {
    let mut rows: Vec<IndicatorRow> = series.bars().iter().copied().map(IndicatorRow::bare).collect();

    if series.len() < MIN_BARS {
        tracing::debug!(
            symbol = %series.symbol,
            bars = series.len(),
            "Too few bars for indicators"
        );
        return IndicatorFrame {
            symbol: series.symbol.clone(),
            rows,
        };
    }

    let closes = series.closes();
    let sma_20 = sma(&closes, SMA_SHORT);
    let sma_50 = sma(&closes, SMA_LONG);
    let ema_12 = ema(&closes, EMA_FAST);
    let ema_26 = ema(&closes, EMA_SLOW);
    let macd: Vec<f64> = ema_12.iter().zip(&ema_26).map(|(fast, slow)| fast - slow).collect();
    let signal = ema(&macd, SIGNAL_SPAN);
    let rsi = rsi(&closes, RSI_WINDOW);
    let std_20 = rolling_std(&closes, BB_WINDOW);

    for (i, row) in rows.iter_mut().enumerate() {
        row.sma_20 = sma_20[i];
        row.sma_50 = sma_50[i];
        row.ema_12 = Some(ema_12[i]);
        row.ema_26 = Some(ema_26[i]);
        row.macd = Some(macd[i]);
        row.signal_line = Some(signal[i]);
        row.rsi = rsi[i];
        row.bb_middle = sma_20[i];
        if let (Some(mid), Some(sd)) = (sma_20[i], std_20[i]) {
            row.bb_upper = Some(mid + BB_WIDTH * sd);
            row.bb_lower = Some(mid - BB_WIDTH * sd);
        }
    }

    IndicatorFrame {
        symbol: series.symbol.clone(),
        rows,
    }
}

/// Trailing simple moving average, `None` until `window` values are seen
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let Ok(mut indicator) = SimpleMovingAverage::new(window) else {
        return vec![None; values.len()];
    };

    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let avg = indicator.next(v);
            (i + 1 >= window).then_some(avg)
        })
        .collect()
}

/// Recursive EMA with `alpha = 2 / (span + 1)`, seeded with the first value
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let Ok(mut indicator) = ExponentialMovingAverage::new(span) else {
        return values.to_vec();
    };

    values.iter().map(|&v| indicator.next(v)).collect()
}

/// Relative strength index over a trailing window of price deltas.
///
/// The first delta counts as zero. The value is `None` until the window has
/// filled and whenever the average loss is zero.
pub fn rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; closes.len()];
    }

    let deltas: Vec<f64> = std::iter::once(0.0)
        .chain(closes.windows(2).map(|pair| pair[1] - pair[0]))
        .take(closes.len())
        .collect();
    let gains: Vec<f64> = deltas.iter().map(|d| d.max(0.0)).collect();
    let losses: Vec<f64> = deltas.iter().map(|d| (-d).max(0.0)).collect();

    (0..closes.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let range = i + 1 - window..=i;
            let avg_gain = gains[range.clone()].iter().sum::<f64>() / window as f64;
            let avg_loss = losses[range].iter().sum::<f64>() / window as f64;
            if avg_loss == 0.0 {
                return None;
            }
            let rs = avg_gain / avg_loss;
            Some(100.0 - 100.0 / (1.0 + rs))
        })
        .collect()
}

/// Trailing sample standard deviation (n - 1 denominator)
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            Data::new(values[i + 1 - window..=i].to_vec()).std_dev()
        })
        .collect()
}

/// Recent support and resistance levels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Levels {
    pub support: f64,
    pub resistance: f64,
    pub current: f64,
    /// Percent of the current price above support
    pub distance_to_support: f64,
    /// Percent of the current price below resistance
    pub distance_to_resistance: f64,
}

/// Lowest low and highest high over the last 50 bars.
///
/// Needs at least [`MIN_BARS`] bars and a non-zero last close.
pub fn support_resistance(series: &Series) -> Option<Levels> {
    if series.len() < MIN_BARS {
        return None;
    }

    let recent = series.tail(LEVELS_LOOKBACK);
    let resistance = recent.iter().map(|bar| bar.high).fold(f64::NEG_INFINITY, f64::max);
    let support = recent.iter().map(|bar| bar.low).fold(f64::INFINITY, f64::min);
    let current = series.last_close()?;
    if current == 0.0 {
        return None;
    }

    Some(Levels {
        support,
        resistance,
        current,
        distance_to_support: (current - support) / current * 100.0,
        distance_to_resistance: (resistance - current) / current * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Days, NaiveDate};

    fn series_from(closes: &[f64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let date = start.checked_add_days(Days::new(i as u64)).unwrap();
                Bar::new(date, c, c + 1.0, c - 1.0, c, 1_000.0)
            })
            .collect();
        Series::new("TEST", bars)
    }

    #[test]
    fn test_short_series_passes_through() {
        let series = series_from(&[10.0; 19]);
        let frame = compute_indicators(&series);

        assert_eq!(frame.len(), 19);
        assert!(!frame.has_indicators());
        for (row, bar) in frame.rows.iter().zip(series.bars()) {
            assert_eq!(row, &IndicatorRow::bare(*bar));
        }
    }

    #[test]
    fn test_warmup_windows() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + f64::from(i % 7) - 3.0).collect();
        let frame = compute_indicators(&series_from(&closes));

        assert!(frame.rows[18].sma_20.is_none());
        assert!(frame.rows[19].sma_20.is_some());
        assert!(frame.rows[48].sma_50.is_none());
        assert!(frame.rows[49].sma_50.is_some());
        assert!(frame.rows[12].rsi.is_none());
        assert!(frame.rows[13].rsi.is_some());
        assert!(frame.rows[18].bb_upper.is_none());
        assert!(frame.rows[19].bb_lower.is_some());
        assert!(frame.rows[0].ema_12.is_some());
    }

    #[test]
    fn test_constant_price() {
        let frame = compute_indicators(&series_from(&[100.0; 60]));
        let last = frame.latest().unwrap();

        assert_eq!(last.sma_20, Some(100.0));
        assert_eq!(last.sma_50, Some(100.0));
        assert_eq!(last.rsi, None);
        assert_relative_eq!(last.macd.unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(last.bb_upper.unwrap(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(last.bb_lower.unwrap(), 100.0, epsilon = 1e-9);
        assert!(frame.rows.iter().all(|row| row.rsi.is_none()));
    }

    #[test]
    fn test_ema_seeded_with_first_value() {
        let values = [10.0, 20.0, 30.0];
        let out = ema(&values, 3);
        // alpha = 0.5
        assert_relative_eq!(out[0], 10.0);
        assert_relative_eq!(out[1], 15.0);
        assert_relative_eq!(out[2], 22.5);
    }

    #[test]
    fn test_sma_values() {
        let out = sma(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(out, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
    }

    #[test]
    fn test_zero_window_is_rejected_quietly() {
        assert_eq!(sma(&[1.0, 2.0], 0), vec![None, None]);
        assert_eq!(ema(&[1.0, 2.0], 0), vec![1.0, 2.0]);
    }

    #[test]
    fn test_rsi_mixed_moves() {
        // deltas after the zero seed: +1, -1, +2
        let out = rsi(&[10.0, 11.0, 10.0, 12.0], 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        // window deltas [0, +1, -1]: gain 1/3, loss 1/3
        assert_relative_eq!(out[2].unwrap(), 50.0);
        // window deltas [+1, -1, +2]: gain 1, loss 1/3, rs = 3
        assert_relative_eq!(out[3].unwrap(), 75.0);
    }

    #[test]
    fn test_rsi_without_losses_is_undefined() {
        let out = rsi(&[1.0, 2.0, 3.0, 4.0], 3);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn test_rolling_std_is_sample() {
        let out = rolling_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8);
        // population std is 2.0; sample std is sqrt(32/7)
        assert_relative_eq!(out[7].unwrap(), (32.0_f64 / 7.0).sqrt());
    }

    #[test]
    fn test_rolling_std_trails_window() {
        let out = rolling_std(&[1.0, 2.0, 3.0, 10.0, 10.0, 10.0], 3);
        assert!(out[..2].iter().all(Option::is_none));
        assert_relative_eq!(out[2].unwrap(), 1.0);
        assert_relative_eq!(out[3].unwrap(), 19.0_f64.sqrt());
        assert_relative_eq!(out[5].unwrap(), 0.0);

        assert!(rolling_std(&[1.0, 2.0], 1).iter().all(Option::is_none));
    }

    #[test]
    fn test_macd_is_ema_difference() {
        let closes: Vec<f64> = (0..40).map(|i| 50.0 + f64::from(i)).collect();
        let frame = compute_indicators(&series_from(&closes));
        for row in &frame.rows {
            assert_relative_eq!(
                row.macd.unwrap(),
                row.ema_12.unwrap() - row.ema_26.unwrap()
            );
        }
        // rising prices: fast EMA above slow EMA
        assert!(frame.latest().unwrap().macd.unwrap() > 0.0);
    }

    #[test]
    fn test_column_series() {
        let frame = compute_indicators(&series_from(&[5.0; 25]));
        let points = frame.column(Column::Sma20);
        assert_eq!(points.len(), 25);
        assert_eq!(points[0].1, None);
        assert_eq!(points[24].1, Some(5.0));
        assert_eq!(Column::SignalLine.name(), "Signal_Line");
    }

    #[test]
    fn test_row_serializes_column_names() {
        let frame = compute_indicators(&series_from(&[5.0; 25]));
        let value = serde_json::to_value(frame.latest().unwrap()).unwrap();
        assert_eq!(value["SMA_20"], 5.0);
        assert!(value["RSI"].is_null());
        assert_eq!(value["close"], 5.0);
    }

    #[test]
    fn test_support_resistance() {
        assert!(support_resistance(&series_from(&[10.0; 10])).is_none());

        let closes: Vec<f64> = (0..60).map(|i| 100.0 + f64::from(i)).collect();
        let levels = support_resistance(&series_from(&closes)).unwrap();
        // last 50 bars: closes 110..=159, high = close + 1, low = close - 1
        assert_relative_eq!(levels.resistance, 160.0);
        assert_relative_eq!(levels.support, 109.0);
        assert_relative_eq!(levels.current, 159.0);
        assert_relative_eq!(levels.distance_to_support, 50.0 / 159.0 * 100.0);
    }
}
