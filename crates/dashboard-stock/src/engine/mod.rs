//! Indicator computation and recommendation scoring

pub mod indicators;
pub mod recommendation;

pub use indicators::{
    Column, IndicatorFrame, IndicatorRow, Levels, compute_indicators, support_resistance,
};
pub use recommendation::{Recommendation, recommend, signal_score};
