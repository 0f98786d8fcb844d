//! Indicator engine — pure functions over bar history.
//!
//! Indicators take a full bar series and produce a numeric output series of
//! the same length. The first `lookback()` values are `f64::NAN` (warmup);
//! NaN is the "insufficient data" marker throughout the engine, and every
//! consumer treats a NaN input as a non-firing predicate.
//!
//! # Look-ahead contamination guard
//! No indicator value at bar t may depend on price data from bar t+1 or
//! later. Every indicator must pass the truncated-vs-full series test.

pub mod avg_volume;
pub mod roc;
pub mod rolling;
pub mod sma;
pub mod snapshot;

pub use avg_volume::AvgVolume;
pub use roc::Roc;
pub use rolling::{BarField, RollingMax, RollingMin};
pub use sma::Sma;
pub use snapshot::{IndicatorSnapshot, SnapshotSet};

use crate::domain::Bar;
use std::collections::HashMap;

/// Trait for indicators.
pub trait Indicator: Send + Sync {
    /// Series key (e.g. "sma_20", "max_high_60").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns a `Vec<f64>` of the same length as `bars`, NaN for the first
    /// `lookback()` entries.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Container for precomputed indicator values.
///
/// Built once per series, then queried by bar index during classification,
/// exit evaluation, and the backtest loop.
#[derive(Debug, Clone, Default)]
pub struct IndicatorValues {
    series: HashMap<String, Vec<f64>>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a named indicator series.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Compute an indicator over `bars` and store it under its own name.
    pub fn compute_and_insert(&mut self, indicator: &dyn Indicator, bars: &[Bar]) {
        self.insert(indicator.name().to_string(), indicator.compute(bars));
    }

    /// Get the indicator value at a specific bar index.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series
            .get(name)
            .and_then(|v| v.get(bar_index).copied())
    }

    /// Like [`get`](Self::get), but maps NaN (warmup) to None as well.
    pub fn get_valid(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.get(name, bar_index).filter(|v| !v.is_nan())
    }

    /// Get the full series for a named indicator.
    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
pub(crate) const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "expected {expected}, got {actual}"
    );
}

/// Build a bar series from closes alone (open/high/low derived, volume fixed).
#[cfg(test)]
pub(crate) fn make_bars(closes: &[f64]) -> Vec<Bar> {
    make_bars_with_volume(closes, 1000)
}

#[cfg(test)]
pub(crate) fn make_bars_with_volume(closes: &[f64], volume: u64) -> Vec<Bar> {
    use chrono::NaiveDate;
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open: close - 0.5,
            high: close + 2.0,
            low: (close - 2.0).max(0.01),
            close,
            volume,
        })
        .collect()
}
