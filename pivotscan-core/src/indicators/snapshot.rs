//! Standard indicator battery and per-index snapshot view.
//!
//! `SnapshotSet::build` computes every series the classifier, exit engine,
//! and backtest need, once per instrument. `snapshot(i)` exposes the values
//! at one index as options (None = insufficient data at that point).

use crate::domain::BarSeries;

use super::{AvgVolume, BarField, IndicatorValues, Roc, RollingMax, RollingMin, Sma};

pub const SMA_10: &str = "sma_10";
pub const SMA_20: &str = "sma_20";
pub const SMA_50: &str = "sma_50";
pub const SMA_200: &str = "sma_200";
pub const AVG_VOLUME_20: &str = "avg_volume_20";
pub const MAX_HIGH_20: &str = "max_high_20";
pub const MAX_HIGH_60: &str = "max_high_60";
pub const MAX_HIGH_250: &str = "max_high_250";
pub const MIN_CLOSE_60: &str = "min_close_60";

/// Series key for the rate-of-change at a given lookback.
pub fn roc_key(period: usize) -> String {
    format!("roc_{period}")
}

/// The full precomputed battery for one instrument.
#[derive(Debug, Clone)]
pub struct SnapshotSet {
    values: IndicatorValues,
    rs_period: usize,
}

impl SnapshotSet {
    /// Compute the standard battery over a series.
    ///
    /// `rs_period` selects which rate-of-change series is included (20 for
    /// the chose profile, 60 for drive).
    pub fn build(series: &BarSeries, rs_period: usize) -> Self {
        let bars = series.bars();
        let mut values = IndicatorValues::new();

        values.compute_and_insert(&Sma::new(10), bars);
        values.compute_and_insert(&Sma::new(20), bars);
        values.compute_and_insert(&Sma::new(50), bars);
        values.compute_and_insert(&Sma::new(200), bars);
        values.compute_and_insert(&AvgVolume::new(20), bars);
        values.compute_and_insert(&Roc::new(rs_period), bars);
        values.compute_and_insert(&RollingMax::new(BarField::High, 20), bars);
        values.compute_and_insert(&RollingMax::new(BarField::High, 60), bars);
        values.compute_and_insert(&RollingMax::new(BarField::High, 250), bars);
        values.compute_and_insert(&RollingMin::new(BarField::Close, 60), bars);

        Self { values, rs_period }
    }

    pub fn values(&self) -> &IndicatorValues {
        &self.values
    }

    pub fn rs_period(&self) -> usize {
        self.rs_period
    }

    /// Snapshot of the battery at one index. None fields mean the window did
    /// not have enough bars at that point.
    pub fn snapshot(&self, series: &BarSeries, index: usize) -> IndicatorSnapshot {
        let v = &self.values;
        IndicatorSnapshot {
            close: series.bars()[index].close,
            ma10: v.get_valid(SMA_10, index),
            ma20: v.get_valid(SMA_20, index),
            ma50: v.get_valid(SMA_50, index),
            ma200: v.get_valid(SMA_200, index),
            avg_volume_20: v.get_valid(AVG_VOLUME_20, index),
            high_20: v.get_valid(MAX_HIGH_20, index),
            high_250: v.get_valid(MAX_HIGH_250, index),
            rate_of_change: v.get_valid(&roc_key(self.rs_period), index),
        }
    }
}

/// Read-only indicator view at a single evaluation point.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub ma10: Option<f64>,
    pub ma20: Option<f64>,
    pub ma50: Option<f64>,
    pub ma200: Option<f64>,
    pub avg_volume_20: Option<f64>,
    pub high_20: Option<f64>,
    pub high_250: Option<f64>,
    pub rate_of_change: Option<f64>,
}
