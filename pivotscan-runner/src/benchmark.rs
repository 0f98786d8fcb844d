//! Benchmark rate of change — the market reference for RS filtering.
//!
//! The scan needs a single scalar (the benchmark's ROC at the latest bar);
//! the backtest needs a full series aligned by date to the instrument's
//! bars, so that the RS comparison at bar i uses the benchmark value from
//! the same session.

use chrono::NaiveDate;
use std::collections::HashMap;

use pivotscan_core::domain::BarSeries;
use pivotscan_core::indicators::{Indicator, Roc};

/// ROC of the benchmark at its latest bar, as a fraction.
///
/// Returns 0.0 (neutral) when the series is too short for the period —
/// a missing benchmark must never block the whole scan.
pub fn latest_roc(benchmark: &BarSeries, period: usize) -> f64 {
    let series = Roc::new(period).compute(benchmark.bars());
    series
        .last()
        .copied()
        .filter(|v| !v.is_nan())
        .unwrap_or(0.0)
}

/// Benchmark ROC re-indexed onto the instrument's dates.
///
/// Output[i] is the benchmark's ROC on `dates[i]`, NaN where the benchmark
/// has no bar that day (the backtest treats NaN as a neutral 0.0).
pub fn aligned_roc(benchmark: &BarSeries, period: usize, dates: &[NaiveDate]) -> Vec<f64> {
    let roc = Roc::new(period).compute(benchmark.bars());
    let by_date: HashMap<NaiveDate, f64> = benchmark
        .bars()
        .iter()
        .zip(roc)
        .map(|(bar, v)| (bar.date, v))
        .collect();

    dates
        .iter()
        .map(|d| by_date.get(d).copied().unwrap_or(f64::NAN))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivotscan_core::domain::Bar;

    fn series(closes: &[f64]) -> BarSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: base + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000,
            })
            .collect();
        BarSeries::new("0050.TW", bars).unwrap()
    }

    #[test]
    fn latest_roc_of_rising_benchmark() {
        let bench = series(&[100.0, 101.0, 102.0, 110.0]);
        let roc = latest_roc(&bench, 3);
        assert!((roc - 0.10).abs() < 1e-12);
    }

    #[test]
    fn short_series_is_neutral() {
        let bench = series(&[100.0, 101.0]);
        assert_eq!(latest_roc(&bench, 20), 0.0);
    }

    #[test]
    fn aligned_roc_matches_dates_and_flags_gaps() {
        let bench = series(&[100.0, 102.0, 104.0, 106.0]);
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        // The second date does not exist in the benchmark.
        let dates = [
            base + chrono::Duration::days(3),
            base + chrono::Duration::days(30),
        ];
        let out = aligned_roc(&bench, 1, &dates);
        assert!((out[0] - (106.0 / 104.0 - 1.0)).abs() < 1e-12);
        assert!(out[1].is_nan());
    }
}
