//! Ingest — the validation funnel from provider rows to a core `BarSeries`.
//!
//! Non-finite rows are dropped (providers emit them around halts); anything
//! structurally wrong after that — inverted high/low, non-positive prices,
//! out-of-order dates — fails fast. This is the MalformedBar boundary: bad
//! data never reaches the engine.

use pivotscan_core::domain::{Bar, BarSeries};

use super::provider::{DataError, RawBar};

/// Validate raw provider bars into a `BarSeries`.
pub fn ingest(symbol: &str, raw: Vec<RawBar>) -> Result<BarSeries, DataError> {
    let bars: Vec<Bar> = raw
        .into_iter()
        .filter(|r| {
            r.open.is_finite() && r.high.is_finite() && r.low.is_finite() && r.close.is_finite()
        })
        .map(|r| Bar {
            date: r.date,
            open: r.open,
            high: r.high,
            low: r.low,
            close: r.close,
            volume: r.volume,
        })
        .collect();

    BarSeries::new(symbol, bars).map_err(|e| DataError::ValidationError(e.to_string()))
}
