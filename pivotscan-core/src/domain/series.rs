//! BarSeries — validated, time-ordered OHLCV history for one instrument.
//!
//! Malformed input (non-monotonic dates, non-positive prices, inverted
//! high/low) fails fast at construction. Everything downstream — indicators,
//! classifier, exit engine, backtest — may assume a clean series.

use chrono::NaiveDate;
use thiserror::Error;

use super::bar::Bar;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("empty bar series for {symbol}")]
    Empty { symbol: String },

    #[error("non-monotonic dates in {symbol} at index {index}: {prev} followed by {next}")]
    NonMonotonicDates {
        symbol: String,
        index: usize,
        prev: NaiveDate,
        next: NaiveDate,
    },

    #[error("malformed bar in {symbol} on {date}: OHLC sanity check failed")]
    MalformedBar { symbol: String, date: NaiveDate },
}

/// Time-ordered sequence of daily bars, strictly increasing by date.
#[derive(Debug, Clone)]
pub struct BarSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Validate and wrap a bar vector. Fails on the first defect found.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        let symbol = symbol.into();

        if bars.is_empty() {
            return Err(SeriesError::Empty { symbol });
        }

        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_sane() {
                return Err(SeriesError::MalformedBar {
                    symbol,
                    date: bar.date,
                });
            }
            if i > 0 && bars[i - 1].date >= bar.date {
                return Err(SeriesError::NonMonotonicDates {
                    symbol,
                    index: i,
                    prev: bars[i - 1].date,
                    next: bar.date,
                });
            }
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The most recent bar. The constructor rejects empty series, so this
    /// cannot fail.
    pub fn last(&self) -> &Bar {
        self.bars.last().expect("BarSeries is never empty")
    }

    /// Index of the most recent bar.
    pub fn last_index(&self) -> usize {
        self.bars.len() - 1
    }
}
