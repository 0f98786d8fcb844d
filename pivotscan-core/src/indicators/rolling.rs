//! Rolling extremes — highest/lowest value of a bar field over a window.
//!
//! Window: [t-window+1, t] inclusive. Lookback: window - 1.
//!
//! The window always ends at the evaluation bar; consumers that need a
//! window excluding "today" (the prior-20-bar high, for instance) query the
//! value at t-1.

use crate::domain::Bar;

use super::Indicator;

/// Which bar field to roll over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl BarField {
    fn of(&self, bar: &Bar) -> f64 {
        match self {
            BarField::Open => bar.open,
            BarField::High => bar.high,
            BarField::Low => bar.low,
            BarField::Close => bar.close,
            BarField::Volume => bar.volume as f64,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            BarField::Open => "open",
            BarField::High => "high",
            BarField::Low => "low",
            BarField::Close => "close",
            BarField::Volume => "volume",
        }
    }
}

/// Rolling maximum of a bar field.
#[derive(Debug, Clone)]
pub struct RollingMax {
    field: BarField,
    window: usize,
    name: String,
}

impl RollingMax {
    pub fn new(field: BarField, window: usize) -> Self {
        assert!(window >= 1, "rolling window must be >= 1");
        Self {
            field,
            window,
            name: format!("max_{}_{}", field.label(), window),
        }
    }
}

impl Indicator for RollingMax {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n < self.window {
            return result;
        }
        for i in (self.window - 1)..n {
            let start = i + 1 - self.window;
            result[i] = bars[start..=i]
                .iter()
                .map(|b| self.field.of(b))
                .fold(f64::NEG_INFINITY, f64::max);
        }
        result
    }
}

/// Rolling minimum of a bar field.
#[derive(Debug, Clone)]
pub struct RollingMin {
    field: BarField,
    window: usize,
    name: String,
}

impl RollingMin {
    pub fn new(field: BarField, window: usize) -> Self {
        assert!(window >= 1, "rolling window must be >= 1");
        Self {
            field,
            window,
            name: format!("min_{}_{}", field.label(), window),
        }
    }
}

impl Indicator for RollingMin {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n < self.window {
            return result;
        }
        for i in (self.window - 1)..n {
            let start = i + 1 - self.window;
            result[i] = bars[start..=i]
                .iter()
                .map(|b| self.field.of(b))
                .fold(f64::INFINITY, f64::min);
        }
        result
    }
}
