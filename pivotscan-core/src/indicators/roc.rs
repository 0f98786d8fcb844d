//! Rate of Change (ROC).
//!
//! Fractional price change over N bars:
//! ROC[t] = close[t] / close[t-period] - 1.
//! Lookback: period. Kept as a fraction — the relative-strength comparison
//! converts to percentage points at the edge.

use crate::domain::Bar;

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Roc {
    period: usize,
    name: String,
}

impl Roc {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ROC period must be >= 1");
        Self {
            period,
            name: format!("roc_{period}"),
        }
    }
}

impl Indicator for Roc {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        for i in self.period..n {
            let prev = bars[i - self.period].close;
            let curr = bars[i].close;
            if prev == 0.0 {
                result[i] = f64::NAN;
            } else {
                result[i] = curr / prev - 1.0;
            }
        }

        result
    }
}
