//! Average volume — rolling mean of share volume.
//!
//! Lookback: window - 1. Output is in shares (f64 for NaN warmup).

use crate::domain::Bar;

use super::Indicator;

#[derive(Debug, Clone)]
pub struct AvgVolume {
    window: usize,
    name: String,
}

impl AvgVolume {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "volume window must be >= 1");
        Self {
            window,
            name: format!("avg_volume_{window}"),
        }
    }
}

impl Indicator for AvgVolume {
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

        let mut sum: f64 = bars.iter().take(self.window).map(|b| b.volume as f64).sum();
        result[self.window - 1] = sum / self.window as f64;

        for i in self.window..n {
            sum = sum - bars[i - self.window].volume as f64 + bars[i].volume as f64;
            result[i] = sum / self.window as f64;
        }

        result
    }
}
