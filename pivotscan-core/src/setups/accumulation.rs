//! Accumulation (MVP) detector — quiet institutional buying.
//!
//! Over the 15 bars before today: at least 9 up-days, with average volume
//! at least 20% above the preceding 15-bar window. Not part of the exclusive
//! setup chain — the momentum scan reports it as a separate column.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct AccumulationDetector {
    /// Observation window, in bars, ending yesterday.
    pub window: usize,
    /// Minimum up-days within the window.
    pub min_up_days: usize,
    /// Window average volume vs the prior window, as a ratio.
    pub min_volume_ratio: f64,
}

/// Evidence of accumulation at one evaluation point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MvpSignal {
    pub up_days: usize,
    pub volume_ratio: f64,
}

impl AccumulationDetector {
    pub fn new(window: usize, min_up_days: usize, min_volume_ratio: f64) -> Self {
        assert!(window >= 1, "window must be >= 1");
        assert!(min_up_days <= window, "min_up_days cannot exceed window");
        assert!(min_volume_ratio > 0.0, "min_volume_ratio must be positive");
        Self {
            window,
            min_up_days,
            min_volume_ratio,
        }
    }

    /// Evaluate at `i`, looking at [i-window, i-1] against [i-2*window, i-window-1].
    ///
    /// Needs one extra bar in front of the observation window for the first
    /// day-over-day comparison; None until 2*window + 1 prior bars exist.
    pub fn evaluate(&self, bars: &[Bar], i: usize) -> Option<MvpSignal> {
        let w = self.window;
        if i < 2 * w + 1 {
            return None;
        }

        let up_days = (i - w..i)
            .filter(|&j| bars[j].close > bars[j - 1].close)
            .count();

        let recent: f64 = bars[i - w..i].iter().map(|b| b.volume as f64).sum();
        let prior: f64 = bars[i - 2 * w..i - w].iter().map(|b| b.volume as f64).sum();
        if prior <= 0.0 {
            return None;
        }
        let volume_ratio = recent / prior;

        if up_days >= self.min_up_days && volume_ratio >= self.min_volume_ratio {
            Some(MvpSignal {
                up_days,
                volume_ratio,
            })
        } else {
            None
        }
    }
}

impl Default for AccumulationDetector {
    fn default() -> Self {
        Self::new(15, 9, 1.2)
    }
}
