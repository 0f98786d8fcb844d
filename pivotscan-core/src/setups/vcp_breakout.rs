//! VCP / box breakout — a first-day breakout near the yearly high on volume.
//!
//! Trigger: first close above the prior 20-bar high.
//! Volume: today above 1.5x the 20-bar average.
//! Location: within 15% of the 250-bar high.

use crate::domain::Bar;
use crate::indicators::snapshot::{AVG_VOLUME_20, MAX_HIGH_250};
use crate::indicators::IndicatorValues;

use super::{breakout_check, PatternMatch, SetupKind, SetupPattern};

#[derive(Debug, Clone)]
pub struct VcpBreakout {
    /// Required multiple of the 20-bar average volume.
    pub volume_mult: f64,
    /// Maximum distance below the 250-bar high as a fraction.
    pub max_dist_to_high: f64,
}

impl VcpBreakout {
    pub fn new(volume_mult: f64, max_dist_to_high: f64) -> Self {
        assert!(volume_mult > 0.0, "volume_mult must be positive");
        assert!(
            max_dist_to_high > 0.0 && max_dist_to_high < 1.0,
            "max_dist_to_high must be in (0, 1)"
        );
        Self {
            volume_mult,
            max_dist_to_high,
        }
    }
}

impl Default for VcpBreakout {
    fn default() -> Self {
        Self::new(1.5, 0.15)
    }
}

impl SetupPattern for VcpBreakout {
    fn name(&self) -> &str {
        "vcp_breakout"
    }

    fn evaluate(
        &self,
        bars: &[Bar],
        i: usize,
        indicators: &IndicatorValues,
    ) -> Option<PatternMatch> {
        let check = breakout_check(bars, i, indicators)?;
        if !check.first_day {
            return None;
        }

        let avg_volume = indicators.get_valid(AVG_VOLUME_20, i)?;
        let volume = bars[i].volume as f64;
        if volume <= avg_volume * self.volume_mult {
            return None;
        }

        let year_high = indicators.get_valid(MAX_HIGH_250, i)?;
        let dist_to_high = (year_high - bars[i].close) / year_high;
        if dist_to_high >= self.max_dist_to_high {
            return None;
        }

        Some(PatternMatch {
            kind: SetupKind::VcpBreakout,
            pivot_price: check.prev_high_20,
            rationale: format!(
                "within {:.0}% of the 250-bar high, first close above {:.2} on {:.1}x average volume",
                dist_to_high * 100.0,
                check.prev_high_20,
                volume / avg_volume
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars_with_volume;
    use crate::indicators::snapshot::MAX_HIGH_20;

    fn series_at(i: usize, value: f64) -> Vec<f64> {
        let mut v = vec![f64::NAN; i + 1];
        v[i] = value;
        v
    }

    fn vcp_fixture() -> (Vec<Bar>, IndicatorValues, usize) {
        let mut closes = vec![120.0; 30];
        closes[28] = 122.0;
        closes[29] = 130.0;
        let mut bars = make_bars_with_volume(&closes, 900_000);
        let i = 29;
        bars[i].volume = 1_500_000;

        let mut iv = IndicatorValues::new();
        iv.insert(MAX_HIGH_20, series_at(i - 1, 125.0));
        iv.insert(AVG_VOLUME_20, series_at(i, 900_000.0));
        iv.insert(MAX_HIGH_250, series_at(i, 135.0));
        (bars, iv, i)
    }

    #[test]
    fn fires_near_year_high() {
        let (bars, iv, i) = vcp_fixture();
        let m = VcpBreakout::default().evaluate(&bars, i, &iv).unwrap();
        assert_eq!(m.kind, SetupKind::VcpBreakout);
        assert_eq!(m.pivot_price, 125.0);
    }

    #[test]
    fn too_far_from_year_high_does_not_fire() {
        let (bars, mut iv, i) = vcp_fixture();
        iv.insert(MAX_HIGH_250, series_at(i, 160.0)); // dist ≈ 19%
        assert!(VcpBreakout::default().evaluate(&bars, i, &iv).is_none());
    }

    #[test]
    fn weak_volume_does_not_fire() {
        let (mut bars, iv, i) = vcp_fixture();
        bars[i].volume = 1_200_000; // below 1.5x
        assert!(VcpBreakout::default().evaluate(&bars, i, &iv).is_none());
    }

    #[test]
    fn needs_first_day_breakout() {
        let (mut bars, iv, i) = vcp_fixture();
        bars[i - 1].close = 126.0;
        assert!(VcpBreakout::default().evaluate(&bars, i, &iv).is_none());
    }

    #[test]
    fn exact_boundary_close_equal_prev_high_does_not_fire() {
        let (mut bars, iv, i) = vcp_fixture();
        bars[i].close = 125.0; // must close strictly above the pivot
        assert!(VcpBreakout::default().evaluate(&bars, i, &iv).is_none());
    }
}
