//! Buyable gap up — a large opening gap confirmed by heavy volume.
//!
//! Gap: today's open at least 8% above yesterday's close.
//! Volume: today above twice the 20-bar average.
//! The pivot is the gap open itself, not a prior high.

use crate::domain::Bar;
use crate::indicators::snapshot::AVG_VOLUME_20;
use crate::indicators::IndicatorValues;

use super::{PatternMatch, SetupKind, SetupPattern};

#[derive(Debug, Clone)]
pub struct GapUp {
    /// Minimum opening gap as a fraction (0.08 = 8%).
    pub min_gap: f64,
    /// Required multiple of the 20-bar average volume.
    pub volume_mult: f64,
}

impl GapUp {
    pub fn new(min_gap: f64, volume_mult: f64) -> Self {
        assert!(min_gap > 0.0, "min_gap must be positive");
        assert!(volume_mult > 0.0, "volume_mult must be positive");
        Self {
            min_gap,
            volume_mult,
        }
    }
}

impl Default for GapUp {
    fn default() -> Self {
        Self::new(0.08, 2.0)
    }
}

impl SetupPattern for GapUp {
    fn name(&self) -> &str {
        "gap_up"
    }

    fn evaluate(
        &self,
        bars: &[Bar],
        i: usize,
        indicators: &IndicatorValues,
    ) -> Option<PatternMatch> {
        if i < 1 {
            return None;
        }
        let avg_volume = indicators.get_valid(AVG_VOLUME_20, i)?;

        let prev_close = bars[i - 1].close;
        let open = bars[i].open;
        let gap = (open - prev_close) / prev_close;
        if gap <= self.min_gap {
            return None;
        }

        let volume = bars[i].volume as f64;
        if volume <= avg_volume * self.volume_mult {
            return None;
        }

        Some(PatternMatch {
            kind: SetupKind::GapUp,
            pivot_price: open,
            rationale: format!(
                "opened {:.0}% above the prior close on {:.1}x average volume",
                gap * 100.0,
                volume / avg_volume
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars_with_volume;

    fn series_at(i: usize, value: f64) -> Vec<f64> {
        let mut v = vec![f64::NAN; i + 1];
        v[i] = value;
        v
    }

    fn gap_fixture() -> (Vec<Bar>, IndicatorValues, usize) {
        let mut bars = make_bars_with_volume(&[100.0, 100.0, 112.0], 900_000);
        let i = 2;
        bars[i].open = 110.0; // 10% gap over close[1] = 100
        bars[i].volume = 2_000_000;

        let mut iv = IndicatorValues::new();
        iv.insert(AVG_VOLUME_20, series_at(i, 900_000.0));
        (bars, iv, i)
    }

    #[test]
    fn fires_on_gap_with_volume() {
        let (bars, iv, i) = gap_fixture();
        let m = GapUp::default().evaluate(&bars, i, &iv).unwrap();
        assert_eq!(m.kind, SetupKind::GapUp);
        assert_eq!(m.pivot_price, 110.0); // pivot is the open
    }

    #[test]
    fn small_gap_does_not_fire() {
        let (mut bars, iv, i) = gap_fixture();
        bars[i].open = 105.0; // 5%
        assert!(GapUp::default().evaluate(&bars, i, &iv).is_none());
    }

    #[test]
    fn quiet_volume_does_not_fire() {
        let (mut bars, iv, i) = gap_fixture();
        bars[i].volume = 1_500_000; // below 2x the 900k average
        assert!(GapUp::default().evaluate(&bars, i, &iv).is_none());
    }

    #[test]
    fn first_bar_cannot_gap() {
        let (bars, iv, _) = gap_fixture();
        assert!(GapUp::default().evaluate(&bars, 0, &iv).is_none());
    }

    #[test]
    fn missing_avg_volume_does_not_fire() {
        let (bars, _, i) = gap_fixture();
        let iv = IndicatorValues::new();
        assert!(GapUp::default().evaluate(&bars, i, &iv).is_none());
    }
}
