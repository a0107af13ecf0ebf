//! Money Flow Index (MFI).
//!
//! Typical price tp = (H + L + C) / 3, raw money flow = tp * volume.
//! A bar's flow is positive when tp rises from the previous bar, negative when
//! it falls, and counts on neither side when unchanged.
//! MFI = 100 - 100 / (1 + positive_sum / negative_sum) over `period` bars.
//! Lookback: period.
//! Edge cases: no negative flow → 100; no positive flow → 0; neither → 50.
//! A window touching a bar without volume is undefined.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Mfi {
    period: usize,
    name: String,
}

impl Mfi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "MFI period must be >= 1");
        Self {
            period,
            name: format!("mfi_{period}"),
        }
    }
}

impl Indicator for Mfi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        // Signed flow per bar; index 0 has no previous typical price.
        let mut flow = vec![f64::NAN; n];
        for i in 1..n {
            if !bars[i].has_volume() {
                continue;
            }
            let tp = bars[i].typical_price();
            let prev_tp = bars[i - 1].typical_price();
            let raw = tp * bars[i].volume;
            flow[i] = if tp > prev_tp {
                raw
            } else if tp < prev_tp {
                -raw
            } else {
                0.0
            };
        }

        for i in self.period..n {
            let window = &flow[i + 1 - self.period..=i];
            if window.iter().any(|f| f.is_nan()) {
                continue;
            }
            let positive: f64 = window.iter().filter(|f| **f > 0.0).sum();
            let negative: f64 = -window.iter().filter(|f| **f < 0.0).sum::<f64>();
            result[i] = money_flow_index(positive, negative);
        }

        result
    }
}

fn money_flow_index(positive: f64, negative: f64) -> f64 {
    match (positive == 0.0, negative == 0.0) {
        (true, true) => 50.0,
        (_, true) => 100.0,
        (true, _) => 0.0,
        _ => 100.0 - 100.0 / (1.0 + positive / negative),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_approx, bars_from_ohlcv, DEFAULT_EPSILON};

    #[test]
    fn mfi_hand_computed() {
        // Typical prices: 10, 11, 10.5, 12 (H = L = C)
        let bars = bars_from_ohlcv(&[
            (10.0, 10.0, 10.0, 10.0, 100.0),
            (11.0, 11.0, 11.0, 11.0, 200.0),
            (10.5, 10.5, 10.5, 10.5, 300.0),
            (12.0, 12.0, 12.0, 12.0, 100.0),
        ]);
        let result = Mfi::new(3).compute(&bars);

        assert!(result[..3].iter().all(|v| v.is_nan()));
        // positive = 11*200 + 12*100 = 3400, negative = 10.5*300 = 3150
        let expected = 100.0 - 100.0 / (1.0 + 3400.0 / 3150.0);
        assert_approx(result[3], expected, DEFAULT_EPSILON);
    }

    #[test]
    fn mfi_only_inflows_is_100() {
        let bars = bars_from_ohlcv(&[
            (10.0, 10.0, 10.0, 10.0, 100.0),
            (11.0, 11.0, 11.0, 11.0, 100.0),
            (12.0, 12.0, 12.0, 12.0, 100.0),
        ]);
        assert_approx(Mfi::new(2).compute(&bars)[2], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn mfi_missing_volume_is_undefined() {
        let bars = bars_from_ohlcv(&[
            (10.0, 10.0, 10.0, 10.0, 100.0),
            (11.0, 11.0, 11.0, 11.0, f64::NAN),
            (12.0, 12.0, 12.0, 12.0, 100.0),
            (13.0, 13.0, 13.0, 13.0, 100.0),
            (12.0, 12.0, 12.0, 12.0, 100.0),
        ]);
        let result = Mfi::new(2).compute(&bars);
        assert!(result[2].is_nan());
        assert!(!result[4].is_nan());
    }

    #[test]
    fn mfi_missing_volume_on_flat_bar_is_undefined() {
        // Typical prices 10, 11, 11, 12; the unchanged bar has no volume.
        let bars = bars_from_ohlcv(&[
            (10.0, 10.0, 10.0, 10.0, 100.0),
            (11.0, 11.0, 11.0, 11.0, 100.0),
            (11.0, 11.0, 11.0, 11.0, f64::NAN),
            (12.0, 12.0, 12.0, 12.0, 100.0),
        ]);
        let result = Mfi::new(3).compute(&bars);
        assert!(result[3].is_nan());
    }

    #[test]
    fn mfi_bounds() {
        let bars = bars_from_ohlcv(&[
            (10.0, 11.0, 9.0, 10.0, 500.0),
            (10.0, 12.0, 9.5, 11.5, 800.0),
            (11.5, 11.8, 10.0, 10.2, 300.0),
            (10.2, 10.9, 9.0, 9.4, 900.0),
            (9.4, 11.0, 9.3, 10.8, 400.0),
            (10.8, 12.5, 10.5, 12.2, 1000.0),
        ]);
        for v in Mfi::new(3).compute(&bars).into_iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(&v));
        }
    }
}
