//! Parabolic SAR: Wilder's stop-and-reverse.
//!
//! Inherently sequential: each value depends on the previous direction,
//! extreme point (EP) and acceleration factor (AF). The state is an explicit
//! `SarState` threaded through `ParabolicSar::step`, one bar at a time.
//!
//! Parameters: af_start (default 0.02), af_step (default 0.02), af_max (default 0.20).
//! Lookback: 1 (direction is seeded from the first two closes).

use super::Indicator;
use crate::domain::Bar;

/// State carried from one bar to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SarState {
    pub is_long: bool,
    pub sar: f64,
    pub ep: f64,
    pub af: f64,
}

#[derive(Debug, Clone)]
pub struct ParabolicSar {
    af_start: f64,
    af_step: f64,
    af_max: f64,
    name: String,
}

impl ParabolicSar {
    pub fn new(af_start: f64, af_step: f64, af_max: f64) -> Self {
        assert!(af_start > 0.0, "AF start must be > 0");
        assert!(af_step > 0.0, "AF step must be > 0");
        assert!(af_max >= af_start, "AF max must be >= AF start");
        Self {
            af_start,
            af_step,
            af_max,
            name: format!("psar_{af_start}_{af_step}_{af_max}"),
        }
    }

    /// Default parameters: 0.02, 0.02, 0.20
    pub fn default_params() -> Self {
        Self::new(0.02, 0.02, 0.20)
    }

    /// Initial state from the first two bars.
    pub fn seed(&self, first: &Bar, second: &Bar) -> SarState {
        if second.close >= first.close {
            SarState {
                is_long: true,
                sar: first.low,
                ep: second.high,
                af: self.af_start,
            }
        } else {
            SarState {
                is_long: false,
                sar: first.high,
                ep: second.low,
                af: self.af_start,
            }
        }
    }

    /// Advance the state onto `bars[i]` (requires `i >= 2`).
    pub fn step(&self, state: SarState, bars: &[Bar], i: usize) -> SarState {
        let bar = &bars[i];
        let SarState {
            mut is_long,
            sar,
            mut ep,
            mut af,
        } = state;

        let mut new_sar = sar + af * (ep - sar);

        if is_long {
            // SAR may not sit above either of the two previous lows
            new_sar = new_sar.min(bars[i - 1].low).min(bars[i - 2].low);

            if bar.low < new_sar {
                is_long = false;
                new_sar = ep;
                ep = bar.low;
                af = self.af_start;
            } else if bar.high > ep {
                ep = bar.high;
                af = (af + self.af_step).min(self.af_max);
            }
        } else {
            // SAR may not sit below either of the two previous highs
            new_sar = new_sar.max(bars[i - 1].high).max(bars[i - 2].high);

            if bar.high > new_sar {
                is_long = true;
                new_sar = ep;
                ep = bar.high;
                af = self.af_start;
            } else if bar.low < ep {
                ep = bar.low;
                af = (af + self.af_step).min(self.af_max);
            }
        }

        SarState {
            is_long,
            sar: new_sar,
            ep,
            af,
        }
    }
}

impl Indicator for ParabolicSar {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < 2 || bars[..2].iter().any(Bar::is_void) {
            return result;
        }

        let mut state = self.seed(&bars[0], &bars[1]);
        result[1] = state.sar;

        for i in 2..n {
            if bars[i].is_void() {
                // State is frozen across a void bar
                continue;
            }
            state = self.step(state, bars, i);
            result[i] = state.sar;
        }

        result
    }
}
