//! Stochastic oscillator %K / %D.
//!
//! %K = 100 * (close - lowest_low) / (highest_high - lowest_low) over `k_period`;
//! a zero range puts the close mid-range at 50.
//! %D = SMA(%K, d_period).
//! Lookback: k_period - 1 for %K, k_period + d_period - 2 for %D.

use super::rolling::{rolling_max, rolling_mean, rolling_min};
use super::{highs, lows, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StochasticLine {
    K,
    D,
}

#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
    line: StochasticLine,
    name: String,
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize, line: StochasticLine) -> Self {
        assert!(k_period >= 1 && d_period >= 1, "Stochastic periods must be >= 1");
        let label = match line {
            StochasticLine::K => "k",
            StochasticLine::D => "d",
        };
        Self {
            k_period,
            d_period,
            line,
            name: format!("stoch_{label}_{k_period}_{d_period}"),
        }
    }
}

fn percent_k(bars: &[Bar], period: usize) -> Vec<f64> {
    let hh = rolling_max(&highs(bars), period);
    let ll = rolling_min(&lows(bars), period);
    bars.iter()
        .zip(hh.iter().zip(&ll))
        .map(|(bar, (&hh, &ll))| {
            let range = hh - ll;
            if range.is_nan() {
                f64::NAN
            } else if range == 0.0 {
                50.0
            } else {
                100.0 * (bar.close - ll) / range
            }
        })
        .collect()
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            StochasticLine::K => self.k_period - 1,
            StochasticLine::D => self.k_period.saturating_add(self.d_period) - 2,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let k = percent_k(bars, self.k_period);
        match self.line {
            StochasticLine::K => k,
            StochasticLine::D => rolling_mean(&k, self.d_period),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_approx, bars_from_ohlc, DEFAULT_EPSILON};

    #[test]
    fn percent_k_hand_computed() {
        let bars = bars_from_ohlc(&[
            (10.0, 12.0, 8.0, 11.0),
            (11.0, 13.0, 9.0, 12.0),
            (12.0, 14.0, 10.0, 13.0),
        ]);
        let k = Stochastic::new(3, 2, StochasticLine::K).compute(&bars);
        // HH = 14, LL = 8 → 100 * (13 - 8) / 6
        assert_approx(k[2], 500.0 / 6.0, DEFAULT_EPSILON);
    }

    #[test]
    fn percent_d_smooths_k() {
        let bars = bars_from_ohlc(&[
            (10.0, 12.0, 8.0, 11.0),
            (11.0, 13.0, 9.0, 12.0),
            (12.0, 14.0, 10.0, 13.0),
            (13.0, 13.5, 9.5, 10.0),
        ]);
        let k = Stochastic::new(3, 2, StochasticLine::K).compute(&bars);
        let d = Stochastic::new(3, 2, StochasticLine::D).compute(&bars);
        assert!(d[2].is_nan());
        assert_approx(d[3], (k[2] + k[3]) / 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_range_is_mid() {
        let bars = bars_from_ohlc(&[(5.0, 5.0, 5.0, 5.0); 3]);
        let k = Stochastic::new(2, 1, StochasticLine::K).compute(&bars);
        assert_eq!(k[2], 50.0);
    }

    #[test]
    fn lookbacks() {
        assert_eq!(Stochastic::new(14, 3, StochasticLine::K).lookback(), 13);
        assert_eq!(Stochastic::new(14, 3, StochasticLine::D).lookback(), 15);
        assert_eq!(
            Stochastic::new(usize::MAX, 3, StochasticLine::D).lookback(),
            usize::MAX - 2
        );
    }
}
