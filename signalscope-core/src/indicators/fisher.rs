//! Fisher transform (smoothed normalized-midpoint oscillator).
//!
//! hl2 = (H + L) / 2, normalized against its rolling min/max over `period`:
//!   value[t] = 0.33 * 2 * ((hl2 - min) / (max - min + 1e-9) - 0.5)
//! then smoothed recursively:
//!   fish[s] = value[s] at the first defined row s,
//!   fish[t] = 0.5 * value[t] + 0.5 * fish[t-1].
//!
//! The recursion is a fold over the rows in order; it cannot be evaluated per
//! row independently.
//! Lookback: period - 1.

use super::rolling::{rolling_max, rolling_min};
use super::Indicator;
use crate::domain::Bar;

/// Guard against a zero-width normalization range.
pub const RANGE_EPSILON: f64 = 1e-9;

/// Normalized input and smoothed output, both aligned with the bars.
#[derive(Debug, Clone)]
pub struct FisherOutput {
    pub value: Vec<f64>,
    pub fish: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct FisherTransform {
    period: usize,
    name: String,
}

impl FisherTransform {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Fisher period must be >= 1");
        Self {
            period,
            name: format!("fisher_{period}"),
        }
    }

    pub fn transform(&self, bars: &[Bar]) -> FisherOutput {
        let hl2: Vec<f64> = bars.iter().map(Bar::hl2).collect();
        fisher_fold(&hl2, self.period)
    }
}

/// Normalize `hl2` and run the smoothing fold.
pub fn fisher_fold(hl2: &[f64], period: usize) -> FisherOutput {
    let lo = rolling_min(hl2, period);
    let hi = rolling_max(hl2, period);

    let value: Vec<f64> = hl2
        .iter()
        .zip(lo.iter().zip(&hi))
        .map(|(x, (lo, hi))| 0.33 * 2.0 * ((x - lo) / (hi - lo + RANGE_EPSILON) - 0.5))
        .collect();

    let fish = value
        .iter()
        .scan(None::<f64>, |prev, &v| {
            let next = match *prev {
                _ if v.is_nan() => f64::NAN,
                None => v,
                Some(p) if p.is_nan() => v,
                Some(p) => 0.5 * v + 0.5 * p,
            };
            *prev = Some(next);
            Some(next)
        })
        .collect();

    FisherOutput { value, fish }
}

impl Indicator for FisherTransform {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        self.transform(bars).fish
    }
}
