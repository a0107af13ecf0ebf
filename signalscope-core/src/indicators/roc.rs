//! Rate of Change (ROC).
//!
//! ROC[t] = 100 * (close[t] - close[t-period]) / close[t-period]
//! Lookback: period.
//!
//! The report carries it twice under the dashboard's legacy names:
//! `momentum` (period 10) and `roc` (period 5).

use super::Indicator;
use crate::domain::Bar;

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
        let mut result = vec![f64::NAN; bars.len()];

        for (i, pair) in bars.windows(self.period + 1).enumerate() {
            let base = pair[0].close;
            let curr = pair[self.period].close;
            // A zero base has no defined percentage change.
            if base != 0.0 {
                result[i + self.period] = 100.0 * (curr - base) / base;
            }
        }

        result
    }
}
