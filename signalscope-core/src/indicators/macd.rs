//! MACD: difference of two close EMAs, plus its signal line.
//!
//! MACD = EMA(fast) - EMA(slow); signal = EMA(signal_period) of MACD.
//! Default (12, 26, 9).
//! Lookback: slow - 1 for MACD, slow + signal_period - 2 for the signal line.

use super::ema::ema_of_series;
use super::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(slow > fast, "MACD slow period must exceed fast period");
        let prefix = match line {
            MacdLine::Macd => "macd",
            MacdLine::Signal => "macd_signal",
        };
        Self {
            fast,
            slow,
            signal,
            line,
            name: format!("{prefix}_{fast}_{slow}_{signal}"),
        }
    }

    /// Default parameters: 12, 26, 9
    pub fn default_params(line: MacdLine) -> Self {
        Self::new(12, 26, 9, line)
    }
}

/// MACD line of `values`.
pub fn macd_line(values: &[f64], fast: usize, slow: usize) -> Vec<f64> {
    let fast_ema = ema_of_series(values, fast);
    let slow_ema = ema_of_series(values, slow);
    fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect()
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            MacdLine::Macd => self.slow - 1,
            MacdLine::Signal => self.slow.saturating_add(self.signal) - 2,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let macd = macd_line(&closes(bars), self.fast, self.slow);
        match self.line {
            MacdLine::Macd => macd,
            MacdLine::Signal => ema_of_series(&macd, self.signal),
        }
    }
}
