//! Ichimoku lines, undisplaced.
//!
//! midpoint(p)[t] = (max(high, p) + min(low, p)) / 2 over the trailing p bars
//! - Conversion (tenkan): midpoint(conversion)
//! - Base (kijun): midpoint(base)
//! - Span A: (conversion + base) / 2
//! - Span B: midpoint(span_b)
//!
//! Spans are reported at the bar they are computed on, not shifted forward;
//! shifting is a charting concern. Default (9, 26, 52).

use super::rolling::{rolling_max, rolling_min};
use super::{highs, lows, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IchimokuLine {
    Conversion,
    Base,
    SpanA,
    SpanB,
}

#[derive(Debug, Clone)]
pub struct Ichimoku {
    conversion: usize,
    base: usize,
    span_b: usize,
    line: IchimokuLine,
    name: String,
}

impl Ichimoku {
    pub fn new(conversion: usize, base: usize, span_b: usize, line: IchimokuLine) -> Self {
        assert!(
            conversion >= 1 && base >= 1 && span_b >= 1,
            "Ichimoku periods must be >= 1"
        );
        let label = match line {
            IchimokuLine::Conversion => "conversion",
            IchimokuLine::Base => "base",
            IchimokuLine::SpanA => "a",
            IchimokuLine::SpanB => "b",
        };
        Self {
            conversion,
            base,
            span_b,
            line,
            name: format!("ichimoku_{label}_{conversion}_{base}_{span_b}"),
        }
    }

    /// Default parameters: 9, 26, 52
    pub fn default_params(line: IchimokuLine) -> Self {
        Self::new(9, 26, 52, line)
    }
}

fn midpoint(highs: &[f64], lows: &[f64], period: usize) -> Vec<f64> {
    rolling_max(highs, period)
        .iter()
        .zip(rolling_min(lows, period))
        .map(|(h, l)| (h + l) / 2.0)
        .collect()
}

impl Indicator for Ichimoku {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            IchimokuLine::Conversion => self.conversion - 1,
            IchimokuLine::Base => self.base - 1,
            IchimokuLine::SpanA => self.conversion.max(self.base) - 1,
            IchimokuLine::SpanB => self.span_b - 1,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let (h, l) = (highs(bars), lows(bars));
        match self.line {
            IchimokuLine::Conversion => midpoint(&h, &l, self.conversion),
            IchimokuLine::Base => midpoint(&h, &l, self.base),
            IchimokuLine::SpanA => midpoint(&h, &l, self.conversion)
                .iter()
                .zip(midpoint(&h, &l, self.base))
                .map(|(c, b)| (c + b) / 2.0)
                .collect(),
            IchimokuLine::SpanB => midpoint(&h, &l, self.span_b),
        }
    }
}
