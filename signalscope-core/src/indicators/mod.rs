//! Concrete indicator implementations.
//!
//! Every indicator is a pure function of the bar series that returns one column
//! aligned with the bars. The first `lookback()` values are `f64::NAN` (warm-up);
//! the frame accessors turn those into `None`.
//!
//! Multi-line indicators (ADX family, Bollinger, MACD, Ichimoku, Stochastic) are
//! exposed as separate instances per line, keeping the single-column
//! `Indicator` trait unchanged.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod fisher;
pub mod ichimoku;
pub mod macd;
pub mod mfi;
pub mod parabolic_sar;
pub mod roc;
pub mod rolling;
pub mod rsi;
pub mod stochastic;

pub use adx::{Adx, AdxLine};
pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerBand};
pub use ema::Ema;
pub use fisher::FisherTransform;
pub use ichimoku::{Ichimoku, IchimokuLine};
pub use macd::{Macd, MacdLine};
pub use mfi::Mfi;
pub use parabolic_sar::ParabolicSar;
pub use roc::Roc;
pub use rsi::Rsi;
pub use stochastic::{Stochastic, StochasticLine};

use crate::domain::Bar;

/// Trait for indicators.
///
/// # Look-ahead guard
/// No value at bar t may depend on bars after t. Truncating the series must
/// leave every earlier value unchanged.
pub trait Indicator: Send + Sync {
    /// Parameter-qualified name (e.g., "rsi_14", "adx_14").
    fn name(&self) -> &str;

    /// Number of leading bars with no value.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns a `Vec<f64>` of the same length as `bars`.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

pub(crate) fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

pub(crate) fn highs(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.high).collect()
}

pub(crate) fn lows(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.low).collect()
}
