//! SignalScope Core: technical analysis of an OHLCV bar series.
//!
//! One deterministic call, [`analyze`], turns a validated series into:
//! - an indicator frame (RSI, PSAR, ADX family, MFI, MACD, Fisher, Bollinger,
//!   ATR, Ichimoku, Stochastic, momentum/ROC)
//! - structural levels (swings, equilibrium, Fibonacci, histogram clusters)
//! - fair-value gap zones and tail manipulation checks
//! - per-bar BUY/SELL/HOLD signals with targets, plus a trend assessment
//! - an optional zone-anchored entry plan
//!
//! The crate does no network I/O; [`data`] reads bars from CSV.

pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod entry;
pub mod error;
pub mod fingerprint;
pub mod frame;
pub mod gaps;
pub mod indicators;
pub mod levels;
pub mod signals;
pub mod validate;

#[cfg(test)]
mod test_support;

pub use analysis::{analyze, AnalysisReport};
pub use config::AnalysisConfig;
pub use domain::{Bar, Series, SeriesMeta};
pub use error::{AnalysisError, Condition, ConfigError, SeriesError};
