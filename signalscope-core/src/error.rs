//! Error types and non-fatal reported conditions.
//!
//! Errors abort the analysis with no partial result. Conditions travel inside the
//! report next to whatever could still be computed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal analysis failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("invalid series: {0}")]
    InvalidSeries(#[from] SeriesError),

    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Structural violation of the input series invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("series has {len} bars, at least {min} required")]
    TooShort { len: usize, min: usize },

    #[error("bar {index}: {field} is not a finite number")]
    NonFinite { index: usize, field: &'static str },

    #[error("bar {index}: volume {volume} is negative or infinite")]
    BadVolume { index: usize, volume: f64 },

    #[error("bar {index}: timestamp does not strictly increase")]
    NotIncreasing { index: usize },
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{0} must be >= 1")]
    ZeroWindow(&'static str),

    #[error("histogram_bins must be within 10..=20, got {0}")]
    HistogramBins(usize),

    #[error("min_bars must be >= 2, got {0}")]
    MinBars(usize),

    #[error("target multiplier {name} must be finite and > 0, got {value}")]
    TargetMultiplier { name: &'static str, value: f64 },

    #[error("config parse failed: {0}")]
    Parse(String),

    #[error("config read failed: {0}")]
    Io(String),
}

/// Non-fatal condition found during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    /// Indicators left out of the frame because the series is shorter than
    /// their warm-up.
    InsufficientWarmup { indicators: Vec<String> },

    /// Swing high and swing low coincide; no usable range for retracements
    /// or clustering.
    DegenerateWindow { swing_high: f64, swing_low: f64 },

    /// Bar whose open/close fall outside its high/low range.
    OhlcEnvelopeViolation { index: usize },

    /// Bars without volume. Volume-based figures are undefined on them.
    VolumeUnavailable { bars: usize },
}
