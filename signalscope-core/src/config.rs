//! Serializable analysis configuration.
//!
//! Every field has a default, so a TOML file only needs the values it
//! overrides:
//!
//! ```toml
//! lookback_window = 50
//! signal_policy = "majority_vote"
//!
//! [targets]
//! type = "atr_multiple"
//! take_profit = 2.0
//! stop_loss = 1.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::signals::{SignalPolicy, TargetModel};
use crate::validate::MIN_BARS_FLOOR;

/// Allowed histogram bin counts for support/resistance clustering.
pub const HISTOGRAM_BINS_RANGE: std::ops::RangeInclusive<usize> = 10..=20;

/// Parameters of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Trailing window for swings, retracements, clustering and gap scanning.
    pub lookback_window: usize,
    pub fisher_window: usize,
    pub rsi_window: usize,
    pub mfi_window: usize,
    pub adx_window: usize,
    pub signal_policy: SignalPolicy,
    /// Shortest series accepted by validation.
    pub min_bars: usize,
    pub histogram_bins: usize,
    pub targets: TargetModel,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            lookback_window: 30,
            fisher_window: 10,
            rsi_window: 14,
            mfi_window: 14,
            adx_window: 14,
            signal_policy: SignalPolicy::Threshold,
            min_bars: 30,
            histogram_bins: 12,
            targets: TargetModel::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Check ranges. Called by the loaders and by the analysis entry point.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("lookback_window", self.lookback_window),
            ("fisher_window", self.fisher_window),
            ("rsi_window", self.rsi_window),
            ("mfi_window", self.mfi_window),
            ("adx_window", self.adx_window),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroWindow(name));
            }
        }
        if !HISTOGRAM_BINS_RANGE.contains(&self.histogram_bins) {
            return Err(ConfigError::HistogramBins(self.histogram_bins));
        }
        if self.min_bars < MIN_BARS_FLOOR {
            return Err(ConfigError::MinBars(self.min_bars));
        }
        self.targets.validate()
    }
}
