//! Deterministic fingerprint of an analysis input.
//!
//! BLAKE3 over a fixed binary encoding of the series and configuration. Floats
//! are hashed by bit pattern, with every NaN folded into one canonical value,
//! so identical inputs give identical fingerprints on every platform.

use serde::Serialize;
use std::fmt;

use crate::config::AnalysisConfig;
use crate::domain::Series;
use crate::signals::{SignalPolicy, TargetModel};

/// Hex-encoded BLAKE3 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(series: &Series, config: &AnalysisConfig) -> Self {
        let mut hasher = blake3::Hasher::new();

        update_str(&mut hasher, &series.meta.instrument);
        update_str(&mut hasher, &series.meta.interval);
        hasher.update(&(series.len() as u64).to_le_bytes());
        for bar in &series.bars {
            hasher.update(&bar.timestamp.timestamp_millis().to_le_bytes());
            for value in [bar.open, bar.high, bar.low, bar.close, bar.volume] {
                update_f64(&mut hasher, value);
            }
        }

        for window in [
            config.lookback_window,
            config.fisher_window,
            config.rsi_window,
            config.mfi_window,
            config.adx_window,
            config.min_bars,
            config.histogram_bins,
        ] {
            hasher.update(&(window as u64).to_le_bytes());
        }
        hasher.update(&[match config.signal_policy {
            SignalPolicy::Threshold => 0,
            SignalPolicy::MajorityVote => 1,
        }]);
        let (tag, take_profit, stop_loss) = match config.targets {
            TargetModel::FixedPercent {
                take_profit_pct,
                stop_loss_pct,
            } => (0u8, take_profit_pct, stop_loss_pct),
            TargetModel::AtrMultiple {
                take_profit,
                stop_loss,
            } => (1u8, take_profit, stop_loss),
        };
        hasher.update(&[tag]);
        update_f64(&mut hasher, take_profit);
        update_f64(&mut hasher, stop_loss);

        Self(hasher.finalize().to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn update_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

fn update_f64(hasher: &mut blake3::Hasher, value: f64) {
    let bits = if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    };
    hasher.update(&bits.to_le_bytes());
}
