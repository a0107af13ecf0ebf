//! Take-profit / stop-loss models.

use serde::{Deserialize, Serialize};

use super::SignalCategory;
use crate::error::ConfigError;

/// How targets are derived from the signal bar's close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TargetModel {
    /// Fractions of the close: BUY targets `close * (1 + take_profit_pct)` and
    /// stops at `close * (1 - stop_loss_pct)`; SELL mirrors.
    FixedPercent {
        take_profit_pct: f64,
        stop_loss_pct: f64,
    },
    /// Multiples of ATR: BUY targets `close + take_profit * atr` and stops at
    /// `close - stop_loss * atr`; SELL mirrors.
    AtrMultiple { take_profit: f64, stop_loss: f64 },
}

impl Default for TargetModel {
    fn default() -> Self {
        TargetModel::FixedPercent {
            take_profit_pct: 0.03,
            stop_loss_pct: 0.02,
        }
    }
}

/// Take-profit and stop-loss for one signal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Targets {
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
}

impl TargetModel {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let factors = match *self {
            TargetModel::FixedPercent {
                take_profit_pct,
                stop_loss_pct,
            } => [
                ("take_profit_pct", take_profit_pct),
                ("stop_loss_pct", stop_loss_pct),
            ],
            TargetModel::AtrMultiple {
                take_profit,
                stop_loss,
            } => [("take_profit", take_profit), ("stop_loss", stop_loss)],
        };
        for (name, value) in factors {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::TargetMultiplier { name, value });
            }
        }
        Ok(())
    }

    /// Targets for a signal of `category` at `close`.
    ///
    /// HOLD never has targets. Under `AtrMultiple` an undefined ATR leaves
    /// both targets empty.
    pub fn targets(&self, category: SignalCategory, close: f64, atr: Option<f64>) -> Targets {
        let side = match category {
            SignalCategory::Buy => 1.0,
            SignalCategory::Sell => -1.0,
            SignalCategory::Hold => return Targets::default(),
        };
        match *self {
            TargetModel::FixedPercent {
                take_profit_pct,
                stop_loss_pct,
            } => Targets {
                take_profit: Some(close * (1.0 + side * take_profit_pct)),
                stop_loss: Some(close * (1.0 - side * stop_loss_pct)),
            },
            TargetModel::AtrMultiple {
                take_profit,
                stop_loss,
            } => match atr {
                Some(atr) => Targets {
                    take_profit: Some(close + side * take_profit * atr),
                    stop_loss: Some(close - side * stop_loss * atr),
                },
                None => Targets::default(),
            },
        }
    }
}
