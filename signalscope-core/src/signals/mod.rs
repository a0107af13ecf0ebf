//! Per-bar BUY/SELL/HOLD signals and the latest-bar trend assessment.
//!
//! Signals depend only on the indicator frame and the bars. The policy set is
//! closed: [`SignalPolicy::Threshold`] and [`SignalPolicy::MajorityVote`].

pub mod rules;
pub mod targets;

pub use rules::{Readings, VoteCondition, VOTE_QUORUM};
pub use targets::{TargetModel, Targets};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::domain::Bar;
use crate::frame::IndicatorFrame;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalPolicy {
    /// All five oversold (or overbought) conditions at once.
    #[default]
    Threshold,
    /// At least [`VOTE_QUORUM`] of six trend conditions.
    MajorityVote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalCategory {
    Buy,
    Sell,
    Hold,
}

/// Recommendation for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub index: usize,
    pub category: SignalCategory,
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
}

impl Signal {
    pub fn hold(index: usize) -> Self {
        Self {
            index,
            category: SignalCategory::Hold,
            take_profit: None,
            stop_loss: None,
        }
    }
}

/// Majority-vote reading of the latest bar, reported whatever policy drives
/// the per-bar signals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAssessment {
    pub index: usize,
    pub bullish_count: usize,
    pub bearish_count: usize,
    pub category: SignalCategory,
    pub bullish: Vec<VoteCondition>,
    pub bearish: Vec<VoteCondition>,
}

/// Majority-vote decision. BUY wins when both sides reach the quorum.
pub fn decide_vote(bullish_count: usize, bearish_count: usize) -> SignalCategory {
    if bullish_count >= VOTE_QUORUM {
        SignalCategory::Buy
    } else if bearish_count >= VOTE_QUORUM {
        SignalCategory::Sell
    } else {
        SignalCategory::Hold
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalEngine {
    policy: SignalPolicy,
    targets: TargetModel,
}

impl SignalEngine {
    pub fn new(policy: SignalPolicy, targets: TargetModel) -> Self {
        Self { policy, targets }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.signal_policy, config.targets)
    }

    pub fn policy(&self) -> SignalPolicy {
        self.policy
    }

    pub fn classify(&self, readings: &Readings) -> SignalCategory {
        match self.policy {
            SignalPolicy::Threshold => {
                if rules::threshold_buy(readings) {
                    SignalCategory::Buy
                } else if rules::threshold_sell(readings) {
                    SignalCategory::Sell
                } else {
                    SignalCategory::Hold
                }
            }
            SignalPolicy::MajorityVote => decide_vote(
                rules::count_met(&rules::bullish_conditions(readings)),
                rules::count_met(&rules::bearish_conditions(readings)),
            ),
        }
    }

    pub fn signal_at(&self, frame: &IndicatorFrame, bars: &[Bar], index: usize) -> Signal {
        let readings = Readings::at(frame, bars, index);
        let category = self.classify(&readings);
        let targets = self.targets.targets(category, readings.close, readings.atr);
        Signal {
            index,
            category,
            take_profit: targets.take_profit,
            stop_loss: targets.stop_loss,
        }
    }

    /// One signal per bar, in bar order.
    pub fn generate(&self, frame: &IndicatorFrame, bars: &[Bar]) -> Vec<Signal> {
        let signals: Vec<Signal> = (0..bars.len())
            .map(|i| self.signal_at(frame, bars, i))
            .collect();
        debug!(
            "signals ({:?}): {} buy, {} sell over {} bars",
            self.policy,
            signals.iter().filter(|s| s.category == SignalCategory::Buy).count(),
            signals.iter().filter(|s| s.category == SignalCategory::Sell).count(),
            bars.len()
        );
        signals
    }

    /// Majority-vote assessment of the last bar; `None` for no bars.
    pub fn assess_trend(frame: &IndicatorFrame, bars: &[Bar]) -> Option<TrendAssessment> {
        let index = bars.len().checked_sub(1)?;
        let readings = Readings::at(frame, bars, index);
        let bullish = rules::bullish_conditions(&readings).to_vec();
        let bearish = rules::bearish_conditions(&readings).to_vec();
        let bullish_count = rules::count_met(&bullish);
        let bearish_count = rules::count_met(&bearish);
        Some(TrendAssessment {
            index,
            bullish_count,
            bearish_count,
            category: decide_vote(bullish_count, bearish_count),
            bullish,
            bearish,
        })
    }
}
