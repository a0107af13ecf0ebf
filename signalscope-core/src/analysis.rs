//! The analysis pipeline.
//!
//! validate → indicator bank → {levels, gaps} → signals → entry plan.
//! Each stage returns a fresh value; nothing is mutated after it is produced.

use log::{debug, warn};
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::domain::{Series, SeriesMeta};
use crate::entry::{plan_entry, EntryPlan};
use crate::error::{AnalysisError, Condition};
use crate::fingerprint::Fingerprint;
use crate::frame::{IndicatorBank, IndicatorFrame};
use crate::gaps::{detect_manipulation, scan_fair_value_gaps, GapZone, ManipulationReport};
use crate::levels::{detect_levels, Level};
use crate::signals::{Signal, SignalEngine, TrendAssessment};
use crate::validate::validate_series;

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub meta: SeriesMeta,
    pub frame: IndicatorFrame,
    pub levels: Vec<Level>,
    pub gap_zones: Vec<GapZone>,
    pub manipulation: Option<ManipulationReport>,
    /// One per bar.
    pub signals: Vec<Signal>,
    pub trend: Option<TrendAssessment>,
    pub entry_plan: Option<EntryPlan>,
    pub conditions: Vec<Condition>,
    pub fingerprint: Fingerprint,
}

impl AnalysisReport {
    /// The last `n` signals, oldest first.
    pub fn recent_signals(&self, n: usize) -> &[Signal] {
        &self.signals[self.signals.len().saturating_sub(n)..]
    }

    pub fn latest_signal(&self) -> Option<&Signal> {
        self.signals.last()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Run the full pipeline on `series`.
///
/// Fails only on an invalid configuration or series; everything else that
/// goes wrong is reported in [`AnalysisReport::conditions`].
pub fn analyze(series: &Series, config: &AnalysisConfig) -> Result<AnalysisReport, AnalysisError> {
    config.validate()?;
    let (series, mut conditions) = validate_series(series, config.min_bars)?;
    let bars = series.bars.as_slice();
    debug!(
        "analyze {} {}: {} bars, policy {:?}",
        series.meta.instrument,
        series.meta.interval,
        bars.len(),
        config.signal_policy
    );

    let bank = IndicatorBank::standard(config).compute(bars);
    if !bank.skipped.is_empty() {
        warn!("insufficient warm-up for {}", bank.skipped.join(", "));
        conditions.push(Condition::InsufficientWarmup {
            indicators: bank.skipped,
        });
    }
    let frame = bank.frame;

    let levels = match detect_levels(bars, config.lookback_window, config.histogram_bins) {
        Some(structure) => {
            if structure.is_degenerate() {
                warn!(
                    "degenerate window: swing high {} equals swing low {}",
                    structure.swing.swing_high, structure.swing.swing_low
                );
                conditions.push(Condition::DegenerateWindow {
                    swing_high: structure.swing.swing_high,
                    swing_low: structure.swing.swing_low,
                });
            }
            structure.levels
        }
        None => Vec::new(),
    };

    let gap_zones = scan_fair_value_gaps(bars, config.lookback_window);
    let manipulation = detect_manipulation(bars, config.lookback_window);

    let signals = SignalEngine::from_config(config).generate(&frame, bars);
    let trend = SignalEngine::assess_trend(&frame, bars);

    let entry_plan = bars
        .last()
        .and_then(|last| plan_entry(&gap_zones, last.close));

    Ok(AnalysisReport {
        meta: series.meta.clone(),
        frame,
        levels,
        gap_zones,
        manipulation,
        signals,
        trend,
        entry_plan,
        conditions,
        fingerprint: Fingerprint::of(series, config),
    })
}
