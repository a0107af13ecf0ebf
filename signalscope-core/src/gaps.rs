//! Fair-value gaps and tail manipulation checks.
//!
//! A fair-value gap is a three-bar pattern where the third bar's range does
//! not overlap the first bar's range:
//!
//! - DEMAND: `low[i] > high[i-2]`, zone `[high[i-2], low[i]]`
//! - SUPPLY: `high[i] < low[i-2]`, zone `[high[i], low[i-2]]`

use log::debug;
use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::levels::SwingRange;

/// Tail volume above this multiple of the reference mean is a spike.
pub const VOLUME_SPIKE_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GapKind {
    Demand,
    Supply,
}

/// Price band left by a fair-value gap. Indices are positions in the full
/// series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapZone {
    pub start_index: usize,
    pub end_index: usize,
    pub kind: GapKind,
    pub lower_price: f64,
    pub upper_price: f64,
}

impl GapZone {
    pub fn width(&self) -> f64 {
        self.upper_price - self.lower_price
    }

    /// Inclusive of both edges.
    pub fn contains(&self, price: f64) -> bool {
        self.lower_price <= price && price <= self.upper_price
    }

    /// Distance from `price` to the nearer edge.
    pub fn distance(&self, price: f64) -> f64 {
        (price - self.lower_price)
            .abs()
            .min((price - self.upper_price).abs())
    }
}

/// Scan the trailing `lookback` bars for fair-value gaps, oldest first.
///
/// Zones may overlap; each qualifying triple yields its own zone.
pub fn scan_fair_value_gaps(bars: &[Bar], lookback: usize) -> Vec<GapZone> {
    let offset = bars.len().saturating_sub(lookback);
    let zones: Vec<GapZone> = (offset + 2..bars.len())
        .filter_map(|i| {
            let first = &bars[i - 2];
            let third = &bars[i];
            if third.low > first.high {
                Some(GapZone {
                    start_index: i - 2,
                    end_index: i,
                    kind: GapKind::Demand,
                    lower_price: first.high,
                    upper_price: third.low,
                })
            } else if third.high < first.low {
                Some(GapZone {
                    start_index: i - 2,
                    end_index: i,
                    kind: GapKind::Supply,
                    lower_price: third.high,
                    upper_price: first.low,
                })
            } else {
                None
            }
        })
        .collect();
    debug!("gap scan: {} zones from bar {offset}", zones.len());
    zones
}

/// Tail-bar checks against the window preceding it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ManipulationReport {
    /// Tail high pierced the reference swing high but closed back below it.
    pub liquidity_grab_up: bool,
    /// Tail low pierced the reference swing low but closed back above it.
    pub liquidity_grab_down: bool,
    /// `None` when volume is unavailable on the tail or reference bars.
    pub volume_spike: Option<bool>,
    pub reference_high: f64,
    pub reference_low: f64,
    pub mean_volume: Option<f64>,
}

/// Compare the last bar with the `lookback` bars before it.
///
/// Returns `None` when there is no bar before the tail.
pub fn detect_manipulation(bars: &[Bar], lookback: usize) -> Option<ManipulationReport> {
    let (tail, history) = bars.split_last()?;
    let reference = &history[history.len().saturating_sub(lookback)..];
    let swing = SwingRange::of(reference)?;

    let mean_volume = if tail.has_volume() && reference.iter().all(Bar::has_volume) {
        Some(reference.iter().map(|b| b.volume).sum::<f64>() / reference.len() as f64)
    } else {
        None
    };

    Some(ManipulationReport {
        liquidity_grab_up: tail.high > swing.swing_high && tail.close < swing.swing_high,
        liquidity_grab_down: tail.low < swing.swing_low && tail.close > swing.swing_low,
        volume_spike: mean_volume.map(|mean| tail.volume > VOLUME_SPIKE_FACTOR * mean),
        reference_high: swing.swing_high,
        reference_low: swing.swing_low,
        mean_volume,
    })
}
