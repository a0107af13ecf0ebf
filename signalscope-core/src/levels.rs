//! Structural levels over a trailing lookback window.
//!
//! - Swing high / swing low: highest high and lowest low in the window.
//! - Equilibrium: their midpoint.
//! - Fibonacci retracements: `swing_high - r * (swing_high - swing_low)`.
//! - Support / resistance: histogram clustering of highs and lows
//!   ([`histogram_clusters`]). This is an approximate heuristic, sensitive to
//!   the bin count; it is not a mode finder.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::domain::Bar;

/// Retracement ratios, from swing high (0) to swing low (1).
pub const FIB_RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

/// Ranges narrower than this fraction of the price magnitude are treated as no
/// usable range.
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// Maximum support and resistance levels kept.
pub const MAX_CLUSTER_LEVELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevelKind {
    SwingHigh,
    SwingLow,
    Equilibrium,
    FibRetracement,
    Support,
    Resistance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub kind: LevelKind,
    pub price: f64,
    pub label: String,
}

impl Level {
    fn new(kind: LevelKind, price: f64, label: impl Into<String>) -> Self {
        Self {
            kind,
            price,
            label: label.into(),
        }
    }
}

/// Extremes of a window of bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingRange {
    pub swing_high: f64,
    pub swing_low: f64,
}

impl SwingRange {
    /// Extremes of `bars`, or `None` for an empty slice.
    pub fn of(bars: &[Bar]) -> Option<Self> {
        if bars.is_empty() {
            return None;
        }
        let swing_high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let swing_low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        Some(Self {
            swing_high,
            swing_low,
        })
    }

    pub fn span(&self) -> f64 {
        self.swing_high - self.swing_low
    }

    pub fn equilibrium(&self) -> f64 {
        (self.swing_high + self.swing_low) / 2.0
    }

    pub fn is_degenerate(&self) -> bool {
        is_negligible_span(self.swing_low, self.swing_high)
    }

    /// Retracement price for `ratio`; collapses onto the swing high when the
    /// range is degenerate.
    pub fn retracement(&self, ratio: f64) -> f64 {
        if self.is_degenerate() {
            self.swing_high
        } else {
            self.swing_high - ratio * self.span()
        }
    }
}

/// Support and resistance prices from [`histogram_clusters`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clusters {
    /// Ascending.
    pub support: Vec<f64>,
    /// Descending.
    pub resistance: Vec<f64>,
}

/// Everything the detector derives from one window.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralLevels {
    pub swing: SwingRange,
    pub levels: Vec<Level>,
}

impl StructuralLevels {
    pub fn is_degenerate(&self) -> bool {
        self.swing.is_degenerate()
    }

    pub fn of_kind(&self, kind: LevelKind) -> impl Iterator<Item = &Level> {
        self.levels.iter().filter(move |l| l.kind == kind)
    }
}

/// Derive levels from the trailing `lookback` bars.
///
/// Returns `None` only for an empty series.
pub fn detect_levels(bars: &[Bar], lookback: usize, bins: usize) -> Option<StructuralLevels> {
    let window = &bars[bars.len().saturating_sub(lookback)..];
    let swing = SwingRange::of(window)?;
    let last_close = window[window.len() - 1].close;

    let mut levels = vec![
        Level::new(LevelKind::SwingHigh, swing.swing_high, "swing_high"),
        Level::new(LevelKind::SwingLow, swing.swing_low, "swing_low"),
        Level::new(LevelKind::Equilibrium, swing.equilibrium(), "equilibrium"),
    ];
    levels.extend(fibonacci_levels(&swing));

    if swing.is_degenerate() {
        debug!(
            "levels: degenerate window at {}, skipping clustering",
            swing.swing_high
        );
    } else {
        let prices: Vec<f64> = window.iter().flat_map(|b| [b.high, b.low]).collect();
        let clusters = histogram_clusters(&prices, bins, last_close);
        for (i, price) in clusters.support.iter().enumerate() {
            levels.push(Level::new(
                LevelKind::Support,
                *price,
                format!("support_{}", i + 1),
            ));
        }
        for (i, price) in clusters.resistance.iter().enumerate() {
            levels.push(Level::new(
                LevelKind::Resistance,
                *price,
                format!("resistance_{}", i + 1),
            ));
        }
    }

    Some(StructuralLevels { swing, levels })
}

/// Retracement levels for every ratio in [`FIB_RATIOS`], highest first.
pub fn fibonacci_levels(swing: &SwingRange) -> Vec<Level> {
    FIB_RATIOS
        .iter()
        .map(|&ratio| {
            Level::new(
                LevelKind::FibRetracement,
                swing.retracement(ratio),
                format!("fib_{ratio}"),
            )
        })
        .collect()
}

/// Whether `lo..hi` is too narrow to split, measured against the larger
/// endpoint magnitude so that sub-unit price scales keep their levels.
fn is_negligible_span(lo: f64, hi: f64) -> bool {
    let scale = lo.abs().max(hi.abs());
    (hi - lo).abs() <= DEGENERATE_EPSILON * scale
}

/// Histogram support/resistance clustering.
///
/// `prices` is binned into `bins` equal-width bins spanning its min..max. A bin
/// is significant when its count exceeds the 75th percentile of all bin
/// counts. Significant local maxima become resistance, significant local
/// minima support; bins past either edge count as zero.
///
/// A run of adjacent bins with equal counts is one extremum, placed at the
/// centre of the run's bin nearest `reference_price` (lower bin on a tie).
/// At most [`MAX_CLUSTER_LEVELS`] of each are kept: the lowest supports and
/// the highest resistances.
pub fn histogram_clusters(prices: &[f64], bins: usize, reference_price: f64) -> Clusters {
    let lo = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;
    if bins == 0 || !span.is_finite() || is_negligible_span(lo, hi) {
        return Clusters::default();
    }

    let width = span / bins as f64;
    let mut counts = vec![0usize; bins];
    for &p in prices {
        let bin = (((p - lo) / width).floor() as usize).min(bins - 1);
        counts[bin] += 1;
    }
    let threshold = percentile(&counts, 0.75);
    let centre = |bin: usize| lo + (bin as f64 + 0.5) * width;

    let mut clusters = Clusters::default();
    let mut start = 0;
    while start < bins {
        let count = counts[start];
        let mut end = start;
        while end + 1 < bins && counts[end + 1] == count {
            end += 1;
        }

        if count as f64 > threshold {
            let left = if start > 0 { counts[start - 1] } else { 0 };
            let right = if end + 1 < bins { counts[end + 1] } else { 0 };
            let representative = (start..=end)
                .map(centre)
                .min_by(|a, b| {
                    (a - reference_price)
                        .abs()
                        .total_cmp(&(b - reference_price).abs())
                })
                .unwrap_or_else(|| centre(start));

            if count > left && count > right {
                clusters.resistance.push(representative);
            } else if count < left && count < right {
                clusters.support.push(representative);
            }
        }
        start = end + 1;
    }

    clusters.support.sort_by(f64::total_cmp);
    clusters.support.truncate(MAX_CLUSTER_LEVELS);
    clusters.resistance.sort_by(|a, b| b.total_cmp(a));
    clusters.resistance.truncate(MAX_CLUSTER_LEVELS);
    clusters
}

/// Percentile with linear interpolation between closest ranks.
fn percentile(counts: &[usize], q: f64) -> f64 {
    let mut sorted: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
    sorted.sort_by(f64::total_cmp);
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = q * (sorted.len() - 1) as f64;
    let below = rank.floor() as usize;
    let above = rank.ceil() as usize;
    sorted[below] + (sorted[above] - sorted[below]) * (rank - below as f64)
}
