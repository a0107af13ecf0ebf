//! Zone-anchored entry plan.

use serde::{Deserialize, Serialize};

use crate::gaps::{GapKind, GapZone};

/// Zones considered, counted back from the most recent.
pub const RECENT_ZONES: usize = 10;

/// Reward as a multiple of the zone width.
pub const REWARD_WIDTHS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntryPlan {
    pub zone: GapZone,
    pub direction: Direction,
    pub entry: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub risk_reward: f64,
}

impl EntryPlan {
    /// Plan anchored on `zone`: risk one zone width, target two.
    ///
    /// `risk_reward` is `|take_profit - entry| / |entry - stop_loss|`. Both
    /// distances are multiples of the same width, so the ratio is taken from
    /// the multiples and is exactly [`REWARD_WIDTHS`] rather than a value
    /// perturbed by rounding in the price arithmetic.
    pub fn from_zone(zone: GapZone) -> Self {
        let width = zone.width();
        let (direction, entry, side) = match zone.kind {
            GapKind::Demand => (Direction::Long, zone.lower_price, 1.0),
            GapKind::Supply => (Direction::Short, zone.upper_price, -1.0),
        };
        let risk = width;
        let reward = REWARD_WIDTHS * width;
        Self {
            zone,
            direction,
            entry,
            take_profit: entry + side * reward,
            stop_loss: entry - side * risk,
            risk_reward: reward / risk,
        }
    }
}

/// Choose a zone for `close` and build its plan.
///
/// Among the [`RECENT_ZONES`] most recent zones, the most recent one whose
/// band contains `close` wins. Failing that, the zone with the nearest edge;
/// equal distances go to the more recent zone. `zones` must be oldest first.
pub fn plan_entry(zones: &[GapZone], close: f64) -> Option<EntryPlan> {
    let recent = &zones[zones.len().saturating_sub(RECENT_ZONES)..];

    let containing = recent.iter().rev().find(|z| z.contains(close));
    let chosen = containing.or_else(|| {
        recent
            .iter()
            .rev()
            .reduce(|best, z| {
                if z.distance(close) < best.distance(close) {
                    z
                } else {
                    best
                }
            })
    })?;

    Some(EntryPlan::from_zone(*chosen))
}
