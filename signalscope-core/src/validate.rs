//! Series validation.
//!
//! Hard failures: too few bars, non-finite OHLC, negative or infinite volume,
//! timestamps that do not strictly increase.
//! Soft findings (returned as conditions): OHLC envelope violations and bars
//! without volume. Computation proceeds on those bars as given.

use log::warn;

use crate::domain::Series;
use crate::error::{Condition, SeriesError};

/// Absolute floor for `min_bars`; differencing needs at least two bars.
pub const MIN_BARS_FLOOR: usize = 2;

/// Check `series` against the input invariants.
///
/// Returns the series unchanged plus the soft findings, or the first hard
/// violation encountered.
pub fn validate_series(
    series: &Series,
    min_bars: usize,
) -> Result<(&Series, Vec<Condition>), SeriesError> {
    let len = series.len();
    let min = min_bars.max(MIN_BARS_FLOOR);
    if len < min {
        return Err(SeriesError::TooShort { len, min });
    }

    let mut conditions = Vec::new();
    let mut missing_volume = 0;

    for (index, bar) in series.bars.iter().enumerate() {
        for (field, value) in [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ] {
            if !value.is_finite() {
                return Err(SeriesError::NonFinite { index, field });
            }
        }

        if bar.volume.is_nan() {
            missing_volume += 1;
        } else if bar.volume.is_infinite() || bar.volume < 0.0 {
            return Err(SeriesError::BadVolume {
                index,
                volume: bar.volume,
            });
        }

        if index > 0 && bar.timestamp <= series.bars[index - 1].timestamp {
            return Err(SeriesError::NotIncreasing { index });
        }

        if !bar.is_sane() {
            warn!("bar {index}: open/close outside high/low range");
            conditions.push(Condition::OhlcEnvelopeViolation { index });
        }
    }

    if missing_volume > 0 {
        warn!("{missing_volume} bars carry no volume");
        conditions.push(Condition::VolumeUnavailable {
            bars: missing_volume,
        });
    }

    Ok((series, conditions))
}
