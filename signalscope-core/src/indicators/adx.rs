//! ADX / +DI / -DI, Wilder's directional movement family.
//!
//! Steps:
//! 1. +DM and -DM from consecutive bars
//! 2. Wilder-smooth +DM, -DM and TR (alpha = 1/period)
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR), -DI likewise
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 5. ADX = Wilder-smoothed DX
//!
//! Lookback: period for the DI lines, 2 * period - 1 for ADX.

use super::atr::{true_range, wilder_smooth};
use super::Indicator;
use crate::domain::Bar;

/// Which line of the directional family to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdxLine {
    Adx,
    PlusDi,
    MinusDi,
}

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    line: AdxLine,
    name: String,
}

/// All three lines computed in one pass.
#[derive(Debug, Clone)]
pub struct DirectionalLines {
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
    pub adx: Vec<f64>,
}

impl Adx {
    pub fn new(period: usize, line: AdxLine) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        let prefix = match line {
            AdxLine::Adx => "adx",
            AdxLine::PlusDi => "plus_di",
            AdxLine::MinusDi => "minus_di",
        };
        Self {
            period,
            line,
            name: format!("{prefix}_{period}"),
        }
    }
}

/// Compute +DI, -DI and ADX for `bars`.
pub fn directional_lines(bars: &[Bar], period: usize) -> DirectionalLines {
    let n = bars.len();
    let mut plus_dm = vec![f64::NAN; n];
    let mut minus_dm = vec![f64::NAN; n];

    for i in 1..n {
        let up = bars[i].high - bars[i - 1].high;
        let down = bars[i - 1].low - bars[i].low;
        if up.is_nan() || down.is_nan() {
            continue;
        }
        plus_dm[i] = if up > down && up > 0.0 { up } else { 0.0 };
        minus_dm[i] = if down > up && down > 0.0 { down } else { 0.0 };
    }

    let smooth_tr = wilder_smooth(&true_range(bars), period);
    let smooth_plus = wilder_smooth(&plus_dm, period);
    let smooth_minus = wilder_smooth(&minus_dm, period);

    let mut plus_di = vec![f64::NAN; n];
    let mut minus_di = vec![f64::NAN; n];
    let mut dx = vec![f64::NAN; n];

    for i in 0..n {
        let tr = smooth_tr[i];
        if tr.is_nan() || smooth_plus[i].is_nan() || smooth_minus[i].is_nan() || tr == 0.0 {
            continue;
        }
        let p = 100.0 * smooth_plus[i] / tr;
        let m = 100.0 * smooth_minus[i] / tr;
        plus_di[i] = p;
        minus_di[i] = m;
        dx[i] = if p + m == 0.0 {
            0.0
        } else {
            100.0 * (p - m).abs() / (p + m)
        };
    }

    DirectionalLines {
        plus_di,
        minus_di,
        adx: wilder_smooth(&dx, period),
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            AdxLine::Adx => self.period.saturating_mul(2) - 1,
            AdxLine::PlusDi | AdxLine::MinusDi => self.period,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let lines = directional_lines(bars, self.period);
        match self.line {
            AdxLine::Adx => lines.adx,
            AdxLine::PlusDi => lines.plus_di,
            AdxLine::MinusDi => lines.minus_di,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bars_from_ohlc;

    fn choppy() -> Vec<Bar> {
        bars_from_ohlc(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0),
            (106.0, 107.0, 98.0, 99.0),
            (99.0, 103.0, 97.0, 101.0),
            (101.0, 106.0, 100.0, 105.0),
            (105.0, 110.0, 103.0, 108.0),
            (108.0, 112.0, 106.0, 110.0),
            (110.0, 111.0, 104.0, 105.0),
            (105.0, 109.0, 103.0, 107.0),
            (107.0, 113.0, 105.0, 112.0),
        ])
    }

    #[test]
    fn adx_bounds() {
        let lines = directional_lines(&choppy(), 3);
        for series in [&lines.adx, &lines.plus_di, &lines.minus_di] {
            for (i, &v) in series.iter().enumerate() {
                if !v.is_nan() {
                    assert!((0.0..=100.0).contains(&v), "out of bounds at bar {i}: {v}");
                }
            }
        }
    }

    #[test]
    fn warmup_matches_lookback() {
        let bars = choppy();
        for line in [AdxLine::Adx, AdxLine::PlusDi, AdxLine::MinusDi] {
            let adx = Adx::new(3, line);
            let result = adx.compute(&bars);
            let first = result.iter().position(|v| !v.is_nan()).unwrap();
            assert_eq!(first, adx.lookback(), "{line:?}");
        }
    }

    #[test]
    fn uptrend_plus_di_dominates() {
        let data: Vec<_> = (0..20)
            .map(|i| {
                let base = 100.0 + i as f64 * 5.0;
                (base - 1.0, base + 3.0, base - 3.0, base + 2.0)
            })
            .collect();
        let lines = directional_lines(&bars_from_ohlc(&data), 5);

        let last = lines.adx.len() - 1;
        assert!(lines.plus_di[last] > lines.minus_di[last]);
        assert!(lines.adx[last] > 20.0, "ADX should be elevated, got {}", lines.adx[last]);
    }

    #[test]
    fn names_and_lookback() {
        assert_eq!(Adx::new(14, AdxLine::Adx).name(), "adx_14");
        assert_eq!(Adx::new(14, AdxLine::MinusDi).name(), "minus_di_14");
        assert_eq!(Adx::new(14, AdxLine::Adx).lookback(), 27);
        assert_eq!(Adx::new(14, AdxLine::PlusDi).lookback(), 14);
    }

    #[test]
    fn huge_period_lookback_saturates() {
        let period = usize::MAX / 2 + 1;
        assert_eq!(Adx::new(period, AdxLine::Adx).lookback(), usize::MAX - 1);
        assert_eq!(Adx::new(period, AdxLine::PlusDi).lookback(), period);
    }

    #[test]
    fn too_few_bars() {
        let bars = bars_from_ohlc(&[(100.0, 105.0, 95.0, 102.0)]);
        let lines = directional_lines(&bars, 3);
        assert!(lines.adx.iter().all(|v| v.is_nan()));
    }
}
