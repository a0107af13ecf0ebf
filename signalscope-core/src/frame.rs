//! Indicator frame and the bank that fills it.
//!
//! The bank is a small pipeline builder: an ordered list of
//! `(column, indicator)` pairs. Each indicator returns a fresh column aligned
//! with the bars; nothing is mutated in place. Columns are independent, so they
//! are computed in parallel and collected back in declaration order, which
//! gives the same frame as a sequential pass.

use chrono::{DateTime, Utc};
use log::debug;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::AnalysisConfig;
use crate::domain::Bar;
use crate::indicators::{
    Adx, AdxLine, Atr, Bollinger, BollingerBand, FisherTransform, Ichimoku, IchimokuLine,
    Indicator, Macd, MacdLine, Mfi, ParabolicSar, Roc, Rsi, Stochastic, StochasticLine,
};

/// Column names of the standard bank.
pub mod columns {
    pub const RSI: &str = "rsi";
    pub const MOMENTUM: &str = "momentum";
    pub const ROC: &str = "roc";
    pub const PSAR: &str = "psar";
    pub const ADX: &str = "adx";
    pub const PLUS_DI: &str = "plus_di";
    pub const MINUS_DI: &str = "minus_di";
    pub const MFI: &str = "mfi";
    pub const MACD: &str = "macd";
    pub const MACD_SIGNAL: &str = "macd_signal";
    pub const FISHER: &str = "fisher";
    pub const BB_UPPER: &str = "bb_upper";
    pub const BB_MIDDLE: &str = "bb_middle";
    pub const BB_LOWER: &str = "bb_lower";
    pub const ATR: &str = "atr";
    pub const ICHIMOKU_CONVERSION: &str = "ichimoku_conversion";
    pub const ICHIMOKU_BASE: &str = "ichimoku_base";
    pub const ICHIMOKU_A: &str = "ichimoku_a";
    pub const ICHIMOKU_B: &str = "ichimoku_b";
    pub const STOCH_K: &str = "stoch_k";
    pub const STOCH_D: &str = "stoch_d";
}

/// Momentum and ROC periods under the dashboard's legacy naming.
pub const MOMENTUM_PERIOD: usize = 10;
pub const ROC_PERIOD: usize = 5;

/// Named indicator columns aligned to a bar series.
///
/// The frame holds the bar timestamps as its index and the indicator columns
/// only; OHLCV values stay in the [`Series`](crate::domain::Series) the frame
/// was computed from. Every column has one entry per bar. Warm-up rows are `NaN` internally and
/// surface as `None` from [`IndicatorFrame::get`] and `null` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorFrame {
    index: Vec<DateTime<Utc>>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl IndicatorFrame {
    pub fn new(bars: &[Bar]) -> Self {
        Self {
            index: bars.iter().map(|b| b.timestamp).collect(),
            columns: BTreeMap::new(),
        }
    }

    /// Add a column. Panics if its length differs from the frame's.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        let name = name.into();
        assert_eq!(
            values.len(),
            self.index.len(),
            "column '{name}' has {} values for {} bars",
            values.len(),
            self.index.len()
        );
        self.columns.insert(name, values);
    }

    /// Value of `name` at `bar_index`, or `None` if the column is absent, the
    /// index is out of range, or the row is still in warm-up.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.columns
            .get(name)
            .and_then(|v| v.get(bar_index).copied())
            .filter(|v| !v.is_nan())
    }

    /// Full column for `name`.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Column names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    /// Number of rows (bars).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Outcome of running the bank: the frame plus the columns that were left out
/// because the series is too short for their warm-up.
#[derive(Debug, Clone)]
pub struct BankOutput {
    pub frame: IndicatorFrame,
    pub skipped: Vec<String>,
}

/// Ordered set of column-producing indicators.
#[derive(Default)]
pub struct IndicatorBank {
    entries: Vec<(String, Box<dyn Indicator>)>,
}

impl IndicatorBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `indicator` under the column name `column`.
    pub fn with(mut self, column: impl Into<String>, indicator: impl Indicator + 'static) -> Self {
        self.entries.push((column.into(), Box::new(indicator)));
        self
    }

    /// The full bank used by the analysis pipeline.
    pub fn standard(config: &AnalysisConfig) -> Self {
        use columns::*;

        let adx = config.adx_window;
        Self::new()
            .with(RSI, Rsi::new(config.rsi_window))
            .with(MOMENTUM, Roc::new(MOMENTUM_PERIOD))
            .with(ROC, Roc::new(ROC_PERIOD))
            .with(PSAR, ParabolicSar::default_params())
            .with(ADX, Adx::new(adx, AdxLine::Adx))
            .with(PLUS_DI, Adx::new(adx, AdxLine::PlusDi))
            .with(MINUS_DI, Adx::new(adx, AdxLine::MinusDi))
            .with(MFI, Mfi::new(config.mfi_window))
            .with(MACD, Macd::default_params(MacdLine::Macd))
            .with(MACD_SIGNAL, Macd::default_params(MacdLine::Signal))
            .with(FISHER, FisherTransform::new(config.fisher_window))
            .with(BB_UPPER, Bollinger::new(20, 2.0, BollingerBand::Upper))
            .with(BB_MIDDLE, Bollinger::new(20, 2.0, BollingerBand::Middle))
            .with(BB_LOWER, Bollinger::new(20, 2.0, BollingerBand::Lower))
            .with(ATR, Atr::new(14))
            .with(
                ICHIMOKU_CONVERSION,
                Ichimoku::default_params(IchimokuLine::Conversion),
            )
            .with(ICHIMOKU_BASE, Ichimoku::default_params(IchimokuLine::Base))
            .with(ICHIMOKU_A, Ichimoku::default_params(IchimokuLine::SpanA))
            .with(ICHIMOKU_B, Ichimoku::default_params(IchimokuLine::SpanB))
            .with(STOCH_K, Stochastic::new(14, 3, StochasticLine::K))
            .with(STOCH_D, Stochastic::new(14, 3, StochasticLine::D))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest lookback across the bank.
    pub fn warmup(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, ind)| ind.lookback())
            .max()
            .unwrap_or(0)
    }

    /// Compute every column whose warm-up fits inside `bars`.
    pub fn compute(&self, bars: &[Bar]) -> BankOutput {
        let n = bars.len();
        let results: Vec<(&str, Option<Vec<f64>>)> = self
            .entries
            .par_iter()
            .map(|(column, indicator)| {
                let values = (n > indicator.lookback()).then(|| indicator.compute(bars));
                (column.as_str(), values)
            })
            .collect();

        let mut frame = IndicatorFrame::new(bars);
        let mut skipped = Vec::new();
        for (column, values) in results {
            match values {
                Some(values) => frame.insert(column, values),
                None => skipped.push(column.to_string()),
            }
        }

        debug!(
            "indicator bank: {} columns over {n} bars, {} skipped",
            frame.columns.len(),
            skipped.len()
        );
        BankOutput { frame, skipped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::Ema;
    use crate::test_support::{assert_approx, bars_from_closes, DEFAULT_EPSILON};

    #[test]
    fn frame_get_hides_warmup() {
        let bars = bars_from_closes(&[10.0, 11.0, 12.0]);
        let mut frame = IndicatorFrame::new(&bars);
        frame.insert("ema", vec![f64::NAN, 10.5, 11.5]);

        assert_eq!(frame.get("ema", 0), None);
        assert_eq!(frame.get("ema", 1), Some(10.5));
        assert_eq!(frame.get("ema", 3), None);
        assert_eq!(frame.get("missing", 1), None);
    }

    #[test]
    fn frame_indexes_bar_timestamps_without_price_columns() {
        let bars = bars_from_closes(&[10.0, 11.0, 12.0]);
        let mut frame = IndicatorFrame::new(&bars);
        frame.insert("ema", vec![f64::NAN, 10.5, 11.5]);

        let stamps: Vec<_> = bars.iter().map(|b| b.timestamp).collect();
        assert_eq!(frame.index(), stamps.as_slice());
        assert_eq!(frame.names().collect::<Vec<_>>(), vec!["ema"]);
        assert!(!frame.contains("close"));
    }

    #[test]
    #[should_panic(expected = "column 'short'")]
    fn frame_rejects_misaligned_column() {
        let bars = bars_from_closes(&[10.0, 11.0, 12.0]);
        let mut frame = IndicatorFrame::new(&bars);
        frame.insert("short", vec![1.0]);
    }

    #[test]
    fn bank_computes_in_declaration_order() {
        let bars = bars_from_closes(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let out = IndicatorBank::new()
            .with("fast", Ema::new(2))
            .with("slow", Ema::new(3))
            .compute(&bars);

        assert!(out.skipped.is_empty());
        assert_approx(out.frame.get("slow", 2).unwrap(), 11.0, DEFAULT_EPSILON);
        assert_eq!(out.frame.names().collect::<Vec<_>>(), vec!["fast", "slow"]);
    }

    #[test]
    fn bank_skips_columns_without_enough_bars() {
        let bars = bars_from_closes(&[10.0, 11.0, 12.0]);
        let out = IndicatorBank::new()
            .with("ok", Ema::new(3))
            .with("too_long", Ema::new(4))
            .compute(&bars);

        assert!(out.frame.contains("ok"));
        assert!(!out.frame.contains("too_long"));
        assert_eq!(out.skipped, vec!["too_long".to_string()]);
    }

    #[test]
    fn standard_bank_warmup() {
        let bank = IndicatorBank::standard(&AnalysisConfig::default());
        assert_eq!(bank.len(), 21);
        // Ichimoku span B (52) dominates
        assert_eq!(bank.warmup(), 51);
    }

    #[test]
    fn standard_bank_serializes_warmup_as_null() {
        let bars = bars_from_closes(&(0..40).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let out = IndicatorBank::standard(&AnalysisConfig::default()).compute(&bars);
        let json = serde_json::to_value(&out.frame).unwrap();
        assert!(json["columns"]["rsi"][0].is_null());
        assert!(json["columns"]["rsi"][14].is_number());
        assert!(out.skipped.contains(&"ichimoku_b".to_string()));
    }
}
