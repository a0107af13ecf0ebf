//! Series: an ordered run of bars for one instrument.

use serde::{Deserialize, Serialize};

use super::Bar;

/// Source metadata attached by the data-fetch layer.
///
/// Carried through to the report untouched; the analysis never interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMeta {
    pub instrument: String,
    pub interval: String,
}

impl SeriesMeta {
    pub fn new(instrument: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            interval: interval.into(),
        }
    }
}

/// Bars ordered by timestamp plus their source metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub meta: SeriesMeta,
    pub bars: Vec<Bar>,
}

impl Series {
    pub fn new(meta: SeriesMeta, bars: Vec<Bar>) -> Self {
        Self { meta, bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// The trailing `window` bars (or all of them if the series is shorter),
    /// together with the absolute index of the first returned bar.
    pub fn tail(&self, window: usize) -> (usize, &[Bar]) {
        let start = self.bars.len().saturating_sub(window);
        (start, &self.bars[start..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bars_from_closes;

    #[test]
    fn tail_clamps_to_length() {
        let series = Series::new(SeriesMeta::default(), bars_from_closes(&[1.0, 2.0, 3.0]));
        let (start, bars) = series.tail(10);
        assert_eq!(start, 0);
        assert_eq!(bars.len(), 3);

        let (start, bars) = series.tail(2);
        assert_eq!(start, 1);
        assert_eq!(bars[0].close, 2.0);
    }
}
