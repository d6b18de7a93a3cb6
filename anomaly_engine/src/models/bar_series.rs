//! A time-ordered collection of bars for one ticker.

use chrono::{DateTime, Utc};
use serde::Serialize;
use snafu::ensure;

use crate::{
    errors::{DataUnavailableSnafu, Result, UnorderedSeriesSnafu},
    models::bar::Bar,
};

/// Represents a complete set of time-series data for a single symbol.
///
/// Bars are strictly increasing by timestamp and the series is never empty.
/// Both are checked once by [`BarSeries::new`]; nothing in the engine mutates a
/// series afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Builds a series, validating the ordering invariant.
    ///
    /// # Errors
    /// * [`DataUnavailable`](crate::errors::EngineError::DataUnavailable) if `bars` is empty.
    /// * [`UnorderedSeries`](crate::errors::EngineError::UnorderedSeries) if a timestamp is not
    ///   strictly greater than its predecessor.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self> {
        let symbol = symbol.into();
        ensure!(!bars.is_empty(), DataUnavailableSnafu { ticker: symbol });

        if let Some(index) = bars
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return UnorderedSeriesSnafu {
                ticker: symbol,
                index: index + 1,
            }
            .fail();
        }

        Ok(Self { symbol, bars })
    }

    /// The ticker this data represents (e.g., "TSLA").
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.bars.iter().map(|b| b.timestamp)
    }

    /// Index of the bar nearest to `at`.
    ///
    /// An exact match wins; otherwise the bar with the smallest absolute time
    /// difference is chosen, and on a tie the earlier bar.
    pub fn nearest_index(&self, at: DateTime<Utc>) -> usize {
        let after = self.bars.partition_point(|b| b.timestamp < at);
        if after == 0 {
            return 0;
        }
        if after == self.bars.len() {
            return after - 1;
        }
        let before = after - 1;
        let gap_before = at - self.bars[before].timestamp;
        let gap_after = self.bars[after].timestamp - at;
        // exact hits land on `after` with a zero gap
        if gap_after < gap_before { after } else { before }
    }
}
