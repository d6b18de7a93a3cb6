//! Canonical in-memory representation of a time-series bar (OHLCV).
//!
//! Every stage of the engine reads bars through this struct, regardless of
//! where they were loaded from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Width of the full-bar vector used by the series aligner.
pub const BAR_VECTOR_WIDTH: usize = 7;

/// A single time-series bar (OHLCV plus trade count and VWAP) for a given timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// The timestamp for this bar (UTC).
    pub timestamp: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Volume traded during the bar interval.
    pub volume: f64,

    /// Number of trades in the bar interval.
    pub trade_count: u64,

    /// Volume-weighted average price.
    pub vwap: f64,
}

impl Bar {
    /// Midpoint of the bar's range, `(high + low) / 2`.
    pub fn midpoint(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// Projects the bar into `(open, high, low, close, volume, trade_count, vwap)`.
    pub fn to_vector(&self) -> [f64; BAR_VECTOR_WIDTH] {
        [
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.trade_count as f64,
            self.vwap,
        ]
    }
}
