//! Result types produced by the detection and comparison stages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inlier/outlier tag for one scored feature row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierLabel {
    /// Timestamp of the bar the row was derived from.
    pub timestamp: DateTime<Utc>,
    /// `(high + low) / 2` of that bar.
    pub midpoint: f64,
    /// Isolation Forest anomaly score in `(0, 1]`; higher is more anomalous.
    pub score: f64,
    pub is_outlier: bool,
}

/// One or more temporally adjacent outlier rows reduced to a single point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyEvent {
    /// Median member timestamp, rounded to the event policy's granularity.
    pub time: DateTime<Utc>,
    /// Mean midpoint price of the members.
    pub magnitude: f64,
    /// Number of outlier rows merged into this event.
    pub members: usize,
}

/// Output of the series aligner for one pair of series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentResult {
    /// Minimum cumulative alignment cost, never negative.
    pub distance: f64,
    /// Warping path as `(index_in_first, index_in_second)`, from `(0, 0)` to the last pair.
    pub path: Vec<(usize, usize)>,
}

/// Distance between an anomaly's price and the nearest reference bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDistance {
    /// The anomaly timestamp this distance belongs to.
    pub timestamp: DateTime<Utc>,
    pub distance: f64,
    /// Timestamp of the reference bar that was matched.
    pub reference_time: DateTime<Utc>,
}
