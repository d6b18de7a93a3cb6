//! Per-event distance against a reference series.

use chrono::{DateTime, Utc};

use crate::models::{BarSeries, EventDistance};

/// Scores each anomaly timestamp against `reference`.
///
/// The anomaly price is the close of the `source` bar at (or nearest to) the
/// timestamp; it is compared with the close of the `reference` bar at (or
/// nearest to) the same timestamp. Nearest-time ties go to the earlier bar.
/// Output order follows `times`.
pub fn localize_events(
    source: &BarSeries,
    reference: &BarSeries,
    times: &[DateTime<Utc>],
) -> Vec<EventDistance> {
    times
        .iter()
        .map(|&at| {
            let src = &source.bars()[source.nearest_index(at)];
            let matched = &reference.bars()[reference.nearest_index(at)];
            EventDistance {
                timestamp: at,
                distance: (src.close - matched.close).abs(),
                reference_time: matched.timestamp,
            }
        })
        .collect()
}
