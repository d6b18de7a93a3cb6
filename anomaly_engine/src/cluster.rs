//! Merging outlier rows into anomaly events.
//!
//! Outlier rows are walked once in time order. A row joins the current event
//! when it is within the policy's merge window of the previous outlier;
//! otherwise it opens a new event.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::{
    config::EventPolicy,
    models::{AnomalyEvent, OutlierLabel},
};

/// Groups outlier-labelled rows into events. `labels` must be in ascending time order.
///
/// No outliers yields an empty list.
pub fn cluster_events(labels: &[OutlierLabel], policy: &EventPolicy) -> Vec<AnomalyEvent> {
    let window = policy.merge_window();
    let mut events = Vec::new();
    let mut current: Vec<&OutlierLabel> = Vec::new();

    for label in labels.iter().filter(|l| l.is_outlier) {
        if let Some(last) = current.last() {
            if label.timestamp - last.timestamp > window {
                events.push(summarize(&current, policy));
                current.clear();
            }
        }
        current.push(label);
    }
    if !current.is_empty() {
        events.push(summarize(&current, policy));
    }

    debug!(events = events.len(), "clustered outlier rows");
    events
}

fn summarize(members: &[&OutlierLabel], policy: &EventPolicy) -> AnomalyEvent {
    let median = median_time(members);
    let magnitude = members.iter().map(|m| m.midpoint).sum::<f64>() / members.len() as f64;
    AnomalyEvent {
        time: round_to(median, policy.round_to()),
        magnitude,
        members: members.len(),
    }
}

/// Members are time-sorted, so the middle element(s) are the median.
fn median_time(members: &[&OutlierLabel]) -> DateTime<Utc> {
    let mid = members.len() / 2;
    if members.len() % 2 == 1 {
        members[mid].timestamp
    } else {
        let (a, b) = (members[mid - 1].timestamp, members[mid].timestamp);
        a + (b - a) / 2
    }
}

/// Rounds `t` to the nearest multiple of `step` since the Unix epoch; exact halves round up.
pub fn round_to(t: DateTime<Utc>, step: TimeDelta) -> DateTime<Utc> {
    let step_ms = step.num_milliseconds();
    if step_ms <= 0 {
        return t;
    }
    let since_ms = (t - DateTime::<Utc>::UNIX_EPOCH).num_milliseconds();
    let rem = since_ms.rem_euclid(step_ms);
    let floor_ms = since_ms - rem;
    let rounded_ms = if rem * 2 >= step_ms {
        floor_ms + step_ms
    } else {
        floor_ms
    };
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::milliseconds(rounded_ms)
}
