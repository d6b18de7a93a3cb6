//! In-memory [`SeriesSource`] + [`AnomalySink`].

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::{
    errors::{DataUnavailableSnafu, Result},
    io::{AnomalySink, SeriesSource},
    models::{AnomalyEvent, BarSeries, EventDistance},
};

/// A stored anomaly row.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAnomaly {
    pub magnitude: f64,
    /// Reference ticker the distance was computed against.
    pub reference: Option<String>,
    pub distance: Option<f64>,
}

/// Keeps series and anomaly rows in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    series: HashMap<String, BarSeries>,
    anomalies: HashMap<String, BTreeMap<DateTime<Utc>, StoredAnomaly>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the series for its symbol.
    pub fn insert_series(&mut self, series: BarSeries) {
        self.series.insert(series.symbol().to_string(), series);
    }

    /// Stored anomaly rows for `ticker`, keyed by time.
    pub fn anomalies(&self, ticker: &str) -> Option<&BTreeMap<DateTime<Utc>, StoredAnomaly>> {
        self.anomalies.get(ticker)
    }
}

impl SeriesSource for InMemoryStore {
    fn load_series(&mut self, ticker: &str) -> Result<BarSeries> {
        match self.series.get(ticker) {
            Some(series) => Ok(series.clone()),
            None => DataUnavailableSnafu { ticker }.fail(),
        }
    }

    fn load_event_times(&mut self, ticker: &str) -> Result<Vec<DateTime<Utc>>> {
        Ok(self
            .anomalies
            .get(ticker)
            .map(|rows| rows.keys().copied().collect())
            .unwrap_or_default())
    }
}

impl AnomalySink for InMemoryStore {
    fn record_events(&mut self, ticker: &str, events: &[AnomalyEvent]) -> Result<usize> {
        let rows = self.anomalies.entry(ticker.to_string()).or_default();
        let mut inserted = 0;
        for event in events {
            if !rows.contains_key(&event.time) {
                rows.insert(
                    event.time,
                    StoredAnomaly {
                        magnitude: event.magnitude,
                        reference: None,
                        distance: None,
                    },
                );
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    fn record_distances(
        &mut self,
        ticker: &str,
        reference: &str,
        distances: &[EventDistance],
    ) -> Result<usize> {
        let Some(rows) = self.anomalies.get_mut(ticker) else {
            return Ok(0);
        };
        let mut updated = 0;
        for d in distances {
            if let Some(row) = rows.get_mut(&d.timestamp) {
                row.reference = Some(reference.to_string());
                row.distance = Some(d.distance);
                updated += 1;
            }
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;
    use chrono::TimeZone;

    fn event(hour: u32, magnitude: f64) -> AnomalyEvent {
        AnomalyEvent {
            time: Utc.with_ymd_and_hms(2024, 4, 2, hour, 0, 0).unwrap(),
            magnitude,
            members: 1,
        }
    }

    #[test]
    fn reinserting_an_event_is_a_noop() {
        let mut store = InMemoryStore::new();
        assert_eq!(store.record_events("TSLA", &[event(10, 1.0), event(12, 2.0)]).unwrap(), 2);
        assert_eq!(store.record_events("TSLA", &[event(10, 9.0)]).unwrap(), 0);

        let rows = store.anomalies("TSLA").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[&event(10, 0.0).time].magnitude, 1.0);
    }

    #[test]
    fn same_time_different_ticker_is_distinct() {
        let mut store = InMemoryStore::new();
        store.record_events("TSLA", &[event(10, 1.0)]).unwrap();
        assert_eq!(store.record_events("AAPL", &[event(10, 1.0)]).unwrap(), 1);
    }

    #[test]
    fn distances_update_only_known_events() {
        let mut store = InMemoryStore::new();
        store.record_events("TSLA", &[event(10, 1.0)]).unwrap();
        let known = EventDistance {
            timestamp: event(10, 0.0).time,
            distance: 4.5,
            reference_time: event(10, 0.0).time,
        };
        let unknown = EventDistance {
            timestamp: event(11, 0.0).time,
            ..known.clone()
        };
        assert_eq!(store.record_distances("TSLA", "TSLA-random", &[known, unknown]).unwrap(), 1);

        let row = &store.anomalies("TSLA").unwrap()[&event(10, 0.0).time];
        assert_eq!(row.distance, Some(4.5));
        assert_eq!(row.reference.as_deref(), Some("TSLA-random"));
        assert_eq!(store.load_event_times("TSLA").unwrap(), vec![event(10, 0.0).time]);
    }

    #[test]
    fn unknown_ticker_is_unavailable() {
        let mut store = InMemoryStore::new();
        assert!(matches!(
            store.load_series("NOPE"),
            Err(EngineError::DataUnavailable { .. })
        ));
    }
}
