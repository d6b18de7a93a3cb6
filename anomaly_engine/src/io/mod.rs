//! Collaborator contracts: where series come from and where results go.
//!
//! The engine never opens a connection itself. Callers inject a
//! [`SeriesSource`] and an [`AnomalySink`]; [`memory::InMemoryStore`]
//! implements both for tests and embedding, and the `anomaly_store` crate
//! provides a SQLite implementation.
//!
//! # Example
//!
//! ```rust
//! use anomaly_engine::errors::Result;
//! use anomaly_engine::io::AnomalySink;
//! use anomaly_engine::models::{AnomalyEvent, EventDistance};
//!
//! struct CountingSink(usize);
//!
//! impl AnomalySink for CountingSink {
//!     fn record_events(&mut self, _ticker: &str, events: &[AnomalyEvent]) -> Result<usize> {
//!         self.0 += events.len();
//!         Ok(events.len())
//!     }
//!
//!     fn record_distances(
//!         &mut self,
//!         _ticker: &str,
//!         _reference: &str,
//!         distances: &[EventDistance],
//!     ) -> Result<usize> {
//!         Ok(distances.len())
//!     }
//! }
//! ```

pub mod memory;

use chrono::{DateTime, Utc};

use crate::{
    errors::Result,
    models::{AnomalyEvent, BarSeries, EventDistance},
};

/// Boxed error carried by [`EngineError::Source`](crate::errors::EngineError::Source)
/// and [`EngineError::Sink`](crate::errors::EngineError::Sink).
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Read side: loads bar history and previously recorded anomalies.
pub trait SeriesSource {
    /// Loads every bar for `ticker`, ascending by time.
    ///
    /// # Errors
    /// [`DataUnavailable`](crate::errors::EngineError::DataUnavailable) when the
    /// ticker has no rows.
    fn load_series(&mut self, ticker: &str) -> Result<BarSeries>;

    /// Loads the event times previously recorded for `ticker`, ascending.
    fn load_event_times(&mut self, ticker: &str) -> Result<Vec<DateTime<Utc>>>;
}

/// Write side: persists anomaly events and their reference distances.
pub trait AnomalySink {
    /// Stores events keyed by `(time, ticker)`.
    ///
    /// Re-inserting an existing key is a no-op, not an error. Returns how many
    /// rows were newly inserted.
    fn record_events(&mut self, ticker: &str, events: &[AnomalyEvent]) -> Result<usize>;

    /// Attaches per-event distances against `reference` to already stored
    /// events of `ticker`. Returns how many stored events were updated.
    fn record_distances(
        &mut self,
        ticker: &str,
        reference: &str,
        distances: &[EventDistance],
    ) -> Result<usize>;
}

/// A backend that is both the [`SeriesSource`] and the [`AnomalySink`].
///
/// Comparison reads the events detection wrote, so both sides usually share
/// one connection.
pub trait AnomalyStore: SeriesSource + AnomalySink {}

impl<T: SeriesSource + AnomalySink + ?Sized> AnomalyStore for T {}
