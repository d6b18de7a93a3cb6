//! SQLite-backed [`SeriesSource`] and [`AnomalySink`].

use anomaly_engine::{
    errors::{Result as EngineResult, SinkSnafu, SourceSnafu},
    io::{AnomalySink, CollaboratorError, SeriesSource},
    models::{AnomalyEvent, Bar, BarSeries, EventDistance},
};
use chrono::{DateTime, Utc};
use diesel::{prelude::*, result::Error as DieselError};
use snafu::ResultExt;
use tracing::debug;

use crate::{
    db::{connection::connect_sqlite, migrate},
    models::{AnomalyRow, NewAnomalyRow, NewStockRow, StockRow},
    schema::{anomaly, stocks},
    tz,
};

/// Owns one connection for the duration of a run.
pub struct SqliteStore {
    conn: SqliteConnection,
}

impl SqliteStore {
    /// Applies pending migrations, then opens a tuned connection.
    pub fn open(database_url: &str) -> anyhow::Result<Self> {
        anyhow::Context::context(migrate::run_all(database_url), "run migrations")?;
        let conn = connect_sqlite(database_url)?;
        Ok(Self { conn })
    }

    /// Wraps an existing connection; the schema must already be migrated.
    pub fn from_connection(conn: SqliteConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// Inserts bars for `ticker`, ignoring `(ticker, trade_time)` duplicates.
    /// Returns how many rows were new.
    pub fn insert_bars(&mut self, ticker: &str, bars: &[Bar]) -> anyhow::Result<usize> {
        let inserted = self.conn.immediate_transaction(|conn| {
            let mut inserted = 0;
            for bar in bars {
                inserted += diesel::insert_into(stocks::table)
                    .values(NewStockRow::from_bar(ticker, bar))
                    .on_conflict_do_nothing()
                    .execute(conn)?;
            }
            Ok::<_, DieselError>(inserted)
        })?;
        debug!(ticker, offered = bars.len(), inserted, "inserted bars");
        Ok(inserted)
    }

    /// Every stored anomaly row for `ticker`, ascending by time.
    pub fn anomalies(&mut self, ticker: &str) -> anyhow::Result<Vec<AnomalyRow>> {
        let rows = anomaly::table
            .filter(anomaly::ticker.eq(ticker))
            .order(anomaly::trade_time.asc())
            .select(AnomalyRow::as_select())
            .load(&mut self.conn)?;
        Ok(rows)
    }

    fn stock_rows(&mut self, ticker: &str) -> anyhow::Result<Vec<Bar>> {
        stocks::table
            .filter(stocks::ticker.eq(ticker))
            .order(stocks::trade_time.asc())
            .select(StockRow::as_select())
            .load(&mut self.conn)?
            .into_iter()
            .map(StockRow::into_bar)
            .collect()
    }

    fn anomaly_times(&mut self, ticker: &str) -> anyhow::Result<Vec<DateTime<Utc>>> {
        anomaly::table
            .filter(anomaly::ticker.eq(ticker))
            .order(anomaly::trade_time.asc())
            .select(anomaly::trade_time)
            .load::<String>(&mut self.conn)?
            .iter()
            .map(|s| tz::parse_ts_to_utc(s))
            .collect()
    }
}

impl SeriesSource for SqliteStore {
    fn load_series(&mut self, ticker: &str) -> EngineResult<BarSeries> {
        let bars = self
            .stock_rows(ticker)
            .map_err(CollaboratorError::from)
            .context(SourceSnafu)?;
        // zero rows surface as DataUnavailable
        BarSeries::new(ticker, bars)
    }

    fn load_event_times(&mut self, ticker: &str) -> EngineResult<Vec<DateTime<Utc>>> {
        self.anomaly_times(ticker)
            .map_err(CollaboratorError::from)
            .context(SourceSnafu)
    }
}

impl AnomalySink for SqliteStore {
    fn record_events(&mut self, ticker: &str, events: &[AnomalyEvent]) -> EngineResult<usize> {
        self.conn
            .immediate_transaction(|conn| {
                let mut inserted = 0;
                for event in events {
                    inserted += diesel::insert_into(anomaly::table)
                        .values(NewAnomalyRow {
                            trade_time: tz::to_rfc3339_millis(event.time),
                            ticker,
                            magnitude: event.magnitude,
                        })
                        .on_conflict_do_nothing()
                        .execute(conn)?;
                }
                Ok::<_, DieselError>(inserted)
            })
            .map_err(CollaboratorError::from)
            .context(SinkSnafu)
    }

    fn record_distances(
        &mut self,
        ticker: &str,
        reference: &str,
        distances: &[EventDistance],
    ) -> EngineResult<usize> {
        self.conn
            .immediate_transaction(|conn| {
                let mut updated = 0;
                for d in distances {
                    updated += diesel::update(
                        anomaly::table
                            .filter(anomaly::ticker.eq(ticker))
                            .filter(anomaly::trade_time.eq(tz::to_rfc3339_millis(d.timestamp))),
                    )
                    .set((anomaly::bot.eq(reference), anomaly::distance.eq(d.distance)))
                    .execute(conn)?;
                }
                Ok::<_, DieselError>(updated)
            })
            .map_err(CollaboratorError::from)
            .context(SinkSnafu)
    }
}
