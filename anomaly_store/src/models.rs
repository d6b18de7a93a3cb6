//! Row types for the `stocks` and `anomaly` tables.

use anomaly_engine::models::Bar;
use diesel::prelude::*;
use serde::Serialize;

use crate::{
    schema::{anomaly, stocks},
    tz,
};

#[derive(Insertable, Debug)]
#[diesel(table_name = stocks)]
pub struct NewStockRow<'a> {
    pub ticker: &'a str,
    pub trade_time: String, // RFC3339 UTC
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub trade_count: i64,
    pub vwap: f64,
}

impl<'a> NewStockRow<'a> {
    pub fn from_bar(ticker: &'a str, bar: &Bar) -> Self {
        Self {
            ticker,
            trade_time: tz::to_rfc3339_millis(bar.timestamp),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            trade_count: i64::try_from(bar.trade_count).unwrap_or(i64::MAX),
            vwap: bar.vwap,
        }
    }
}

/// The columns needed to rebuild a [`Bar`].
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = stocks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StockRow {
    pub trade_time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub trade_count: i64,
    pub vwap: f64,
}

impl StockRow {
    pub fn into_bar(self) -> anyhow::Result<Bar> {
        Ok(Bar {
            timestamp: tz::parse_ts_to_utc(&self.trade_time)?,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            trade_count: u64::try_from(self.trade_count).unwrap_or(0),
            vwap: self.vwap,
        })
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = anomaly)]
pub struct NewAnomalyRow<'a> {
    pub trade_time: String,
    pub ticker: &'a str,
    pub magnitude: f64,
}

/// A stored anomaly; `bot` is the reference ticker the distance was computed against.
#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = anomaly)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AnomalyRow {
    pub trade_time: String,
    pub ticker: String,
    pub magnitude: f64,
    pub bot: Option<String>,
    pub distance: Option<f64>,
}
