//! Loads Alpaca historical-bar JSON into the `stocks` table.
//!
//! Accepted shapes:
//! - a bare array of bars: `[{"t": ..., "o": ...}, ...]`
//! - the single-symbol response: `{"bars": [...], "next_page_token": null}`
//! - the multi-symbol response: `{"bars": {"TSLA": [...]}, ...}`

use std::path::Path;

use anomaly_engine::models::Bar;
use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::store::SqliteStore;

#[derive(Deserialize, Debug)]
pub struct AlpacaBar {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v")]
    pub volume: f64,
    #[serde(rename = "n")]
    pub trade_count: u64,
    #[serde(rename = "vw")]
    pub vwap: f64,
}

impl From<AlpacaBar> for Bar {
    fn from(b: AlpacaBar) -> Self {
        Bar {
            timestamp: b.timestamp,
            open: b.open,
            high: b.high,
            low: b.low,
            close: b.close,
            volume: b.volume,
            trade_count: b.trade_count,
            vwap: b.vwap,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BarsFile {
    List(Vec<AlpacaBar>),
    Response { bars: BarsPayload },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BarsPayload {
    List(Vec<AlpacaBar>),
    BySymbol(IndexMap<String, Vec<AlpacaBar>>),
}

/// Parses `json` into bars for `ticker`, sorted by time with duplicate timestamps dropped.
///
/// A multi-symbol payload must contain `ticker`, unless it holds exactly one symbol.
pub fn parse_bars(json: &str, ticker: &str) -> anyhow::Result<Vec<Bar>> {
    let file: BarsFile = serde_json::from_str(json).context("parse alpaca bars json")?;
    let raw = match file {
        BarsFile::List(bars) | BarsFile::Response { bars: BarsPayload::List(bars) } => bars,
        BarsFile::Response {
            bars: BarsPayload::BySymbol(mut by_symbol),
        } => match by_symbol.shift_remove(ticker) {
            Some(bars) => bars,
            None if by_symbol.len() == 1 => by_symbol.into_values().flatten().collect(),
            None => bail!(
                "payload has no bars for {ticker} (symbols: {})",
                by_symbol.keys().cloned().collect::<Vec<_>>().join(", ")
            ),
        },
    };

    let mut bars: Vec<Bar> = raw.into_iter().map(Bar::from).collect();
    bars.sort_by_key(|b| b.timestamp);
    let before = bars.len();
    bars.dedup_by_key(|b| b.timestamp);
    if bars.len() < before {
        warn!(ticker, dropped = before - bars.len(), "dropped duplicate timestamps");
    }
    Ok(bars)
}

/// Outcome of one import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub ticker: String,
    pub parsed: usize,
    pub inserted: usize,
}

/// Reads the JSON file at `path` and stores its bars under `ticker`.
pub fn import_file(
    store: &mut SqliteStore,
    ticker: &str,
    path: impl AsRef<Path>,
) -> anyhow::Result<ImportReport> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    let bars = parse_bars(&json, ticker)?;
    let inserted = store.insert_bars(ticker, &bars)?;
    info!(ticker, parsed = bars.len(), inserted, file = %path.display(), "imported bars");
    Ok(ImportReport {
        ticker: ticker.to_string(),
        parsed: bars.len(),
        inserted,
    })
}
