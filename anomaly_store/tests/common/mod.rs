#![allow(dead_code)]

use std::path::{Path, PathBuf};

use anomaly_engine::models::Bar;
use anomaly_store::{SqliteStore, db::connection};
use chrono::{DateTime, Duration, TimeZone, Utc};
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};
use tempfile::TempDir;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}
#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}

pub struct TestDb {
    dir: TempDir,     // keep alive for the life of the test
    pub path: String, // <tmpdir>/test.db
}

impl TestDb {
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

pub fn setup_store() -> (TestDb, SqliteStore) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    let store = SqliteStore::open(&format!("sqlite://{path}")).expect("open store");
    (TestDb { dir, path }, store)
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal");

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

pub fn second_connection(db: &TestDb) -> SqliteConnection {
    connection::connect_sqlite(&db.path).expect("connect second")
}

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 13, 0, 0).unwrap()
}

/// Hourly bars around 100 with prices of bars 30 and 31 multiplied by 10.
pub fn spiked_bars(n: usize, scale: f64) -> Vec<Bar> {
    let close_at = |i: usize| 100.0 + 0.5 * (i as f64 * 0.7).sin();
    (0..n)
        .map(|i| {
            let close = close_at(i);
            let open = if i == 0 { close } else { close_at(i - 1) };
            let k = if (30..32).contains(&i) { 10.0 } else { 1.0 };
            let high = open.max(close) + 0.2;
            let low = open.min(close) - 0.2;
            Bar {
                timestamp: t0() + Duration::hours(i as i64),
                open: open * k * scale,
                high: high * k * scale,
                low: low * k * scale,
                close: close * k * scale,
                volume: (10_000.0 + 500.0 * (i as f64 * 1.3).cos()) * scale,
                trade_count: ((120 + (i % 7)) as f64 * scale) as u64,
                vwap: (high + low + close) / 3.0 * k * scale,
            }
        })
        .collect()
}

/// Writes `bars` as an Alpaca-style JSON array and returns the file path.
pub fn write_bars_json(dir: &Path, name: &str, bars: &[Bar]) -> PathBuf {
    let rows: Vec<_> = bars
        .iter()
        .map(|b| {
            serde_json::json!({
                "t": b.timestamp.to_rfc3339(),
                "o": b.open,
                "h": b.high,
                "l": b.low,
                "c": b.close,
                "v": b.volume,
                "n": b.trade_count,
                "vw": b.vwap,
            })
        })
        .collect();
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(&rows).unwrap()).unwrap();
    path
}
