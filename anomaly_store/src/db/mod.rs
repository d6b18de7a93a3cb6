//! Database utilities for connections and schema migrations.
//!
//! - [`connection::connect_sqlite`] opens a connection with WAL, foreign_keys=ON and a
//!   5000ms busy_timeout.
//! - [`migrate::run_all`] applies the embedded migrations.
//!
//! Example:
//! ```no_run
//! use anomaly_store::db::{connection, migrate};
//!
//! let db_path = std::env::temp_dir().join("anomaly_store_example.db");
//! migrate::run_all(db_path.to_str().unwrap()).expect("migrations");
//! let _conn = connection::connect_sqlite(db_path.to_str().unwrap()).expect("connect");
//! ```

pub mod connection;
pub mod migrate;

/// Accepts `sqlite://path`, `sqlite:path` or a bare path and returns the path diesel expects.
pub fn sqlite_path(database_url: &str) -> anyhow::Result<&str> {
    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        anyhow::bail!("unsupported DATABASE_URL (only sqlite is built in): {database_url}");
    }
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    if path.is_empty() {
        anyhow::bail!("empty DATABASE_URL");
    }
    Ok(path)
}
