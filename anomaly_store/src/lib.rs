//! SQLite persistence and command-line plumbing for `anomaly_engine`.
//!
//! [`store::SqliteStore`] implements the engine's collaborator traits over the
//! `stocks` and `anomaly` tables; [`import`] loads Alpaca bar JSON into
//! `stocks`.

pub mod config;
pub mod db;
pub mod import;
pub mod models;
pub mod schema;
pub mod store;
pub mod tz;

pub use store::SqliteStore;
