//! Anomaly detection and cross-series alignment over historical price bars.
//!
//! Pipeline for one ticker: [`features`] -> [`outlier`] -> [`cluster`] yields
//! [`AnomalyEvent`](models::AnomalyEvent)s. For a ticker pair, [`align`]
//! computes a whole-series DTW distance and [`localize`] scores every event
//! against the reference series. [`analysis`] wires these stages to the
//! collaborator traits in [`io`].

pub mod align;
pub mod analysis;
pub mod cluster;
pub mod config;
pub mod errors;
pub mod features;
pub mod io;
pub mod localize;
pub mod models;
pub mod outlier;

pub use analysis::{Analyzer, Comparison, Detection, compare, detect};
pub use config::EngineConfig;
pub use errors::EngineError;
