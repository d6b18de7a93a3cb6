use snafu::{Backtrace, Snafu};

use crate::io::CollaboratorError;

/// The unified error type for the `anomaly_engine` crate.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum EngineError {
    /// A series is too short for a stage of the pipeline.
    ///
    /// Raised before any model is fit. The caller has to gather more history.
    #[snafu(display("Insufficient data for {stage}: need at least {required} rows, got {actual}"))]
    InsufficientData {
        stage: &'static str,
        required: usize,
        actual: usize,
        backtrace: Backtrace,
    },

    /// The series source returned nothing for the requested ticker.
    #[snafu(display("No data available for ticker {ticker}"))]
    DataUnavailable {
        ticker: String,
        backtrace: Backtrace,
    },

    /// Bars were not strictly increasing by timestamp.
    #[snafu(display("Bars for {ticker} are not strictly increasing at index {index}"))]
    UnorderedSeries {
        ticker: String,
        index: usize,
        backtrace: Backtrace,
    },

    /// A configuration value is outside its valid range.
    #[snafu(display("Invalid configuration: {message}"))]
    InvalidConfig {
        message: String,
        backtrace: Backtrace,
    },

    /// The injected series source failed.
    #[snafu(display("Series source failed: {source}"))]
    Source {
        source: CollaboratorError,
        backtrace: Backtrace,
    },

    /// The injected anomaly sink failed.
    #[snafu(display("Anomaly sink failed: {source}"))]
    Sink {
        source: CollaboratorError,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
