//! End-to-end runs: detection for one ticker, comparison for a ticker pair.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::{
    align::align_series,
    cluster::cluster_events,
    config::EngineConfig,
    errors::Result,
    features::build_features,
    io::AnomalyStore,
    localize::localize_events,
    models::{AlignmentResult, AnomalyEvent, BarSeries, EventDistance, OutlierLabel},
    outlier::score_outliers,
};

/// Output of the detection pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    /// One label per scored feature row.
    pub labels: Vec<OutlierLabel>,
    pub events: Vec<AnomalyEvent>,
}

/// Output of the comparison pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub alignment: AlignmentResult,
    pub distances: Vec<EventDistance>,
}

/// Features -> outlier labels -> events for one series.
///
/// `config` is validated first.
pub fn detect(series: &BarSeries, config: &EngineConfig) -> Result<Detection> {
    config.validate()?;
    let features = build_features(series)?;
    let labels = score_outliers(&features, &config.forest)?;
    let events = cluster_events(&labels, &config.events);
    Ok(Detection { labels, events })
}

/// Global alignment of two series plus per-event distances for `event_times`.
///
/// `config` is validated first.
pub fn compare(
    source: &BarSeries,
    reference: &BarSeries,
    event_times: &[DateTime<Utc>],
    config: &EngineConfig,
) -> Result<Comparison> {
    config.validate()?;
    Ok(Comparison {
        alignment: align_series(source, reference, &config.align),
        distances: localize_events(source, reference, event_times),
    })
}

/// Runs the pipelines against injected collaborators.
pub struct Analyzer {
    config: EngineConfig,
}

impl Analyzer {
    /// Validates `config` up front so bad parameters fail before any data is loaded.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Detects events for `ticker` and records them in `store`.
    ///
    /// With `dry_run`, nothing is written.
    pub fn run_detection(
        &self,
        store: &mut impl AnomalyStore,
        ticker: &str,
        dry_run: bool,
    ) -> Result<Detection> {
        let series = store.load_series(ticker)?;
        let detection = detect(&series, &self.config)?;
        info!(
            ticker,
            bars = series.len(),
            events = detection.events.len(),
            "detection finished"
        );

        if !dry_run {
            let inserted = store.record_events(ticker, &detection.events)?;
            info!(ticker, inserted, "recorded anomaly events");
        }
        Ok(detection)
    }

    /// Compares `ticker` with `reference` and attaches the per-event distances
    /// to the events already recorded for `ticker`.
    pub fn run_comparison(
        &self,
        store: &mut impl AnomalyStore,
        ticker: &str,
        reference: &str,
    ) -> Result<Comparison> {
        let series = store.load_series(ticker)?;
        let reference_series = store.load_series(reference)?;
        let event_times = store.load_event_times(ticker)?;

        let comparison = compare(&series, &reference_series, &event_times, &self.config)?;
        info!(
            ticker,
            reference,
            distance = comparison.alignment.distance,
            events = comparison.distances.len(),
            "comparison finished"
        );

        let updated = store.record_distances(ticker, reference, &comparison.distances)?;
        info!(ticker, reference, updated, "recorded event distances");
        Ok(comparison)
    }
}
