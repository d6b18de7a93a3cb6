mod common;

use anomaly_engine::{
    Analyzer, EngineConfig, EngineError, compare, detect,
    features::build_features,
    io::memory::InMemoryStore,
    models::BarSeries,
};
use chrono::Duration;
use common::{
    SPIKE_LEN, SPIKE_START, calm_bars, scaled, single_spike_series, spiked_series, t0,
};
use proptest::prelude::*;

#[test]
fn spike_becomes_a_single_event() {
    let series = spiked_series("TSLA", 50);
    let detection = detect(&series, &EngineConfig::default()).unwrap();

    assert_eq!(detection.labels.len(), 49);
    let outliers = detection.labels.iter().filter(|l| l.is_outlier).count();
    assert_eq!(outliers, (0.07_f64 * 49.0).round() as usize);

    assert_eq!(detection.events.len(), 1, "events: {:?}", detection.events);
    let event = &detection.events[0];
    let first = t0() + Duration::hours(SPIKE_START as i64 - 1);
    let last = t0() + Duration::hours((SPIKE_START + SPIKE_LEN) as i64 + 1);
    assert!(event.time >= first && event.time <= last, "event at {}", event.time);
    assert_eq!(event.members, outliers);
}

#[test]
fn single_bar_spike_becomes_one_event_at_the_spike() {
    let series = single_spike_series("TSLA", 50);
    let detection = detect(&series, &EngineConfig::default()).unwrap();

    let outliers = detection.labels.iter().filter(|l| l.is_outlier).count();
    assert_eq!(outliers, 3);
    assert_eq!(detection.events.len(), 1, "events: {:?}", detection.events);
    assert_eq!(detection.events[0].time, t0() + Duration::hours(SPIKE_START as i64));
    assert_eq!(detection.events[0].members, 3);
}

#[test]
fn spiked_rows_score_highest() {
    let series = spiked_series("TSLA", 50);
    let detection = detect(&series, &EngineConfig::default()).unwrap();

    let spike_times: Vec<_> = (SPIKE_START..SPIKE_START + SPIKE_LEN)
        .map(|i| t0() + Duration::hours(i as i64))
        .collect();
    for label in &detection.labels {
        if spike_times.contains(&label.timestamp) {
            assert!(label.is_outlier, "spike bar {} not flagged", label.timestamp);
        }
    }
}

#[test]
fn detection_is_reproducible() {
    let series = spiked_series("TSLA", 64);
    let config = EngineConfig::default();
    let a = detect(&series, &config).unwrap();
    let b = detect(&series, &config).unwrap();
    assert_eq!(a.labels, b.labels);
    assert_eq!(a.events, b.events);
}

#[test]
fn tiny_series_is_rejected() {
    let series = BarSeries::new("TSLA", calm_bars(6)).unwrap();
    assert!(matches!(
        detect(&series, &EngineConfig::default()),
        Err(EngineError::InsufficientData { .. })
    ));
}

#[test]
fn config_from_toml_drives_detection() {
    let config = EngineConfig::from_toml_str(
        r#"
        [forest]
        contamination = 0.1

        [events]
        merge_window_secs = 3600
        "#,
    )
    .unwrap();
    let series = spiked_series("TSLA", 50);
    let detection = detect(&series, &config).unwrap();
    let outliers = detection.labels.iter().filter(|l| l.is_outlier).count();
    assert_eq!(outliers, 5);
}

#[test]
fn scaled_copy_aligns_for_free() {
    let series = spiked_series("TSLA", 50);
    let reference = scaled(&series, "TSLA-random", 2.0);
    let times = [t0() + Duration::hours(SPIKE_START as i64)];

    let comparison = compare(&series, &reference, &times, &EngineConfig::default()).unwrap();
    assert!(comparison.alignment.distance < 1e-5, "{}", comparison.alignment.distance);
    assert_eq!(comparison.alignment.path.first(), Some(&(0, 0)));
    assert_eq!(comparison.alignment.path.last(), Some(&(49, 49)));

    let close = series.bars()[SPIKE_START].close;
    assert_eq!(comparison.distances.len(), 1);
    assert!((comparison.distances[0].distance - close).abs() < 1e-9);
    assert_eq!(comparison.distances[0].reference_time, times[0]);
}

#[test]
fn analyzer_records_then_annotates_events() {
    let series = spiked_series("TSLA", 50);
    let mut store = InMemoryStore::new();
    store.insert_series(scaled(&series, "TSLA-random", 2.0));
    store.insert_series(series);

    let analyzer = Analyzer::new(EngineConfig::default()).unwrap();
    let detection = analyzer.run_detection(&mut store, "TSLA", true).unwrap();
    assert!(!detection.events.is_empty());
    assert!(store.anomalies("TSLA").is_none());

    analyzer.run_detection(&mut store, "TSLA", false).unwrap();
    let stored = store.anomalies("TSLA").unwrap().len();
    assert_eq!(stored, detection.events.len());

    analyzer.run_detection(&mut store, "TSLA", false).unwrap();
    assert_eq!(store.anomalies("TSLA").unwrap().len(), stored);

    let comparison = analyzer
        .run_comparison(&mut store, "TSLA", "TSLA-random")
        .unwrap();
    assert_eq!(comparison.distances.len(), stored);
    for row in store.anomalies("TSLA").unwrap().values() {
        assert_eq!(row.reference.as_deref(), Some("TSLA-random"));
        assert!(row.distance.is_some());
    }
}

#[test]
fn analyzer_surfaces_missing_ticker() {
    let analyzer = Analyzer::new(EngineConfig::default()).unwrap();
    let mut store = InMemoryStore::new();
    assert!(matches!(
        analyzer.run_detection(&mut store, "NOPE", false),
        Err(EngineError::DataUnavailable { .. })
    ));
}

#[test]
fn analyzer_rejects_bad_config() {
    let mut config = EngineConfig::default();
    config.forest.n_trees = 0;
    assert!(matches!(
        Analyzer::new(config),
        Err(EngineError::InvalidConfig { .. })
    ));
}

#[test]
fn free_functions_validate_config() {
    let series = spiked_series("TSLA", 50);

    let mut config = EngineConfig::default();
    config.events.merge_window_secs = -1;
    assert!(matches!(
        detect(&series, &config),
        Err(EngineError::InvalidConfig { .. })
    ));

    let mut config = EngineConfig::default();
    config.align.radius = 0;
    assert!(matches!(
        compare(&series, &series, &[], &config),
        Err(EngineError::InvalidConfig { .. })
    ));
}

#[test]
fn huge_merge_window_is_rejected_not_a_panic() {
    let config =
        EngineConfig::from_toml_str("[events]\nmerge_window_secs = 9223372036854775807").unwrap();
    assert!(Analyzer::new(config.clone()).is_err());
    assert!(matches!(
        detect(&spiked_series("TSLA", 50), &config),
        Err(EngineError::InvalidConfig { .. })
    ));
}

proptest! {
    #[test]
    fn one_feature_row_per_bar_after_the_first(n in 2usize..120) {
        let series = BarSeries::new("X", calm_bars(n)).unwrap();
        let features = build_features(&series).unwrap();
        prop_assert_eq!(features.len(), n - 1);
        prop_assert!(features.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }
}
