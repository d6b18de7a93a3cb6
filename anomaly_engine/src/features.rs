//! Feature engineering over a bar series.
//!
//! Each bar after the first becomes one [`FeatureVector`]: its raw OHLCV
//! columns plus the change in close relative to the bar before it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use snafu::ensure;
use tracing::warn;

use crate::{
    errors::{InsufficientDataSnafu, Result},
    models::BarSeries,
};

/// Number of columns fed to the outlier scorer.
pub const SCORING_WIDTH: usize = 8;

/// Derived per-bar representation, aligned to `bars[1..]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub vwap: f64,
    pub trade_count: f64,
    /// `close[i] - close[i-1]`
    pub price_delta: f64,
    /// `(close[i] - close[i-1]) / close[i-1]`
    pub pct_change: f64,
    /// `(high + low) / 2` of the bar, carried through for event magnitudes.
    pub midpoint: f64,
}

impl FeatureVector {
    /// Columns used for scoring: open, high, low, close, volume, vwap, delta, pct change.
    pub fn scoring_row(&self) -> [f64; SCORING_WIDTH] {
        [
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.vwap,
            self.price_delta,
            self.pct_change,
        ]
    }
}

/// Builds one feature vector per bar after the first, in time order.
///
/// A bar whose predecessor closed at exactly zero has no defined percentage
/// change; that row is dropped rather than divided by zero.
///
/// # Errors
/// [`InsufficientData`](crate::errors::EngineError::InsufficientData) when the
/// series holds fewer than two bars.
pub fn build_features(series: &BarSeries) -> Result<Vec<FeatureVector>> {
    let bars = series.bars();
    ensure!(
        bars.len() >= 2,
        InsufficientDataSnafu {
            stage: "feature builder",
            required: 2usize,
            actual: bars.len(),
        }
    );

    let mut out = Vec::with_capacity(bars.len() - 1);
    for pair in bars.windows(2) {
        let (prev, bar) = (&pair[0], &pair[1]);
        if prev.close == 0.0 {
            warn!(
                symbol = series.symbol(),
                timestamp = %bar.timestamp,
                "previous close is zero, skipping feature row"
            );
            continue;
        }
        let price_delta = bar.close - prev.close;
        out.push(FeatureVector {
            timestamp: bar.timestamp,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            vwap: bar.vwap,
            trade_count: bar.trade_count as f64,
            price_delta,
            pct_change: price_delta / prev.close,
            midpoint: bar.midpoint(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::EngineError, models::Bar};
    use chrono::{Duration, TimeZone};

    fn series(closes: &[f64]) -> BarSeries {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 6, 13, 0, 0).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar {
                timestamp: t0 + Duration::hours(i as i64),
                open: c,
                high: c + 1.0,
                low: c - 1.0,
                close: c,
                volume: 10.0,
                trade_count: 3,
                vwap: c,
            })
            .collect();
        BarSeries::new("FEAT", bars).unwrap()
    }

    #[test]
    fn one_row_per_bar_after_the_first() {
        let s = series(&[100.0, 102.0, 99.0, 99.0]);
        let f = build_features(&s).unwrap();
        assert_eq!(f.len(), s.len() - 1);
        assert_eq!(f[0].price_delta, s.bars()[1].close - s.bars()[0].close);
        assert_eq!(f[0].timestamp, s.bars()[1].timestamp);
        assert_eq!(f[1].price_delta, -3.0);
        assert_eq!(f[2].pct_change, 0.0);
        assert_eq!(f[0].midpoint, 102.0);
    }

    #[test]
    fn pct_change_is_relative_to_previous_close() {
        let f = build_features(&series(&[50.0, 55.0])).unwrap();
        assert!((f[0].pct_change - 0.1).abs() < 1e-12);
    }

    #[test]
    fn single_bar_is_insufficient() {
        let err = build_features(&series(&[1.0])).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientData { required: 2, actual: 1, .. }
        ));
    }

    #[test]
    fn zero_previous_close_drops_the_row() {
        let f = build_features(&series(&[10.0, 0.0, 5.0, 6.0])).unwrap();
        assert_eq!(f.len(), 2);
        assert_eq!(f[0].close, 0.0);
        assert_eq!(f[1].close, 6.0);
    }

    #[test]
    fn scoring_row_excludes_trade_count() {
        let f = build_features(&series(&[10.0, 11.0])).unwrap();
        let row = f[0].scoring_row();
        assert_eq!(row.len(), SCORING_WIDTH);
        assert_eq!(row[5], f[0].vwap);
        assert_eq!(row[6], 1.0);
    }
}
