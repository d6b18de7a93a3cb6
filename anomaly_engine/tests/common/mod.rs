#![allow(dead_code)]

use anomaly_engine::models::{Bar, BarSeries};
use chrono::{DateTime, Duration, TimeZone, Utc};

pub const SPIKE_START: usize = 30;
pub const SPIKE_LEN: usize = 2;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 13, 0, 0).unwrap()
}

fn close_at(i: usize) -> f64 {
    100.0 + 0.5 * (i as f64 * 0.7).sin()
}

/// Hourly bars oscillating gently around 100.
pub fn calm_bars(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let close = close_at(i);
            let open = if i == 0 { close } else { close_at(i - 1) };
            let high = open.max(close) + 0.2;
            let low = open.min(close) - 0.2;
            Bar {
                timestamp: t0() + Duration::hours(i as i64),
                open,
                high,
                low,
                close,
                volume: 10_000.0 + 500.0 * (i as f64 * 1.3).cos(),
                trade_count: 120 + (i % 7) as u64,
                vwap: (high + low + close) / 3.0,
            }
        })
        .collect()
}

/// `n` calm bars with every price of bars `SPIKE_START..SPIKE_START + SPIKE_LEN` multiplied by 10.
pub fn spiked_series(symbol: &str, n: usize) -> BarSeries {
    spike_of_len(symbol, n, SPIKE_LEN)
}

/// `n` calm bars with only bar `SPIKE_START` multiplied by 10.
pub fn single_spike_series(symbol: &str, n: usize) -> BarSeries {
    spike_of_len(symbol, n, 1)
}

fn spike_of_len(symbol: &str, n: usize, len: usize) -> BarSeries {
    let mut bars = calm_bars(n);
    for bar in &mut bars[SPIKE_START..SPIKE_START + len] {
        bar.open *= 10.0;
        bar.high *= 10.0;
        bar.low *= 10.0;
        bar.close *= 10.0;
        bar.vwap *= 10.0;
    }
    BarSeries::new(symbol, bars).unwrap()
}

/// Same bars with prices, volume and trade count scaled by `k`.
pub fn scaled(series: &BarSeries, symbol: &str, k: f64) -> BarSeries {
    let bars = series
        .bars()
        .iter()
        .map(|b| Bar {
            timestamp: b.timestamp,
            open: b.open * k,
            high: b.high * k,
            low: b.low * k,
            close: b.close * k,
            volume: b.volume * k,
            trade_count: b.trade_count * k as u64,
            vwap: b.vwap * k,
        })
        .collect();
    BarSeries::new(symbol, bars).unwrap()
}
