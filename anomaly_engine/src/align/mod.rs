//! Whole-series similarity via dynamic time warping.
//!
//! Bars are compared as 7-wide vectors `(open, high, low, close, volume,
//! trade_count, vwap)` under [`angle_distance`], so two series with the same
//! shape but a different price or volume scale align almost for free.

mod distance;
mod dtw;
mod fast;

pub use distance::{angle_distance, euclidean_distance};
pub use dtw::{Window, dtw, dtw_windowed};
pub use fast::fast_dtw;

use tracing::debug;

use crate::{
    config::AlignConfig,
    models::{AlignmentResult, BarSeries},
};

/// Aligns two bar series and returns the global dissimilarity and warping path.
///
/// Exact DTW is used while the grid has at most `exact_cell_limit` cells;
/// beyond that the FastDTW band search with `radius` takes over.
pub fn align_series(a: &BarSeries, b: &BarSeries, config: &AlignConfig) -> AlignmentResult {
    let va: Vec<_> = a.bars().iter().map(|bar| bar.to_vector()).collect();
    let vb: Vec<_> = b.bars().iter().map(|bar| bar.to_vector()).collect();

    let cells = va.len().saturating_mul(vb.len());
    let result = if cells <= config.exact_cell_limit {
        dtw(&va, &vb, angle_distance)
    } else {
        fast_dtw(&va, &vb, config.radius, angle_distance)
    };

    debug!(
        first = a.symbol(),
        second = b.symbol(),
        cells,
        exact = cells <= config.exact_cell_limit,
        distance = result.distance,
        "aligned series"
    );
    result
}
