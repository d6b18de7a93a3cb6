//! Unsupervised outlier scoring with an Isolation Forest.
//!
//! Outliers are rows that random axis-aligned partitioning isolates quickly.
//! The ensemble is fit on the scoring columns of the feature rows and every
//! row is then labelled by thresholding the score distribution at the
//! configured contamination fraction.

mod forest;
mod tree;

pub use forest::{IsolationForest, MIN_SUBSAMPLE, threshold_labels};
pub use tree::{IsolationTree, Node, average_path_length};

use tracing::info;

use crate::{
    config::ForestConfig,
    errors::Result,
    features::{FeatureVector, SCORING_WIDTH},
    models::OutlierLabel,
};

/// Fits a forest on `features` and returns one label per row, in input order.
pub fn score_outliers(features: &[FeatureVector], config: &ForestConfig) -> Result<Vec<OutlierLabel>> {
    let matrix: Vec<[f64; SCORING_WIDTH]> = features.iter().map(|f| f.scoring_row()).collect();
    let forest = IsolationForest::fit(&matrix, config)?;
    let scores = forest.score_samples(&matrix);
    let flags = threshold_labels(&scores, config.contamination);

    let labels: Vec<OutlierLabel> = features
        .iter()
        .zip(scores)
        .zip(flags)
        .map(|((f, score), is_outlier)| OutlierLabel {
            timestamp: f.timestamp,
            midpoint: f.midpoint,
            score,
            is_outlier,
        })
        .collect();

    info!(
        rows = labels.len(),
        outliers = labels.iter().filter(|l| l.is_outlier).count(),
        "scored feature rows"
    );
    Ok(labels)
}
