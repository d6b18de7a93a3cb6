use rand::{SeedableRng, rngs::StdRng, seq::index};
use serde::{Deserialize, Serialize};
use snafu::ensure;
use tracing::debug;

use crate::{
    config::ForestConfig,
    errors::{InsufficientDataSnafu, Result},
    outlier::tree::{IsolationTree, average_path_length},
};

/// Smallest per-tree sub-sample that still yields a meaningful partition.
pub const MIN_SUBSAMPLE: usize = 4;

/// A trained ensemble of isolation trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    /// Rows drawn per tree.
    subsample: usize,
}

impl IsolationForest {
    /// Trains the ensemble on `data`.
    ///
    /// Each tree draws `min(max_samples, rows / 2)` distinct rows, so there are
    /// always at least twice as many rows as the sub-sample size.
    ///
    /// # Errors
    /// * [`InvalidConfig`](crate::errors::EngineError::InvalidConfig) for bad parameters.
    /// * [`InsufficientData`](crate::errors::EngineError::InsufficientData) when
    ///   `data` has fewer than `2 * MIN_SUBSAMPLE` rows.
    pub fn fit<R: AsRef<[f64]>>(data: &[R], config: &ForestConfig) -> Result<Self> {
        config.validate()?;
        let n = data.len();
        ensure!(
            n / 2 >= MIN_SUBSAMPLE,
            InsufficientDataSnafu {
                stage: "outlier scorer",
                required: 2 * MIN_SUBSAMPLE,
                actual: n,
            }
        );

        let subsample = config.max_samples.min(n / 2);
        let max_depth = (subsample as f64).log2().ceil() as usize;
        debug!(
            rows = n,
            trees = config.n_trees,
            subsample,
            max_depth,
            "fitting isolation forest"
        );

        let mut rng = StdRng::seed_from_u64(config.seed);
        let trees = (0..config.n_trees)
            .map(|_| {
                let mut rows = index::sample(&mut rng, n, subsample).into_vec();
                IsolationTree::grow(data, &mut rows, max_depth, &mut rng)
            })
            .collect();

        Ok(Self { trees, subsample })
    }

    /// Anomaly score `2^(-E[h(x)] / c(subsample))` for every row; higher is more anomalous.
    pub fn score_samples<R: AsRef<[f64]>>(&self, data: &[R]) -> Vec<f64> {
        let norm = average_path_length(self.subsample);
        data.iter()
            .map(|row| {
                let row = row.as_ref();
                let mean_path = self
                    .trees
                    .iter()
                    .map(|t| t.path_length(row))
                    .sum::<f64>()
                    / self.trees.len() as f64;
                2f64.powf(-mean_path / norm)
            })
            .collect()
    }

    pub fn trees(&self) -> &[IsolationTree] {
        &self.trees
    }

    pub fn subsample(&self) -> usize {
        self.subsample
    }
}

/// Marks the `round(contamination * n)` highest scores as outliers.
///
/// Equal scores keep their original row order, so the earlier row wins a tie
/// at the cut-off.
pub fn threshold_labels(scores: &[f64], contamination: f64) -> Vec<bool> {
    let n = scores.len();
    let n_outliers = ((contamination * n as f64).round() as usize).min(n);

    let mut order: Vec<usize> = (0..n).collect();
    // stable sort: ties stay in row order
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut labels = vec![false; n];
    for &row in &order[..n_outliers] {
        labels[row] = true;
    }
    labels
}
