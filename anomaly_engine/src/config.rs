//! Engine configuration: model parameters and event-granularity policy.
//!
//! Every section implements `Default` with the values the detection pipeline
//! was tuned with, and deserializes from TOML with `#[serde(default)]`, so a
//! config file only has to name what it overrides:
//!
//! ```toml
//! [forest]
//! contamination = 0.05
//!
//! [events]
//! merge_window_secs = 43200
//! ```

use std::path::Path;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use snafu::ensure;
use thiserror::Error;

use crate::errors::{InvalidConfigSnafu, Result};

/// Errors raised while reading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML")]
    Parse(#[from] toml::de::Error),
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub forest: ForestConfig,
    pub events: EventPolicy,
    pub align: AlignConfig,
}

impl EngineConfig {
    /// Parse a config from a TOML string. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check every section for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        self.forest.validate()?;
        self.events.validate()?;
        self.align.validate()
    }
}

/// Isolation Forest parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForestConfig {
    /// Number of trees in the ensemble.
    pub n_trees: usize,
    /// Upper bound on rows drawn per tree.
    pub max_samples: usize,
    /// Fraction of rows labelled as outliers.
    pub contamination: f64,
    /// Seed for the tree-growing RNG.
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_samples: 256,
            contamination: 0.07,
            seed: 42,
        }
    }
}

impl ForestConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.n_trees > 0,
            InvalidConfigSnafu {
                message: "forest.n_trees must be at least 1"
            }
        );
        ensure!(
            self.max_samples >= 2,
            InvalidConfigSnafu {
                message: format!("forest.max_samples must be at least 2, got {}", self.max_samples)
            }
        );
        ensure!(
            self.contamination > 0.0 && self.contamination <= 0.5,
            InvalidConfigSnafu {
                message: format!(
                    "forest.contamination must be in (0, 0.5], got {}",
                    self.contamination
                )
            }
        );
        Ok(())
    }
}

/// How raw outlier rows are merged into events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventPolicy {
    /// Consecutive outliers at most this many seconds apart share an event (inclusive).
    pub merge_window_secs: i64,
    /// Event times are rounded to a multiple of this many seconds (half rounds up).
    pub round_to_secs: i64,
}

/// Upper bound for both event-policy durations: one (leap) year.
pub const MAX_POLICY_SECS: i64 = 366 * 24 * 60 * 60;

impl Default for EventPolicy {
    fn default() -> Self {
        Self {
            merge_window_secs: 24 * 60 * 60,
            round_to_secs: 60 * 60,
        }
    }
}

impl EventPolicy {
    /// Clamped into `[0, MAX_POLICY_SECS]`; [`validate`](Self::validate) rejects values outside it.
    pub fn merge_window(&self) -> TimeDelta {
        policy_delta(self.merge_window_secs.clamp(0, MAX_POLICY_SECS))
    }

    /// Clamped into `[1, MAX_POLICY_SECS]`.
    pub fn round_to(&self) -> TimeDelta {
        policy_delta(self.round_to_secs.clamp(1, MAX_POLICY_SECS))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.merge_window_secs >= 0,
            InvalidConfigSnafu {
                message: "events.merge_window_secs cannot be negative"
            }
        );
        ensure!(
            self.round_to_secs > 0,
            InvalidConfigSnafu {
                message: "events.round_to_secs must be positive"
            }
        );
        ensure!(
            self.merge_window_secs <= MAX_POLICY_SECS && self.round_to_secs <= MAX_POLICY_SECS,
            InvalidConfigSnafu {
                message: format!(
                    "events durations must be at most {MAX_POLICY_SECS} seconds, got merge_window_secs={} round_to_secs={}",
                    self.merge_window_secs, self.round_to_secs
                )
            }
        );
        Ok(())
    }
}

fn policy_delta(secs: i64) -> TimeDelta {
    TimeDelta::try_seconds(secs).unwrap_or_default()
}

/// Series aligner parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlignConfig {
    /// Neighbourhood kept around the projected coarse path by FastDTW.
    pub radius: usize,
    /// Largest `len1 * len2` grid aligned exactly; larger inputs use FastDTW.
    pub exact_cell_limit: usize,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            radius: 1,
            exact_cell_limit: 4_000_000,
        }
    }
}

impl AlignConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.radius >= 1,
            InvalidConfigSnafu {
                message: "align.radius must be at least 1"
            }
        );
        Ok(())
    }
}
