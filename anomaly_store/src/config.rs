//! `anomaly-scan` configuration file.
//!
//! ```toml
//! database_url = "sqlite://data/bars.db"
//!
//! [engine.forest]
//! contamination = 0.05
//!
//! [engine.events]
//! merge_window_secs = 43200
//! ```
//!
//! Every key is optional. The database URL resolves as command-line flag,
//! then this file, then `DATABASE_URL`.

use std::path::Path;

use anomaly_engine::EngineConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared_utils::env::get_env_var;

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let cfg: Self = toml::from_str(s).context("parse config toml")?;
        cfg.engine.validate()?;
        Ok(cfg)
    }

    /// Reads `path` when given, otherwise starts from defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let s = std::fs::read_to_string(p)
                    .with_context(|| format!("read config {}", p.display()))?;
                Self::from_toml_str(&s)
            }
            None => Ok(Self::default()),
        }
    }

    /// Flag, then file, then environment.
    pub fn resolve_database_url(&self, flag: Option<String>) -> anyhow::Result<String> {
        match flag.or_else(|| self.database_url.clone()) {
            Some(url) => Ok(url),
            None => Ok(get_env_var(DATABASE_URL_VAR)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn nested_engine_sections_override_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
            database_url = "sqlite://bars.db"

            [engine.forest]
            contamination = 0.05

            [engine.align]
            radius = 3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.database_url.as_deref(), Some("sqlite://bars.db"));
        assert_eq!(cfg.engine.forest.contamination, 0.05);
        assert_eq!(cfg.engine.forest.n_trees, 100);
        assert_eq!(cfg.engine.align.radius, 3);
    }

    #[test]
    fn invalid_engine_values_are_rejected() {
        assert!(AppConfig::from_toml_str("[engine.forest]\ncontamination = 0.9").is_err());
        assert!(AppConfig::from_toml_str("unknown = 1").is_err());
    }

    #[test]
    fn flag_beats_file() {
        let cfg = AppConfig {
            database_url: Some("sqlite://file.db".into()),
            ..AppConfig::default()
        };
        assert_eq!(
            cfg.resolve_database_url(Some("sqlite://flag.db".into())).unwrap(),
            "sqlite://flag.db"
        );
        assert_eq!(cfg.resolve_database_url(None).unwrap(), "sqlite://file.db");
    }
}
