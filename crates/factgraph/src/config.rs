//! Configuration file parsing
//!
//! One TOML document configures the store location, the registry file and
//! every component.

use crate::Result;
use factgraph_gatekeeper::GatekeeperConfig;
use factgraph_janitor::JanitorConfig;
use factgraph_reasoner::ReasonerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
///
/// Every field has a default, so an empty document is valid and describes an
/// in-memory store with an empty registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FactgraphConfig {
    /// SQLite database file; in-memory when absent
    pub database_path: Option<PathBuf>,

    /// Registry TOML file; empty registry when absent
    pub registry_path: Option<PathBuf>,

    /// Ingestion checks
    pub gatekeeper: GatekeeperConfig,

    /// Inference and impact analysis thresholds
    pub reasoner: ReasonerConfig,

    /// Quality scan thresholds and remediation defaults
    pub janitor: JanitorConfig,
}

impl FactgraphConfig {
    /// Load configuration from a TOML file
    ///
    /// Relative `database_path` and `registry_path` values are resolved
    /// against the directory holding the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&contents)?;

        if let Some(base) = path.parent() {
            for target in [&mut config.database_path, &mut config.registry_path] {
                let joined = target.as_ref().filter(|p| p.is_relative()).map(|p| base.join(p));
                if joined.is_some() {
                    *target = joined;
                }
            }
        }
        Ok(config)
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: FactgraphConfig = toml::from_str(contents)?;
        config.janitor.validate()?;
        Ok(config)
    }
}
