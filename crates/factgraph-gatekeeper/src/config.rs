//! Gatekeeper configuration

use serde::{Deserialize, Serialize};

/// Configuration for ingestion checks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatekeeperConfig {
    /// Keep unresolvable objects of unrecognized predicates as literals
    pub allow_literal_objects: bool,

    /// Candidates reporting less certainty than this are rejected
    pub min_candidate_confidence: f64,
}

impl Default for GatekeeperConfig {
    fn default() -> Self {
        Self {
            allow_literal_objects: true,
            min_candidate_confidence: 0.0,
        }
    }
}

impl GatekeeperConfig {
    /// Accept anything that resolves
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Require resolvable objects everywhere and drop weak candidates
    pub fn strict() -> Self {
        Self {
            allow_literal_objects: false,
            min_candidate_confidence: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatekeeperConfig::default();
        assert!(config.allow_literal_objects);
        assert_eq!(config.min_candidate_confidence, 0.0);
    }

    #[test]
    fn test_strict_config() {
        let config = GatekeeperConfig::strict();
        assert!(!config.allow_literal_objects);
        assert_eq!(config.min_candidate_confidence, 0.3);
    }
}
