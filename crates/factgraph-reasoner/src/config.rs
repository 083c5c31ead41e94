//! Configuration for reasoning

use factgraph_domain::confidence::DEFAULT_MIN_CONFIDENCE;
use serde::{Deserialize, Serialize};

/// Thresholds for inference and impact analysis
///
/// # Examples
///
/// ```
/// use factgraph_reasoner::ReasonerConfig;
///
/// let config = ReasonerConfig::default();
/// assert_eq!(config.min_confidence, 0.7);
/// assert_eq!(config.max_depth, 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonerConfig {
    /// Facts below this confidence are not used as premises or edges
    pub min_confidence: f64,

    /// Hop bound for supply-chain traces inside impact reports
    pub max_depth: usize,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_depth: 3,
        }
    }
}
