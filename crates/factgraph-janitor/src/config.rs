//! Configuration for Janitor operations
//!
//! Defines the thresholds used by detection and the defaults used by
//! remediation.

use serde::{Deserialize, Serialize};

/// Configuration for the data-quality monitor
///
/// # Examples
///
/// ```
/// use factgraph_janitor::JanitorConfig;
///
/// // Default configuration (balanced)
/// let config = JanitorConfig::default();
/// assert_eq!(config.stale_after_days, 90);
///
/// // Aggressive cleanup
/// let config = JanitorConfig::aggressive();
/// assert_eq!(config.stale_after_days, 30);
///
/// // Lenient cleanup
/// let config = JanitorConfig::lenient();
/// assert_eq!(config.stale_after_days, 180);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JanitorConfig {
    /// Facts below this confidence are reported for review
    /// Default: 0.5
    pub low_confidence_threshold: f64,

    /// Threshold used by `delete_low_confidence` when none is given
    /// Default: 0.5
    pub delete_threshold: f64,

    /// Age after which `model` facts count as stale (in days)
    /// Default: 90 days
    pub stale_after_days: u64,

    /// Fraction of confidence removed per decay pass
    /// Default: 0.1
    pub stale_decay_rate: f64,

    /// Dry-run mode: log what remediation would do without mutating
    /// Default: false
    pub dry_run: bool,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: 0.5,
            delete_threshold: 0.5,
            stale_after_days: 90,
            stale_decay_rate: 0.1,
            dry_run: false,
        }
    }
}

impl JanitorConfig {
    /// Aggressive cleanup configuration
    ///
    /// - Review below 0.6, delete below 0.6
    /// - Stale after 30 days, decay 25% per pass
    pub fn aggressive() -> Self {
        Self {
            low_confidence_threshold: 0.6,
            delete_threshold: 0.6,
            stale_after_days: 30,
            stale_decay_rate: 0.25,
            dry_run: false,
        }
    }

    /// Lenient cleanup configuration
    ///
    /// - Review below 0.4, delete below 0.3
    /// - Stale after 180 days, decay 5% per pass
    pub fn lenient() -> Self {
        Self {
            low_confidence_threshold: 0.4,
            delete_threshold: 0.3,
            stale_after_days: 180,
            stale_decay_rate: 0.05,
            dry_run: false,
        }
    }

    /// Check that thresholds and rates lie in `[0, 1]`
    pub fn validate(&self) -> Result<(), crate::JanitorError> {
        let unit = [
            ("low_confidence_threshold", self.low_confidence_threshold),
            ("delete_threshold", self.delete_threshold),
            ("stale_decay_rate", self.stale_decay_rate),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(crate::JanitorError::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
