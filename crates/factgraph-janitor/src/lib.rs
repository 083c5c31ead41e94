//! Factgraph Janitor
//!
//! Data-quality monitor for the fact store.
//!
//! # Overview
//!
//! The Janitor scans the whole store and reports:
//! - **Duplicates**: more than one row for a `(subject, predicate, object)` key
//! - **Contradictions**: a non-symmetric relation stored in both directions
//! - **Low confidence**: facts below the review threshold
//! - **Staleness**: `model` facts older than the staleness horizon
//!
//! | Finding | Severity | Remediation |
//! |---------|----------|-------------|
//! | Duplicate | medium | `merge_duplicates` keeps the strongest row |
//! | Contradiction | high | none, needs review |
//! | Low confidence | low | `delete_low_confidence(threshold)` |
//! | Stale | low | `decay_stale(age_days, rate)`, floor 0.1 |
//!
//! Scans are read-only; running one twice without remediation in between
//! returns the same findings in the same order.
//!
//! # Usage
//!
//! ```no_run
//! use factgraph_janitor::{Janitor, JanitorConfig};
//! use factgraph_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::new("facts.db")?;
//! let mut janitor = Janitor::new(JanitorConfig::lenient());
//!
//! let issues = janitor.run_quality_scan(&store)?;
//! println!("{} findings", issues.len());
//!
//! janitor.remediate(&mut store)?;
//! println!("\n{}", janitor.metrics().summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! The Janitor can be configured via TOML:
//!
//! ```toml
//! [janitor]
//! low_confidence_threshold = 0.5
//! delete_threshold = 0.5
//! stale_after_days = 90
//! stale_decay_rate = 0.1
//! dry_run = false
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod janitor;
mod metrics;

pub use config::JanitorConfig;
pub use error::JanitorError;
pub use janitor::Janitor;
pub use metrics::JanitorMetrics;
