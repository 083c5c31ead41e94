//! Factgraph
//!
//! A confidence-weighted triple store with a forward-chaining reasoner and a
//! data-quality monitor.
//!
//! # Overview
//!
//! [`Factgraph`] wires the components together behind the three exposed
//! boundaries:
//!
//! - **Ingestion**: [`Factgraph::ingest`] resolves candidate facts against the
//!   entity registry, applies the confidence policy and stores them atomically.
//! - **Query**: [`Factgraph::query`], [`Factgraph::trace_chain`] and
//!   [`Factgraph::analyze_impact`].
//! - **Quality**: [`Factgraph::run_quality_scan`] plus the explicit
//!   remediation calls.
//!
//! Each component also lives in its own crate and works against any
//! [`FactStore`], for callers that need only part of the system.
//!
//! # Configuration
//!
//! ```toml
//! database_path = "facts.db"
//! registry_path = "registry.toml"
//!
//! [reasoner]
//! min_confidence = 0.7
//! max_depth = 3
//!
//! [janitor]
//! stale_after_days = 90
//! dry_run = false
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use factgraph::{Factgraph, FactgraphConfig, Relation};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut graph = Factgraph::open(FactgraphConfig::from_file("factgraph.toml")?)?;
//! graph.seed_baseline()?;
//!
//! for chain in graph.trace_chain("TSMC", &Relation::SuppliesTo, 3)? {
//!     println!("{:.2} {}", chain.aggregate_confidence, chain.explanation);
//! }
//! for issue in graph.run_quality_scan()? {
//!     println!("{issue}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod graph;

pub use config::FactgraphConfig;
pub use error::{FactgraphError, Result};
pub use graph::Factgraph;

pub use factgraph_domain::{
    BatchSummary, ChainKind, Fact, FactId, FactStore, Feedback, ImpactChain, IssueKind, PathStep,
    QualityIssue, Relation, Severity, TriplePattern, Validation,
};
pub use factgraph_gatekeeper::{CandidateFact, CandidateSource, IngestReport, Rejection, RejectionReason};
pub use factgraph_janitor::{JanitorConfig, JanitorMetrics};
pub use factgraph_reasoner::{CompetitorNetwork, Derivation, ImpactReport, ReasonerConfig, Rule};
pub use factgraph_registry::EntityRegistry;
pub use factgraph_store::SqliteStore;
