//! Factgraph Reasoner
//!
//! Forward-chaining inference and impact analysis over the fact store.
//!
//! # Overview
//!
//! The [`InferenceEngine`] implements four independently invocable rules:
//!
//! | Rule | Premises | Conclusion | Confidence |
//! |------|----------|------------|------------|
//! | Transitive supply | `A supplies_to B`, `B supplies_to C` | `A indirectly_supplies C` | min |
//! | Symmetric competition | `A competes_with B` | `B competes_with A` | × 0.95 |
//! | Inverse dependency | `A supplies_to B` | `B depends_on A` (read-time only) | same |
//! | Competitor chain | `A competes_with B`, `B supplies_to C` | `A influences C` | min × 0.8 |
//!
//! The engine is stateless with respect to the store: every call re-derives
//! from the current facts. Derivations are only written when the caller asks
//! for it with [`InferenceEngine::persist`], which goes through the store's
//! regular upsert so derived facts can never displace stronger ones.
//!
//! The [`ImpactAnalyzer`] answers "what does a change to X affect" with
//! bounded-depth path search, competitor networks, and an impact report that
//! adds same-industry ripple effects from the registry.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use factgraph_reasoner::{ImpactAnalyzer, InferenceEngine, ReasonerConfig};
//! use factgraph_registry::EntityRegistry;
//! use factgraph_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(EntityRegistry::from_file("registry.toml")?);
//! let mut store = SqliteStore::new("facts.db")?;
//!
//! let engine = InferenceEngine::new(registry.clone(), ReasonerConfig::default());
//! let derivations = engine.run_all(&store)?;
//! engine.persist(&mut store, &derivations)?;
//!
//! let analyzer = ImpactAnalyzer::new(registry, ReasonerConfig::default());
//! let report = analyzer.analyze_impact(&store, "Samsung")?;
//! println!("{}", report.narrative);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod impact;
mod inference;
mod narrative;

pub use config::ReasonerConfig;
pub use error::ReasonerError;
pub use impact::{
    CompetitorNetwork, ImpactAnalyzer, ImpactReport, ImpactedEntity, RippleEffect,
    DIRECT_SEVERITY, INDIRECT_SEVERITY, RIPPLE_SEVERITY,
};
pub use inference::{Derivation, InferenceEngine, Rule};
