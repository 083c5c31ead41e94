//! Factgraph Domain Layer
//!
//! This crate contains the core model of the fact graph: confidence-weighted
//! subject–predicate–object facts, the relations the reasoner understands, the
//! confidence policy, and the trait boundary every storage backend implements.
//!
//! ## Key Concepts
//!
//! - **Fact**: a triple with confidence, provenance and a validation tag
//! - **Relation**: closed set of reasoned-over predicates plus an open extension space
//! - **Confidence Model**: the single place where confidence is assigned and combined
//! - **Impact Chain**: a multi-hop path between two entities with aggregate confidence
//! - **Quality Issue**: a finding of the data-quality scan
//!
//! ## Architecture
//!
//! - Only `uuid` as an external dependency
//! - Pure model and policy only
//! - Storage implementations live in `factgraph-store`
//! - Higher components are generic over [`traits::FactStore`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod confidence;
pub mod fact;
pub mod pattern;
pub mod quality;
pub mod relation;
pub mod traits;

// Re-exports for convenience
pub use chain::{ChainKind, ImpactChain, PathStep};
pub use fact::{current_timestamp, Fact, FactId, Validation};
pub use pattern::TriplePattern;
pub use quality::{IssueKind, QualityIssue, Severity};
pub use relation::Relation;
pub use traits::{BatchSummary, Feedback, FactStore, UpsertOutcome};
