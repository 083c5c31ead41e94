//! Factgraph Gatekeeper
//!
//! The ingestion boundary. Candidate facts from the external extraction
//! collaborator are checked here before they reach the store.
//!
//! The Gatekeeper provides:
//! - Confidence bounds checking
//! - Name resolution of subjects and entity-valued objects against the registry
//! - Validation tagging (`baseline`, `model`, `user`) with the confidence policy applied
//! - Atomic batch ingestion with a processed/rejected report
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use factgraph_gatekeeper::{CandidateFact, Gatekeeper, GatekeeperConfig};
//! use factgraph_registry::EntityRegistry;
//! use factgraph_store::SqliteStore;
//!
//! let registry = Arc::new(EntityRegistry::from_file("registry.toml").unwrap());
//! let gatekeeper = Gatekeeper::new(registry, GatekeeperConfig::default());
//! let mut store = SqliteStore::new("facts.db").unwrap();
//!
//! let report = gatekeeper
//!     .ingest(&mut store, vec![CandidateFact::new("Samsung", "supplies_to", "Dell", 0.9, "doc:1")])
//!     .unwrap();
//! println!("{}", report.summary());
//! ```

#![warn(missing_docs)]

mod candidate;
mod config;
mod error;
mod validator;

pub use candidate::{CandidateFact, CandidateSource};
pub use config::GatekeeperConfig;
pub use error::GatekeeperError;
pub use validator::{Gatekeeper, IngestReport, Rejection, RejectionReason};
