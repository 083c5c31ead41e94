//! Factgraph Baseline Entity Registry
//!
//! A small, hand-curated reference graph of known entities and their canonical
//! relations. The registry resolves free-text names to entity ids and decides
//! whether an incoming fact matches curated ground truth.
//!
//! The registry is immutable configuration: it is built once (usually from a
//! TOML file at startup) and shared behind an `Arc`. Nothing in the core
//! mutates it at runtime.
//!
//! # Examples
//!
//! ```
//! use factgraph_registry::EntityRegistry;
//!
//! let registry = EntityRegistry::from_toml_str(r#"
//!     [[categories]]
//!     id = "memory"
//!     name = "Memory semiconductors"
//!
//!     [[entities]]
//!     id = "samsung"
//!     name = "Samsung Electronics"
//!     aliases = ["Samsung"]
//!     categories = ["memory"]
//!     competitors = ["sk-hynix"]
//!
//!     [[entities]]
//!     id = "sk-hynix"
//!     name = "SK Hynix"
//!     categories = ["memory"]
//! "#).unwrap();
//!
//! assert_eq!(registry.resolve("samsung").unwrap().as_str(), "samsung");
//! assert_eq!(registry.resolve("SK hynix").unwrap().as_str(), "sk-hynix");
//! ```

#![warn(missing_docs)]

mod error;
mod registry;
mod types;

pub use error::RegistryError;
pub use registry::EntityRegistry;
pub use types::{Category, EntityId, EntityRecord, RelationKind, MIN_PARTIAL_MATCH};
