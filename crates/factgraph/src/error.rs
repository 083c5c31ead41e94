//! Error types for the facade

use factgraph_gatekeeper::GatekeeperError;
use factgraph_janitor::JanitorError;
use factgraph_reasoner::ReasonerError;
use factgraph_registry::RegistryError;
use factgraph_store::StoreError;
use thiserror::Error;

/// Errors surfaced by [`Factgraph`](crate::Factgraph)
#[derive(Debug, Error)]
pub enum FactgraphError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Backing store failure (transport or transaction)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Registry could not be loaded
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Ingestion failed as a whole
    #[error("Ingestion error: {0}")]
    Ingest(#[from] GatekeeperError),

    /// Inference or impact analysis failed
    #[error("Reasoner error: {0}")]
    Reasoner(#[from] ReasonerError),

    /// Quality scan or remediation failed
    #[error("Janitor error: {0}")]
    Janitor(#[from] JanitorError),
}

/// Result type for facade operations
pub type Result<T> = std::result::Result<T, FactgraphError>;
