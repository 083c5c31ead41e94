//! Error types for reasoning operations

use thiserror::Error;

/// Errors that can occur while reasoning over the store
#[derive(Error, Debug)]
pub enum ReasonerError {
    /// Storage layer error, passed through without retry
    #[error("Storage error: {0}")]
    Store(String),
}

pub(crate) fn store_error<E: std::fmt::Display>(e: E) -> ReasonerError {
    ReasonerError::Store(e.to_string())
}
