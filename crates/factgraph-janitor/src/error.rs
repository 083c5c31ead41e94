//! Error types for Janitor operations

use thiserror::Error;

/// Errors that can occur during Janitor operations
#[derive(Error, Debug)]
pub enum JanitorError {
    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

pub(crate) fn store_error<E: std::fmt::Display>(e: E) -> JanitorError {
    JanitorError::Store(e.to_string())
}
