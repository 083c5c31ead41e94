//! Gatekeeper error types

use thiserror::Error;

/// Errors that can occur during ingestion
///
/// Per-candidate problems are not errors: they are counted as rejections in
/// the [`crate::IngestReport`]. Only store failures abort an ingestion.
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// Store error; the batch was rolled back
    #[error("Store error: {0}")]
    Store(String),
}
