//! Registry error types

use thiserror::Error;

/// Errors that can occur while loading or validating the registry
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Registry file could not be read
    #[error("Failed to read registry: {0}")]
    Io(#[from] std::io::Error),

    /// Registry document is not valid TOML for the expected layout
    #[error("Failed to parse registry: {0}")]
    Parse(#[from] toml::de::Error),

    /// Two records share an id
    #[error("Duplicate entity id: {0}")]
    DuplicateEntity(String),

    /// Two categories share an id
    #[error("Duplicate category id: {0}")]
    DuplicateCategory(String),

    /// A relation list names an entity that is not in the registry
    #[error("Entity '{entity}' references unknown entity '{reference}'")]
    UnknownEntity {
        /// Record holding the reference
        entity: String,
        /// Missing entity id
        reference: String,
    },

    /// A record or category names a category that is not in the registry
    #[error("'{owner}' references unknown category '{category}'")]
    UnknownCategory {
        /// Entity or category holding the reference
        owner: String,
        /// Missing category id
        category: String,
    },
}
