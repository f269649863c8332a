//! Error types for widget-grid
//!
//! None of these are fatal to a dashboard: the store recovers from
//! persistence errors on its own and only surfaces template lookups to
//! the caller.

use thiserror::Error;

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    /// Persistence port error
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Template lookup error
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Errors raised while reading, writing or decoding a persisted layout
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// I/O error in the storage backend
    #[error("Storage I/O failed: {0}")]
    Io(#[source] std::io::Error),

    /// Failed to serialize the layout blob
    #[error("Failed to serialize layout: {0}")]
    Serialize(String),

    /// Stored blob is not valid JSON
    #[error("Failed to parse stored layout: {0}")]
    Parse(String),

    /// Stored blob parsed but violates the layout schema
    #[error("Stored layout does not match schema: {0}")]
    SchemaMismatch(String),

    /// Backend refused the operation (quota, read-only, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Template errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// No template with this id exists
    #[error("Unknown template: {0}")]
    Unknown(String),
}

/// Result type alias for widget-grid operations
pub type Result<T> = std::result::Result<T, Error>;
