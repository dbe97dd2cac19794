//! Error types for notekeep.

use thiserror::Error;

use crate::models::NoteId;
use crate::validation::ValidationError;

/// Result type alias using notekeep's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notekeep operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No note exists with the given identifier
    #[error("Note not found: {0}")]
    NotFound(NoteId),

    /// The identifier is not well formed for the store's id scheme
    #[error("Invalid note identifier: {0}")]
    InvalidIdentifier(String),

    /// A write payload violated one or more schema constraints
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Short machine-readable name of the failure kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "not_found",
            Error::InvalidIdentifier(_) => "invalid_identifier",
            Error::Validation(_) => "validation_failed",
            Error::Database(_) => "database",
            Error::Config(_) => "config",
            Error::Internal(_) => "internal",
        }
    }
}
