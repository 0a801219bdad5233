//! Error types for Pelilauta
//!
//! This module defines the error type shared by every layer, from the
//! document store up to the HTTP handlers. Errors are raised at the point of
//! violation with a descriptive message and propagate unmodified to the caller.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::key::KeyError;
use crate::limits::LimitError;
use std::io;
use thiserror::Error;

/// Result type alias for Pelilauta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Pelilauta
#[derive(Debug, Error)]
pub enum Error {
    /// Document (or a field inside it) does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Create-style write hit an existing document or a taken unique field
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Acting user may not perform the operation
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Input failed schema parsing or a semantic check
    #[error("validation failed: {0}")]
    Validation(String),

    /// Document key rejected by key validation
    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),

    /// Document exceeded a size limit
    #[error("limit exceeded: {0}")]
    Limit(#[from] LimitError),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error (snapshot files, config files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invariant violation inside the system
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Not-found error for a display-able target (usually a `DocRef`)
    pub fn not_found(target: impl std::fmt::Display) -> Self {
        Error::NotFound(target.to_string())
    }

    /// Already-exists error for a display-able target
    pub fn already_exists(target: impl std::fmt::Display) -> Self {
        Error::AlreadyExists(target.to_string())
    }

    /// Unauthorized error with a reason
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Error::Unauthorized(reason.into())
    }

    /// Validation error with a reason
    pub fn validation(reason: impl Into<String>) -> Self {
        Error::Validation(reason.into())
    }

    /// Internal error with a reason
    pub fn internal(reason: impl Into<String>) -> Self {
        Error::Internal(reason.into())
    }

    /// Whether this is a `NotFound` error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
