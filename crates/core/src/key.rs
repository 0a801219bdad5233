//! Document key validation
//!
//! Keys name a document inside a collection. The rules are enforced by the
//! document store on every read and write:
//! - Keys must not be empty
//! - Keys must not contain `/` (it separates collection path segments)
//! - Keys must not contain NUL bytes (\0)
//! - Keys must not be `.` or `..`
//! - Keys must not use the reserved `__name__` form
//! - Keys must not exceed `max_key_bytes` (default: 1500)

use crate::limits::Limits;
use thiserror::Error;

/// Marker wrapping reserved keys such as `__meta__`
pub const RESERVED_MARKER: &str = "__";

/// Validate a document key with the default limits
///
/// # Examples
///
/// ```
/// use pelilauta_core::key::validate_key;
///
/// assert!(validate_key("mykey").is_ok());
/// assert!(validate_key("äänipää-123").is_ok());
///
/// assert!(validate_key("").is_err());
/// assert!(validate_key("a/b").is_err());
/// assert!(validate_key("__meta__").is_err());
/// ```
pub fn validate_key(key: &str) -> Result<(), KeyError> {
    validate_key_with_limits(key, &Limits::default())
}

/// Validate a key against `limits`
pub fn validate_key_with_limits(key: &str, limits: &Limits) -> Result<(), KeyError> {
    let reserved = key.len() > 2 * RESERVED_MARKER.len()
        && key.starts_with(RESERVED_MARKER)
        && key.ends_with(RESERVED_MARKER);

    match key {
        "" => Err(KeyError::Empty),
        "." | ".." => Err(KeyError::DotSegment),
        _ if key.contains('\0') => Err(KeyError::ContainsNul),
        _ if key.contains('/') => Err(KeyError::ContainsSlash),
        _ if reserved => Err(KeyError::Reserved),
        _ if key.len() > limits.max_key_bytes => Err(KeyError::TooLong {
            actual: key.len(),
            max: limits.max_key_bytes,
        }),
        _ => Ok(()),
    }
}

/// Key validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Empty key
    #[error("key is empty")]
    Empty,

    /// NUL byte inside the key
    #[error("key contains a NUL byte")]
    ContainsNul,

    /// `/` would split the collection path
    #[error("key contains '/'")]
    ContainsSlash,

    /// `.` or `..`
    #[error("key is a dot segment")]
    DotSegment,

    /// `__name__` keys are reserved
    #[error("key uses the reserved __name__ form")]
    Reserved,

    /// Longer than `max_key_bytes`
    #[error("key is {actual} bytes, limit is {max}")]
    TooLong {
        /// Key length in bytes
        actual: usize,
        /// Configured limit
        max: usize,
    },
}

impl KeyError {
    /// Stable code for logs and API bodies
    pub fn reason_code(&self) -> &'static str {
        match self {
            KeyError::Empty => "empty_key",
            KeyError::ContainsNul => "contains_nul",
            KeyError::ContainsSlash => "contains_slash",
            KeyError::DotSegment => "dot_segment",
            KeyError::Reserved => "reserved_key",
            KeyError::TooLong { .. } => "key_too_long",
        }
    }
}
