//! Size limits for keys and documents
//!
//! Limits are enforced by the document store on every write. Violations
//! surface as `Error::Limit`.

use serde_json::Value;
use thiserror::Error;

/// Size limits for keys and documents
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum key length in bytes (default: 1500)
    pub max_key_bytes: usize,

    /// Maximum encoded document size in bytes (default: 1MiB)
    pub max_document_bytes: usize,

    /// Maximum nesting depth (default: 20)
    pub max_nesting_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_key_bytes: 1500,
            max_document_bytes: 1024 * 1024,
            max_nesting_depth: 20,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        Limits {
            max_key_bytes: 64,
            max_document_bytes: 512,
            max_nesting_depth: 4,
        }
    }

    /// Validate an encoded document against the size and depth limits
    pub fn validate_document(&self, value: &Value) -> Result<(), LimitError> {
        let depth = nesting_depth(value);
        if depth > self.max_nesting_depth {
            return Err(LimitError::NestingTooDeep {
                actual: depth,
                max: self.max_nesting_depth,
            });
        }

        // serde_json::to_vec cannot fail for a Value
        let size = serde_json::to_vec(value).map(|b| b.len()).unwrap_or(0);
        if size > self.max_document_bytes {
            return Err(LimitError::DocumentTooLarge {
                actual: size,
                max: self.max_document_bytes,
            });
        }

        Ok(())
    }
}

fn nesting_depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.iter().map(nesting_depth).max().unwrap_or(0),
        Value::Object(map) => 1 + map.values().map(nesting_depth).max().unwrap_or(0),
        _ => 0,
    }
}

/// Limit violations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LimitError {
    /// Encoded document exceeds the size limit
    #[error("document too large: {actual} bytes exceeds maximum {max}")]
    DocumentTooLarge {
        /// Actual encoded size
        actual: usize,
        /// Maximum allowed size
        max: usize,
    },

    /// Document nests deeper than allowed
    #[error("nesting too deep: {actual} levels exceeds maximum {max}")]
    NestingTooDeep {
        /// Actual depth
        actual: usize,
        /// Maximum allowed depth
        max: usize,
    },
}
