//! Partial-field updates
//!
//! Update operations accept a JSON object of changed fields. The patch is
//! merged over the current entity's document and the result is parsed again,
//! so a patch can never produce an entity the schema would reject.
//! Store-managed fields are dropped from the patch before merging.

use pelilauta_core::schema::Entity;
use pelilauta_core::{Error, Result};
use serde_json::Value;
use tracing::debug;

/// Fields no patch may set on any entity
pub const ALWAYS_PROTECTED: &[&str] = &["key", "createdAt", "updatedAt", "flowTime"];

/// Merge `patch` over `current`, ignoring `ALWAYS_PROTECTED` and `protected`
///
/// # Errors
///
/// `Validation` if the patch is not an object or the merged entity fails
/// schema checks.
pub fn apply_patch<T: Entity>(current: &T, patch: &Value, protected: &[&str]) -> Result<T> {
    let fields = patch
        .as_object()
        .ok_or_else(|| Error::validation(format!("{} patch must be a JSON object", T::KIND)))?;

    let mut doc = current.to_document()?;
    for (field, value) in fields {
        if ALWAYS_PROTECTED.contains(&field.as_str()) || protected.contains(&field.as_str()) {
            debug!(target: "pelilauta::patch", kind = T::KIND, field = %field, "Ignoring protected field");
            continue;
        }
        doc.insert(field.clone(), value.clone());
    }

    T::parse_with_key(current.key(), &Value::Object(doc))
}

/// Whether a patch mentions `field`
pub fn touches(patch: &Value, field: &str) -> bool {
    patch.as_object().map_or(false, |m| m.contains_key(field))
}
