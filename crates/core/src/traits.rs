//! Core trait for document store abstraction
//!
//! This module defines the `DocumentStore` trait that the primitives are
//! written against, so the embedded sharded store can be replaced by another
//! backend without touching upper layers.

use crate::error::Result;
use crate::types::{DocRef, Document, VersionedDocument};
use serde_json::Value;

/// Document store abstraction
///
/// Documents are JSON objects addressed by [`DocRef`]. The store guarantees
/// per-document consistency only: each call below is atomic with respect to
/// the single document it touches, and there are no multi-document
/// transactions. Writes are last-write-wins.
///
/// Thread safety: All methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait DocumentStore: Send + Sync {
    /// Read a document
    ///
    /// Returns `None` if the document doesn't exist.
    fn get(&self, doc: &DocRef) -> Result<Option<VersionedDocument>>;

    /// Check whether a document exists
    fn exists(&self, doc: &DocRef) -> Result<bool> {
        Ok(self.get(doc)?.is_some())
    }

    /// Create a document
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if a document with the same reference exists.
    fn create(&self, doc: &DocRef, data: Document) -> Result<u64>;

    /// Write a document, replacing any existing body
    fn set(&self, doc: &DocRef, data: Document) -> Result<u64>;

    /// Merge top-level fields into a document, creating it when missing
    ///
    /// Fields present in `fields` overwrite the stored ones; other stored
    /// fields are kept.
    fn merge(&self, doc: &DocRef, fields: Document) -> Result<u64>;

    /// Merge top-level fields into an existing document
    ///
    /// # Errors
    ///
    /// `NotFound` if the document doesn't exist.
    fn update(&self, doc: &DocRef, fields: Document) -> Result<u64>;

    /// Delete a document
    ///
    /// Returns whether the document existed.
    fn delete(&self, doc: &DocRef) -> Result<bool>;

    /// Atomically add `delta` to a numeric field and return the new value
    ///
    /// A missing or non-numeric field counts as 0.
    ///
    /// # Errors
    ///
    /// `NotFound` if the document doesn't exist.
    fn increment(&self, doc: &DocRef, field: &str, delta: i64) -> Result<i64>;

    /// List every document in a collection, ordered by key
    fn list(&self, collection: &str) -> Result<Vec<(String, VersionedDocument)>>;

    /// Documents whose `field` equals `value`, or whose array `field`
    /// contains `value`, ordered by key
    fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<(String, VersionedDocument)>> {
        Ok(self
            .list(collection)?
            .into_iter()
            .filter(|(_, doc)| field_matches(&doc.data, field, value))
            .collect())
    }

    /// Delete every document in a collection, returning how many were removed
    fn delete_collection(&self, collection: &str) -> Result<usize>;
}

/// Equality / array-contains predicate used by `find_by_field`
pub fn field_matches(data: &Document, field: &str, value: &Value) -> bool {
    match data.get(field) {
        Some(Value::Array(items)) if !value.is_array() => items.contains(value),
        Some(stored) => stored == value,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_field_matches_equality() {
        let data = doc(json!({"channel": "yleinen"}));
        assert!(field_matches(&data, "channel", &json!("yleinen")));
        assert!(!field_matches(&data, "channel", &json!("roolipelit")));
        assert!(!field_matches(&data, "missing", &json!("yleinen")));
    }

    #[test]
    fn test_field_matches_array_contains() {
        let data = doc(json!({"owners": ["a", "b"]}));
        assert!(field_matches(&data, "owners", &json!("b")));
        assert!(!field_matches(&data, "owners", &json!("c")));
        assert!(field_matches(&data, "owners", &json!(["a", "b"])));
    }
}
