//! Sharded document storage
//!
//! DashMap keyed by collection path, FxHashMap of documents within.
//!
//! # Design
//!
//! - DashMap: 16-way sharded by default, lock-free reads
//! - FxHashMap: O(1) lookups, fast non-crypto hash
//! - Per-collection: a write only locks the target collection's shard
//!
//! Every read-modify-write call (`create`, `update`, `merge`, `increment`)
//! runs while holding the shard's write guard, so each call is atomic for the
//! document it touches. Nothing spans documents: there are no transactions.
//!
//! # Version Handling
//!
//! Each document carries its own version (starting at 1). The store also
//! keeps a global write counter used by snapshots and diagnostics.

use dashmap::DashMap;
use pelilauta_core::error::{Error, Result};
use pelilauta_core::limits::Limits;
use pelilauta_core::traits::DocumentStore;
use pelilauta_core::types::{DocRef, Document, VersionedDocument};
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Documents of one collection
#[derive(Debug, Default)]
pub struct Shard {
    /// HashMap with FxHash for O(1) lookups
    pub(crate) data: FxHashMap<String, VersionedDocument>,
}

impl Shard {
    /// Create a new empty shard
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of documents in this shard
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if shard is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Sharded storage - DashMap by collection path, HashMap within
///
/// # Example
///
/// ```
/// use pelilauta_core::{DocRef, DocumentStore};
/// use pelilauta_storage::ShardedStore;
///
/// let store = ShardedStore::new();
/// let doc = DocRef::new("threads", "t1");
/// store.create(&doc, serde_json::Map::new()).unwrap();
/// assert!(store.exists(&doc).unwrap());
/// ```
pub struct ShardedStore {
    /// Per-collection shards
    shards: DashMap<String, Shard>,
    /// Global write counter
    version: AtomicU64,
    /// Key and document limits enforced on writes
    limits: Limits,
}

impl ShardedStore {
    /// Create new sharded store with default limits
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Create new sharded store with custom limits
    pub fn with_limits(limits: Limits) -> Self {
        Self {
            shards: DashMap::new(),
            version: AtomicU64::new(0),
            limits,
        }
    }

    /// Get global write counter
    #[inline]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Set global write counter (used when loading a snapshot)
    pub fn set_version(&self, version: u64) {
        self.version.store(version, Ordering::Release);
    }

    #[inline]
    fn bump_version(&self) {
        self.version.fetch_add(1, Ordering::AcqRel);
    }

    /// Get number of non-empty collections
    pub fn collection_count(&self) -> usize {
        self.shards.iter().filter(|s| !s.value().is_empty()).count()
    }

    /// Get total number of documents across all collections
    pub fn total_documents(&self) -> usize {
        self.shards.iter().map(|entry| entry.value().len()).sum()
    }

    /// Collection paths currently holding documents, sorted
    pub fn collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .shards
            .iter()
            .filter(|s| !s.value().is_empty())
            .map(|s| s.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Insert a stored document as-is (used when loading a snapshot)
    pub(crate) fn restore(&self, collection: &str, key: String, doc: VersionedDocument) {
        self.shards
            .entry(collection.to_string())
            .or_default()
            .data
            .insert(key, doc);
    }

    fn check_write(&self, doc: &DocRef, data: &Document) -> Result<()> {
        pelilauta_core::key::validate_key_with_limits(&doc.key, &self.limits)?;
        self.limits
            .validate_document(&Value::Object(data.clone()))?;
        Ok(())
    }
}

impl Default for ShardedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShardedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedStore")
            .field("collections", &self.collection_count())
            .field("documents", &self.total_documents())
            .field("version", &self.version())
            .finish()
    }
}

fn merge_fields(target: &mut Document, fields: Document) {
    for (field, value) in fields {
        target.insert(field, value);
    }
}

impl DocumentStore for ShardedStore {
    fn get(&self, doc: &DocRef) -> Result<Option<VersionedDocument>> {
        doc.validate()?;
        Ok(self
            .shards
            .get(&doc.collection)
            .and_then(|shard| shard.data.get(&doc.key).cloned()))
    }

    fn exists(&self, doc: &DocRef) -> Result<bool> {
        doc.validate()?;
        Ok(self
            .shards
            .get(&doc.collection)
            .map(|shard| shard.data.contains_key(&doc.key))
            .unwrap_or(false))
    }

    fn create(&self, doc: &DocRef, data: Document) -> Result<u64> {
        self.check_write(doc, &data)?;
        let mut shard = self.shards.entry(doc.collection.clone()).or_default();

        if shard.data.contains_key(&doc.key) {
            return Err(Error::already_exists(doc));
        }

        shard.data.insert(doc.key.clone(), VersionedDocument::new(data));
        self.bump_version();
        debug!(target: "pelilauta::storage", doc = %doc, "Document created");
        Ok(1)
    }

    fn set(&self, doc: &DocRef, data: Document) -> Result<u64> {
        self.check_write(doc, &data)?;
        let mut shard = self.shards.entry(doc.collection.clone()).or_default();

        let version = match shard.data.get_mut(&doc.key) {
            Some(existing) => {
                existing.replace(data);
                existing.version
            }
            None => {
                shard.data.insert(doc.key.clone(), VersionedDocument::new(data));
                1
            }
        };
        self.bump_version();
        debug!(target: "pelilauta::storage", doc = %doc, version, "Document set");
        Ok(version)
    }

    fn merge(&self, doc: &DocRef, fields: Document) -> Result<u64> {
        self.check_write(doc, &fields)?;
        let mut shard = self.shards.entry(doc.collection.clone()).or_default();

        let version = match shard.data.get_mut(&doc.key) {
            Some(existing) => {
                let mut data = existing.data.clone();
                merge_fields(&mut data, fields);
                self.limits.validate_document(&Value::Object(data.clone()))?;
                existing.replace(data);
                existing.version
            }
            None => {
                shard
                    .data
                    .insert(doc.key.clone(), VersionedDocument::new(fields));
                1
            }
        };
        self.bump_version();
        debug!(target: "pelilauta::storage", doc = %doc, version, "Document merged");
        Ok(version)
    }

    fn update(&self, doc: &DocRef, fields: Document) -> Result<u64> {
        self.check_write(doc, &fields)?;
        let mut shard = self
            .shards
            .get_mut(&doc.collection)
            .ok_or_else(|| Error::not_found(doc))?;
        let existing = shard
            .data
            .get_mut(&doc.key)
            .ok_or_else(|| Error::not_found(doc))?;

        let mut data = existing.data.clone();
        merge_fields(&mut data, fields);
        self.limits.validate_document(&Value::Object(data.clone()))?;
        existing.replace(data);
        let version = existing.version;

        self.bump_version();
        debug!(target: "pelilauta::storage", doc = %doc, version, "Document updated");
        Ok(version)
    }

    fn delete(&self, doc: &DocRef) -> Result<bool> {
        doc.validate()?;
        let removed = self
            .shards
            .get_mut(&doc.collection)
            .and_then(|mut shard| shard.data.remove(&doc.key))
            .is_some();

        if removed {
            self.bump_version();
            debug!(target: "pelilauta::storage", doc = %doc, "Document deleted");
        }
        Ok(removed)
    }

    fn increment(&self, doc: &DocRef, field: &str, delta: i64) -> Result<i64> {
        doc.validate()?;
        let mut shard = self
            .shards
            .get_mut(&doc.collection)
            .ok_or_else(|| Error::not_found(doc))?;
        let existing = shard
            .data
            .get_mut(&doc.key)
            .ok_or_else(|| Error::not_found(doc))?;

        let current = existing
            .data
            .get(field)
            .and_then(Value::as_i64)
            .unwrap_or(0);
        let next = current.checked_add(delta).ok_or_else(|| {
            Error::validation(format!("increment of {}.{} overflows", doc, field))
        })?;
        existing.data.insert(field.to_string(), Value::from(next));
        existing.touch();

        self.bump_version();
        debug!(target: "pelilauta::storage", doc = %doc, field, value = next, "Field incremented");
        Ok(next)
    }

    fn list(&self, collection: &str) -> Result<Vec<(String, VersionedDocument)>> {
        let mut docs: Vec<(String, VersionedDocument)> = self
            .shards
            .get(collection)
            .map(|shard| {
                shard
                    .data
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();
        docs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(docs)
    }

    fn delete_collection(&self, collection: &str) -> Result<usize> {
        let removed = self
            .shards
            .remove(collection)
            .map(|(_, shard)| shard.len())
            .unwrap_or(0);

        if removed > 0 {
            self.bump_version();
            debug!(target: "pelilauta::storage", collection, removed, "Collection deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    fn body(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn thread_ref(key: &str) -> DocRef {
        DocRef::new("threads", key)
    }

    #[test]
    fn test_create_then_get() {
        let store = ShardedStore::new();
        let doc = thread_ref("t1");
        assert_eq!(store.create(&doc, body(json!({"title": "Hei"}))).unwrap(), 1);

        let stored = store.get(&doc).unwrap().unwrap();
        assert_eq!(stored.data.get("title"), Some(&json!("Hei")));
        assert_eq!(stored.version, 1);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_create_duplicate_fails_without_overwrite() {
        let store = ShardedStore::new();
        let doc = thread_ref("t1");
        store.create(&doc, body(json!({"title": "first"}))).unwrap();

        let err = store.create(&doc, body(json!({"title": "second"}))).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        let stored = store.get(&doc).unwrap().unwrap();
        assert_eq!(stored.data.get("title"), Some(&json!("first")));
    }

    #[test]
    fn test_set_overwrites_and_bumps_version() {
        let store = ShardedStore::new();
        let doc = thread_ref("t1");
        store.set(&doc, body(json!({"a": 1, "b": 2}))).unwrap();
        assert_eq!(store.set(&doc, body(json!({"a": 3}))).unwrap(), 2);

        let stored = store.get(&doc).unwrap().unwrap();
        assert_eq!(stored.data.get("a"), Some(&json!(3)));
        assert!(stored.data.get("b").is_none());
    }

    #[test]
    fn test_merge_keeps_other_fields_and_creates() {
        let store = ShardedStore::new();
        let doc = thread_ref("t1");
        assert_eq!(store.merge(&doc, body(json!({"a": 1, "b": 2}))).unwrap(), 1);
        assert_eq!(store.merge(&doc, body(json!({"b": 5}))).unwrap(), 2);

        let stored = store.get(&doc).unwrap().unwrap();
        assert_eq!(stored.data.get("a"), Some(&json!(1)));
        assert_eq!(stored.data.get("b"), Some(&json!(5)));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let store = ShardedStore::new();
        let err = store.update(&thread_ref("nope"), body(json!({"a": 1}))).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_reports_existence() {
        let store = ShardedStore::new();
        let doc = thread_ref("t1");
        assert!(!store.delete(&doc).unwrap());
        store.create(&doc, Document::new()).unwrap();
        assert!(store.delete(&doc).unwrap());
        assert!(store.get(&doc).unwrap().is_none());
    }

    #[test]
    fn test_increment_missing_field_starts_at_zero() {
        let store = ShardedStore::new();
        let doc = thread_ref("t1");
        store.create(&doc, Document::new()).unwrap();
        assert_eq!(store.increment(&doc, "replyCount", 1).unwrap(), 1);
        assert_eq!(store.increment(&doc, "replyCount", -1).unwrap(), 0);
        assert_eq!(store.get(&doc).unwrap().unwrap().version, 3);
    }

    #[test]
    fn test_increment_missing_document_fails() {
        let store = ShardedStore::new();
        assert!(store.increment(&thread_ref("t1"), "replyCount", 1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(ShardedStore::new());
        let doc = thread_ref("t1");
        store.create(&doc, Document::new()).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let doc = doc.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        store.increment(&doc, "n", 1).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let stored = store.get(&doc).unwrap().unwrap();
        assert_eq!(stored.data.get("n"), Some(&json!(800)));
    }

    #[test]
    fn test_list_is_sorted_and_collection_scoped() {
        let store = ShardedStore::new();
        for key in ["c", "a", "b"] {
            store.create(&thread_ref(key), Document::new()).unwrap();
        }
        store.create(&DocRef::new("threads/a/comments", "r1"), Document::new()).unwrap();

        let keys: Vec<String> = store.list("threads").unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(store.list("threads/a/comments").unwrap().len(), 1);
        assert!(store.list("missing").unwrap().is_empty());
    }

    #[test]
    fn test_find_by_field_array_contains() {
        let store = ShardedStore::new();
        store.create(&thread_ref("t1"), body(json!({"owners": ["u1"]}))).unwrap();
        store.create(&thread_ref("t2"), body(json!({"owners": ["u2", "u1"]}))).unwrap();
        store.create(&thread_ref("t3"), body(json!({"owners": ["u3"]}))).unwrap();

        let found = store.find_by_field("threads", "owners", &json!("u1")).unwrap();
        let keys: Vec<&str> = found.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["t1", "t2"]);
    }

    #[test]
    fn test_delete_collection() {
        let store = ShardedStore::new();
        let replies = "threads/t1/comments";
        store.create(&DocRef::new(replies, "r1"), Document::new()).unwrap();
        store.create(&DocRef::new(replies, "r2"), Document::new()).unwrap();
        assert_eq!(store.delete_collection(replies).unwrap(), 2);
        assert_eq!(store.delete_collection(replies).unwrap(), 0);
        assert_eq!(store.total_documents(), 0);
    }

    #[test]
    fn test_invalid_key_rejected() {
        let store = ShardedStore::new();
        assert!(matches!(
            store.create(&thread_ref("a/b"), Document::new()),
            Err(Error::InvalidKey(_))
        ));
        assert!(store.get(&thread_ref("")).is_err());
    }

    #[test]
    fn test_limits_enforced_on_merge() {
        let store = ShardedStore::with_limits(Limits::with_small_limits());
        let doc = thread_ref("t1");
        store.create(&doc, body(json!({"a": "x".repeat(300)}))).unwrap();
        let err = store.merge(&doc, body(json!({"b": "y".repeat(300)}))).unwrap_err();
        assert!(matches!(err, Error::Limit(_)));
        // failed merge leaves the document untouched
        assert_eq!(store.get(&doc).unwrap().unwrap().version, 1);
    }
}
