//! Integration tests for the storage layer
//!
//! These tests exercise ShardedStore through the `DocumentStore` trait:
//! - Operations under concurrent access
//! - Collection isolation
//! - Snapshot persistence across a simulated restart
//! - Edge cases and error handling

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use pelilauta_core::{DocRef, Document, DocumentStore, Error, Limits};
use pelilauta_storage::{load_snapshot, save_snapshot, snapshot_path, ShardedStore};
use serde_json::{json, Value};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn body(value: Value) -> Document {
    value.as_object().cloned().expect("object literal")
}

fn as_store(store: ShardedStore) -> Arc<dyn DocumentStore> {
    Arc::new(store)
}

// ============================================================================
// Edge Case Tests
// ============================================================================

mod edge_cases {
    use super::*;

    #[test]
    fn test_empty_document() {
        let store = as_store(ShardedStore::new());
        let doc = DocRef::new("threads", "empty");
        store.create(&doc, Document::new()).unwrap();
        assert!(store.get(&doc).unwrap().unwrap().data.is_empty());
    }

    #[test]
    fn test_unicode_key() {
        let store = as_store(ShardedStore::new());
        let doc = DocRef::new("sites/s1/pages", "äänipää");
        store.create(&doc, body(json!({"name": "Äänipää"}))).unwrap();
        assert!(store.exists(&doc).unwrap());
    }

    #[test]
    fn test_reserved_key_rejected() {
        let store = as_store(ShardedStore::new());
        let err = store
            .create(&DocRef::new("threads", "__meta__"), Document::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    #[test]
    fn test_oversized_document_rejected() {
        let store = as_store(ShardedStore::with_limits(Limits::with_small_limits()));
        let err = store
            .set(&DocRef::new("threads", "big"), body(json!({"text": "x".repeat(4096)})))
            .unwrap_err();
        assert!(matches!(err, Error::Limit(_)));
        assert!(store.get(&DocRef::new("threads", "big")).unwrap().is_none());
    }

    #[test]
    fn test_increment_non_numeric_field_restarts_from_zero() {
        let store = as_store(ShardedStore::new());
        let doc = DocRef::new("threads", "t1");
        store.create(&doc, body(json!({"lovedCount": "many"}))).unwrap();
        assert_eq!(store.increment(&doc, "lovedCount", 2).unwrap(), 2);
    }
}

// ============================================================================
// Collection Isolation
// ============================================================================

mod isolation {
    use super::*;

    #[test]
    fn test_same_key_in_different_collections() {
        let store = as_store(ShardedStore::new());
        store
            .create(&DocRef::new("threads", "k"), body(json!({"kind": "thread"})))
            .unwrap();
        store
            .create(&DocRef::new("reactions", "k"), body(json!({"kind": "reactions"})))
            .unwrap();

        let thread = store.get(&DocRef::new("threads", "k")).unwrap().unwrap();
        assert_eq!(thread.data.get("kind"), Some(&json!("thread")));
        store.delete(&DocRef::new("reactions", "k")).unwrap();
        assert!(store.exists(&DocRef::new("threads", "k")).unwrap());
    }

    #[test]
    fn test_delete_subcollection_keeps_parent() {
        let store = as_store(ShardedStore::new());
        store.create(&DocRef::new("threads", "t1"), Document::new()).unwrap();
        for i in 0..5 {
            store
                .create(&DocRef::new("threads/t1/comments", format!("r{}", i)), Document::new())
                .unwrap();
        }
        assert_eq!(store.delete_collection("threads/t1/comments").unwrap(), 5);
        assert!(store.exists(&DocRef::new("threads", "t1")).unwrap());
    }
}

// ============================================================================
// Concurrency
// ============================================================================

mod concurrency {
    use super::*;

    #[test]
    fn test_concurrent_creates_only_one_wins() {
        let store = Arc::new(ShardedStore::new());
        let doc = DocRef::new("profiles", "u1");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                let doc = doc.clone();
                thread::spawn(move || store.create(&doc, body(json!({"nick": format!("n{}", i)}))).is_ok())
            })
            .collect();
        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(wins, 1);
    }

    #[test]
    fn test_concurrent_writers_distinct_collections() {
        let store = Arc::new(ShardedStore::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let collection = format!("threads/t{}/comments", t);
                    for i in 0..50 {
                        store
                            .create(&DocRef::new(collection.clone(), format!("r{}", i)), Document::new())
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.total_documents(), 200);
        let collections: HashSet<String> = store.collections().into_iter().collect();
        assert_eq!(collections.len(), 4);
    }

    #[test]
    fn test_concurrent_merges_keep_all_fields() {
        let store = Arc::new(ShardedStore::new());
        let doc = DocRef::new("reactions", "t1");
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = Arc::clone(&store);
                let doc = doc.clone();
                thread::spawn(move || {
                    store.merge(&doc, body(json!({ format!("f{}", i): i }))).unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let stored = store.get(&doc).unwrap().unwrap();
        assert_eq!(stored.data.len(), 10);
        assert_eq!(stored.version, 10);
    }
}

// ============================================================================
// Persistence
// ============================================================================

mod persistence {
    use super::*;

    #[test]
    fn test_snapshot_survives_restart_and_accepts_new_writes() {
        let dir = TempDir::new().unwrap();
        let path = snapshot_path(dir.path());

        {
            let store = ShardedStore::new();
            store
                .create(&DocRef::new("sites", "s1"), body(json!({"name": "Kampanja"})))
                .unwrap();
            save_snapshot(&store, &path).unwrap();
        }

        let (store, info) = load_snapshot(&path, Limits::default()).unwrap().unwrap();
        assert_eq!(info.documents, 1);

        let err = store
            .create(&DocRef::new("sites", "s1"), Document::new())
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        assert_eq!(store.update(&DocRef::new("sites", "s1"), body(json!({"hidden": true}))).unwrap(), 2);
        assert_eq!(store.version(), info.version + 1);
    }
}
