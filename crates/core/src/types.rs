//! Core types for Pelilauta
//!
//! This module defines the foundational types:
//! - Document: the JSON object body stored under a key
//! - DocRef: collection path + document key
//! - VersionedDocument: a stored document with its version and write times
//! - collections: the named collection paths used by the application

use crate::error::Result;
use crate::key::validate_key;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Body of a stored document
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Milliseconds since the Unix epoch, as stored in `createdAt`/`flowTime`
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a fresh document key (UUID v4, no hyphens)
pub fn new_key() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Reference to a single document: collection path + key
///
/// Collection paths may be nested (`threads/{threadKey}/comments`); the key
/// itself never contains `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocRef {
    /// Collection path
    pub collection: String,
    /// Document key inside the collection
    pub key: String,
}

impl DocRef {
    /// Build a reference without validating the key
    pub fn new(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
        }
    }

    /// Build a reference, rejecting invalid keys
    pub fn checked(collection: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        let doc = Self::new(collection, key);
        doc.validate()?;
        Ok(doc)
    }

    /// Validate the key part of the reference
    pub fn validate(&self) -> Result<()> {
        validate_key(&self.key)?;
        Ok(())
    }
}

impl fmt::Display for DocRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.key)
    }
}

/// A stored document with store-assigned metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedDocument {
    /// Document body
    pub data: Document,
    /// Per-document version, starts at 1 and increments on every write
    pub version: u64,
    /// First write time (millis since epoch)
    pub created_at: i64,
    /// Latest write time (millis since epoch)
    pub updated_at: i64,
}

impl VersionedDocument {
    /// Wrap a freshly written body at version 1
    pub fn new(data: Document) -> Self {
        let now = now_millis();
        Self {
            data,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the body, bumping version and `updated_at`
    pub fn replace(&mut self, data: Document) {
        self.data = data;
        self.touch();
    }

    /// Bump version and `updated_at` after an in-place change
    pub fn touch(&mut self) {
        self.version += 1;
        self.updated_at = now_millis();
    }
}

/// Collection paths
pub mod collections {
    /// Forum threads
    pub const THREADS: &str = "threads";
    /// Reaction records, keyed by the target entry key
    pub const REACTIONS: &str = "reactions";
    /// Wiki sites
    pub const SITES: &str = "sites";
    /// Public user profiles, keyed by uid
    pub const PROFILES: &str = "profiles";
    /// Private account records, keyed by uid
    pub const ACCOUNTS: &str = "account";
    /// Tag index entries, keyed by the tagged entry key
    pub const TAGS: &str = "tags";
    /// Notifications
    pub const NOTIFICATIONS: &str = "notifications";
    /// Character sheets
    pub const CHARACTER_SHEETS: &str = "charsheets";
    /// Application metadata documents
    pub const META: &str = "meta";

    /// Key of the channel list document in `meta`
    pub const META_CHANNELS: &str = "threads";
    /// Key of the application metadata document in `meta`
    pub const META_APP: &str = "pelilauta";

    /// Replies of a thread
    pub fn replies(thread_key: &str) -> String {
        format!("{}/{}/comments", THREADS, thread_key)
    }

    /// Pages of a site
    pub fn pages(site_key: &str) -> String {
        format!("{}/{}/pages", SITES, site_key)
    }

    /// Page history records of a site
    pub fn page_history(site_key: &str) -> String {
        format!("{}/{}/history", SITES, site_key)
    }
}
