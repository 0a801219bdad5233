//! Entity schemas
//!
//! Each entity is a plain serde struct. Parsing untrusted JSON goes through
//! [`Entity::parse`], which fills defaults for optional fields, rejects
//! missing or mistyped required fields and then runs the entity's semantic
//! checks. Field names on the wire are camelCase.
//!
//! | Entity | Collection |
//! |--------|------------|
//! | [`Thread`] | `threads` |
//! | [`Reply`] | `threads/{threadKey}/comments` |
//! | [`Reactions`] | `reactions` |
//! | [`Site`] | `sites` |
//! | [`Page`] | `sites/{siteKey}/pages` |
//! | [`PageHistory`] | `sites/{siteKey}/history` |
//! | [`Profile`] | `profiles` |
//! | [`Account`] | `account` |
//! | [`TagIndexEntry`] | `tags` |
//! | [`Notification`] | `notifications` |
//! | [`CharacterSheet`] | `charsheets` |
//! | [`ChannelsMeta`], [`AppMeta`] | `meta` |

mod account;
mod channel;
mod character_sheet;
mod meta;
mod notification;
mod page;
mod page_history;
mod profile;
mod reactions;
mod reply;
mod site;
mod tag;
mod thread;

pub use account::Account;
pub use channel::{Channel, ChannelsMeta, LatestEntry, DEFAULT_CHANNEL};
pub use character_sheet::{CharacterSheet, Stat};
pub use meta::AppMeta;
pub use notification::Notification;
pub use page::Page;
pub use page_history::{HistoryEntry, Hunk, PageHistory, ReverseDiff};
pub use profile::Profile;
pub use reactions::Reactions;
pub use reply::Reply;
pub use site::{PageRef, Site};
pub use tag::{EntryType, TagIndexEntry};
pub use thread::Thread;

use crate::error::{Error, Result};
use crate::types::Document;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A keyed record with a schema
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Human-readable entity name used in error messages
    const KIND: &'static str;

    /// Document key
    fn key(&self) -> &str;

    /// Overwrite the document key
    fn set_key(&mut self, key: String);

    /// Semantic checks run after structural parsing
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Parse untrusted JSON into a defaulted, validated entity
    fn parse(raw: &Value) -> Result<Self> {
        let entity: Self = parse_value(Self::KIND, raw)?;
        entity.validate()?;
        Ok(entity)
    }

    /// Parse untrusted JSON, forcing the document key
    ///
    /// The key argument wins over any `key` field in the body.
    fn parse_with_key(key: &str, raw: &Value) -> Result<Self> {
        let mut entity: Self = parse_value(Self::KIND, raw)?;
        entity.set_key(key.to_string());
        entity.validate()?;
        Ok(entity)
    }

    /// Rebuild an entity from a stored document body
    fn from_document(key: &str, data: &Document) -> Result<Self> {
        Self::parse_with_key(key, &Value::Object(data.clone()))
    }

    /// Serialize into a document body
    fn to_document(&self) -> Result<Document> {
        to_document(self)
    }
}

/// Structural parse of a JSON object into `T`
///
/// Missing required fields and type mismatches become `Error::Validation`
/// prefixed with `kind`.
pub fn parse_value<T: DeserializeOwned>(kind: &str, raw: &Value) -> Result<T> {
    if !raw.is_object() {
        return Err(Error::validation(format!("{}: expected a JSON object", kind)));
    }
    serde_json::from_value(raw.clone()).map_err(|e| Error::validation(format!("{}: {}", kind, e)))
}

/// Serialize any value into a document body
pub fn to_document<T: Serialize + ?Sized>(value: &T) -> Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::internal(format!(
            "expected an object document, got {}",
            other
        ))),
    }
}

/// Turn a `json!` literal into a document body
pub fn fields(value: Value) -> Result<Document> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::validation(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

pub(crate) fn require_non_empty(kind: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{}: {} must not be empty", kind, field)));
    }
    Ok(())
}

pub(crate) fn require_owners(kind: &str, owners: &[String]) -> Result<()> {
    if owners.is_empty() || owners.iter().any(|o| o.trim().is_empty()) {
        return Err(Error::validation(format!(
            "{}: owners must list at least one uid",
            kind
        )));
    }
    Ok(())
}
