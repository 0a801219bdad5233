//! Shared read helpers and authorization checks
//!
//! Every facade loads entities the same way: fetch the document, rebuild the
//! typed entity with the document key forced. Authorization is owner-or-admin
//! for changes, not-frozen for new content.

use crate::meta;
use pelilauta_core::schema::Entity;
use pelilauta_core::{collections, DocRef, Error, Result};
use pelilauta_engine::Database;
use serde_json::Value;
use tracing::debug;

/// Load an entity, `None` when the document is missing
pub(crate) fn load<T: Entity>(db: &Database, doc: &DocRef) -> Result<Option<T>> {
    match db.store().get(doc)? {
        Some(stored) => Ok(Some(T::from_document(&doc.key, &stored.data)?)),
        None => Ok(None),
    }
}

/// Load an entity or fail with `NotFound`
pub(crate) fn require<T: Entity>(db: &Database, doc: &DocRef) -> Result<T> {
    load(db, doc)?.ok_or_else(|| Error::not_found(doc))
}

/// Write a new entity, failing if the key is taken
pub(crate) fn insert<T: Entity>(db: &Database, doc: &DocRef, entity: &T) -> Result<()> {
    db.store().create(doc, entity.to_document()?)?;
    Ok(())
}

/// Overwrite an entity
pub(crate) fn save<T: Entity>(db: &Database, doc: &DocRef, entity: &T) -> Result<()> {
    db.store().set(doc, entity.to_document()?)?;
    Ok(())
}

/// Every entity of a collection, ordered by key
pub(crate) fn list_all<T: Entity>(db: &Database, collection: &str) -> Result<Vec<T>> {
    db.store()
        .list(collection)?
        .into_iter()
        .map(|(key, stored)| T::from_document(&key, &stored.data))
        .collect()
}

/// Entities whose `field` equals (or contains) `value`, ordered by key
pub(crate) fn find_all<T: Entity>(
    db: &Database,
    collection: &str,
    field: &str,
    value: &Value,
) -> Result<Vec<T>> {
    db.store()
        .find_by_field(collection, field, value)?
        .into_iter()
        .map(|(key, stored)| T::from_document(&key, &stored.data))
        .collect()
}

/// Fail with `Unauthorized` unless `uid` is one of `owners` or an admin
pub(crate) fn ensure_owner_or_admin(
    db: &Database,
    uid: &str,
    owners: &[String],
    target: &DocRef,
) -> Result<()> {
    if owners.iter().any(|o| o == uid) {
        return Ok(());
    }
    if meta::app_meta(db)?.is_admin(uid) {
        debug!(target: "pelilauta::auth", uid, doc = %target, "Admin override");
        return Ok(());
    }
    Err(Error::unauthorized(format!("{} may not modify {}", uid, target)))
}

/// Fail with `Unauthorized` unless `uid` is an admin
pub(crate) fn ensure_admin(db: &Database, uid: &str) -> Result<()> {
    if meta::app_meta(db)?.is_admin(uid) {
        Ok(())
    } else {
        Err(Error::unauthorized(format!("{} is not an admin", uid)))
    }
}

/// Fail with `Unauthorized` if `uid` may not create content
///
/// A user is frozen when listed in the app metadata or when their account
/// carries `frozen: true`.
pub(crate) fn ensure_can_create(db: &Database, uid: &str) -> Result<()> {
    if uid.trim().is_empty() {
        return Err(Error::unauthorized("anonymous users may not create content"));
    }
    if meta::app_meta(db)?.is_frozen(uid) {
        return Err(Error::unauthorized(format!("{} is frozen", uid)));
    }
    let account = DocRef::new(collections::ACCOUNTS, uid);
    if let Some(stored) = db.store().get(&account)? {
        if stored.data.get("frozen").and_then(Value::as_bool) == Some(true) {
            return Err(Error::unauthorized(format!("{} is frozen", uid)));
        }
    }
    Ok(())
}

/// Copy of a JSON object body with `uid` listed first in `owners`
///
/// A missing `owners` field becomes `[uid]`; an existing list gains `uid`
/// at the front when absent.
pub(crate) fn with_owner(raw: &Value, uid: &str) -> Result<Value> {
    let mut body = raw
        .as_object()
        .cloned()
        .ok_or_else(|| Error::validation("expected a JSON object"))?;

    let mut owners: Vec<Value> = match body.get("owners") {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            return Err(Error::validation(format!(
                "owners must be a list of uids, got {}",
                other
            )))
        }
    };
    if !owners.iter().any(|o| o.as_str() == Some(uid)) {
        owners.insert(0, Value::from(uid));
    }
    body.insert("owners".to_string(), Value::Array(owners));
    Ok(Value::Object(body))
}
