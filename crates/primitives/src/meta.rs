//! MetaStore: application metadata and the channel list
//!
//! ## Documents
//!
//! - `meta/pelilauta`: [`AppMeta`] (admins, frozen users). Read on nearly
//!   every write for authorization, so it is cached on the `Database`.
//! - `meta/threads`: [`ChannelsMeta`], the channel list with cached counts.
//!
//! ## Cache
//!
//! The app metadata cache is filled on first read and replaced whenever the
//! document is written through this module. Writes made behind its back are
//! picked up by [`MetaStore::refresh_app_meta`].

use crate::access;
use pelilauta_core::schema::{AppMeta, Channel, ChannelsMeta, Entity};
use pelilauta_core::{collections, schema, DocRef, Error, Result};
use pelilauta_engine::Database;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

pub(crate) fn app_meta_ref() -> DocRef {
    DocRef::new(collections::META, collections::META_APP)
}

pub(crate) fn channels_ref() -> DocRef {
    DocRef::new(collections::META, collections::META_CHANNELS)
}

fn read_app_meta(db: &Database) -> Result<AppMeta> {
    match db.store().get(&app_meta_ref())? {
        Some(stored) => AppMeta::parse(&Value::Object(stored.data)),
        None => Ok(AppMeta::default()),
    }
}

/// Cached application metadata, loading it on first use
pub(crate) fn app_meta(db: &Database) -> Result<AppMeta> {
    if let Some(meta) = db.cached_app_meta() {
        return Ok(meta);
    }
    let meta = read_app_meta(db)?;
    db.cache_app_meta(meta.clone());
    Ok(meta)
}

/// Write application metadata and refresh the cache
pub(crate) fn save_app_meta(db: &Database, meta: &AppMeta) -> Result<()> {
    db.store().set(&app_meta_ref(), schema::to_document(meta)?)?;
    db.cache_app_meta(meta.clone());
    info!(target: "pelilauta::meta", admins = meta.admins.len(), frozen = meta.frozen.len(), "App metadata saved");
    Ok(())
}

/// Channel list; empty when the document is missing
pub(crate) fn channels(db: &Database) -> Result<ChannelsMeta> {
    match db.store().get(&channels_ref())? {
        Some(stored) => ChannelsMeta::parse(&Value::Object(stored.data)),
        None => Ok(ChannelsMeta::default()),
    }
}

/// Overwrite the channel list with a merge write
pub(crate) fn save_channels(db: &Database, meta: &ChannelsMeta) -> Result<()> {
    db.store().merge(&channels_ref(), schema::to_document(meta)?)?;
    Ok(())
}

/// Application metadata and channel list
///
/// STATELESS FACADE over Database; the only cache lives on the Database.
#[derive(Clone)]
pub struct MetaStore {
    db: Arc<Database>,
}

impl MetaStore {
    /// Create new MetaStore instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get the underlying database reference
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Application metadata (cached)
    pub fn app_meta(&self) -> Result<AppMeta> {
        app_meta(&self.db)
    }

    /// Reload application metadata from the store
    pub fn refresh_app_meta(&self) -> Result<AppMeta> {
        let meta = read_app_meta(&self.db)?;
        self.db.cache_app_meta(meta.clone());
        Ok(meta)
    }

    /// Write application metadata
    ///
    /// Unguarded: used to bootstrap the first admin.
    pub fn save_app_meta(&self, meta: &AppMeta) -> Result<()> {
        save_app_meta(&self.db, meta)
    }

    /// Whether `uid` is an admin
    pub fn is_admin(&self, uid: &str) -> Result<bool> {
        Ok(self.app_meta()?.is_admin(uid))
    }

    /// Whether `uid` is frozen in the app metadata
    pub fn is_frozen(&self, uid: &str) -> Result<bool> {
        Ok(self.app_meta()?.is_frozen(uid))
    }

    /// Freeze or unfreeze a user (admin only)
    pub fn set_frozen(&self, admin_uid: &str, target: &str, frozen: bool) -> Result<AppMeta> {
        access::ensure_admin(&self.db, admin_uid)?;
        let mut meta = read_app_meta(&self.db)?;
        meta.frozen.retain(|f| f != target);
        if frozen {
            meta.frozen.push(target.to_string());
        }
        save_app_meta(&self.db, &meta)?;
        Ok(meta)
    }

    /// Channel list
    pub fn channels(&self) -> Result<ChannelsMeta> {
        channels(&self.db)
    }

    /// Overwrite the channel list
    pub fn save_channels(&self, meta: &ChannelsMeta) -> Result<()> {
        for channel in &meta.topics {
            channel.validate()?;
        }
        save_channels(&self.db, meta)
    }

    /// Add a channel (admin only); duplicate slugs fail
    pub fn add_channel(&self, uid: &str, raw: &Value) -> Result<Channel> {
        access::ensure_admin(&self.db, uid)?;
        let mut channel = Channel::parse(raw)?;
        channel.thread_count = 0;
        channel.latest_thread = None;
        channel.latest_reply = None;

        let mut meta = channels(&self.db)?;
        if meta.find(&channel.slug).is_some() {
            return Err(Error::already_exists(format!("channel {}", channel.slug)));
        }
        meta.topics.push(channel.clone());
        save_channels(&self.db, &meta)?;
        info!(target: "pelilauta::meta", slug = %channel.slug, "Channel added");
        Ok(channel)
    }
}
