//! SiteStore: wiki sites
//!
//! A site's key is the slug of its name unless the caller supplies one.
//! The site document carries `pageRefs`, a denormalized table of contents
//! kept in step by [`crate::PageStore`].

use crate::access;
use crate::patch::apply_patch;
use crate::tag_index::{self, page_entry_key};
use pelilauta_core::schema::Site;
use pelilauta_core::{collections, now_millis, to_mekanismi_uri, DocRef, Entity, Error, Result};
use pelilauta_engine::Database;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Fields only the page operations change
const PROTECTED: &[&str] = &["pageRefs"];

pub(crate) fn site_ref(key: &str) -> Result<DocRef> {
    DocRef::checked(collections::SITES, key)
}

/// Wiki sites
///
/// STATELESS FACADE over Database.
#[derive(Clone)]
pub struct SiteStore {
    db: Arc<Database>,
}

impl SiteStore {
    /// Create new SiteStore instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a site owned by `uid`
    ///
    /// The key is the body's `key` when given, otherwise the slug of the
    /// name. A taken key fails with `AlreadyExists`.
    pub fn create_site(&self, uid: &str, raw: &Value) -> Result<Site> {
        access::ensure_can_create(&self.db, uid)?;
        let body = access::with_owner(raw, uid)?;
        let mut site = Site::parse(&body)?;

        let key = if site.key.trim().is_empty() {
            to_mekanismi_uri(&site.name)
        } else {
            site.key.trim().to_string()
        };
        if key.is_empty() {
            return Err(Error::validation(format!(
                "site: name '{}' has no characters usable in a key",
                site.name
            )));
        }
        site.key = key;
        site.page_refs.clear();
        let now = now_millis();
        site.created_at = now;
        site.updated_at = now;
        site.flow_time = now;

        access::insert(&self.db, &site_ref(&site.key)?, &site)?;
        info!(target: "pelilauta::sites", key = %site.key, uid, "Site created");
        Ok(site)
    }

    /// Get a site
    pub fn get_site(&self, key: &str) -> Result<Option<Site>> {
        access::load(&self.db, &site_ref(key)?)
    }

    /// Get a site or fail with `NotFound`
    pub fn require_site(&self, key: &str) -> Result<Site> {
        access::require(&self.db, &site_ref(key)?)
    }

    /// Update site fields (owners or admins)
    pub fn update_site(&self, uid: &str, key: &str, patch: &Value) -> Result<Site> {
        let doc = site_ref(key)?;
        let current: Site = access::require(&self.db, &doc)?;
        access::ensure_owner_or_admin(&self.db, uid, &current.owners, &doc)?;

        let mut site = apply_patch(&current, patch, PROTECTED)?;
        let now = now_millis();
        site.updated_at = now;
        site.flow_time = now;
        access::save(&self.db, &doc, &site)?;
        info!(target: "pelilauta::sites", key, uid, "Site updated");
        Ok(site)
    }

    /// Delete a site with its pages, page history and page tag entries
    pub fn delete_site(&self, uid: &str, key: &str) -> Result<()> {
        let doc = site_ref(key)?;
        let site: Site = access::require(&self.db, &doc)?;
        access::ensure_owner_or_admin(&self.db, uid, &site.owners, &doc)?;

        let store = self.db.store();
        let pages = collections::pages(key);
        for (page_key, _) in store.list(&pages)? {
            tag_index::remove_entry(&self.db, &page_entry_key(key, &page_key))?;
        }
        let removed_pages = store.delete_collection(&pages)?;
        store.delete_collection(&collections::page_history(key))?;
        store.delete(&doc)?;
        info!(target: "pelilauta::sites", key, uid, removed_pages, "Site deleted");
        Ok(())
    }

    /// Sites, most recent activity first; hidden sites only when asked
    pub fn list_sites(&self, include_hidden: bool) -> Result<Vec<Site>> {
        let mut sites: Vec<Site> = access::list_all(&self.db, collections::SITES)?;
        sites.retain(|s| include_hidden || !s.hidden);
        sites.sort_by(|a, b| b.flow_time.cmp(&a.flow_time).then_with(|| a.key.cmp(&b.key)));
        Ok(sites)
    }

    /// Sites where `uid` is an owner, hidden ones included
    pub fn list_sites_for_owner(&self, uid: &str) -> Result<Vec<Site>> {
        access::find_all(&self.db, collections::SITES, "owners", &Value::from(uid))
    }
}
