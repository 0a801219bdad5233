//! PageStore: wiki pages and their history
//!
//! ## Keys
//!
//! A page's key is `to_mekanismi_uri(name)`, unique within its site.
//! Renaming a page keeps its key.
//!
//! ## History
//!
//! Every update that changes `markdownContent` appends a reverse diff to
//! `sites/{siteKey}/history/{pageKey}`. Applying the diffs newest-first to
//! the current content walks back through every earlier revision; see
//! [`pelilauta_engine::history`].
//!
//! ## Site table of contents
//!
//! Creating, updating and deleting a page keeps the site's `pageRefs` and
//! `flowTime` in step. These are separate writes with no transaction.

use crate::access;
use crate::patch::apply_patch;
use crate::site::site_ref;
use crate::tag_index::{self, page_entry_key};
use pelilauta_core::schema::{
    EntryType, HistoryEntry, Page, PageHistory, PageRef, Site, TagIndexEntry,
};
use pelilauta_core::{
    collections, extract_tags, normalize_tags, now_millis, to_mekanismi_uri, DocRef, Entity, Error,
    Result,
};
use pelilauta_engine::history::{reconstruct, reverse_diff};
use pelilauta_engine::Database;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fields only the store changes
const PROTECTED: &[&str] = &["siteKey", "owners"];

fn page_ref(site_key: &str, page_key: &str) -> Result<DocRef> {
    DocRef::checked(collections::pages(site_key), page_key)
}

fn history_ref(site_key: &str, page_key: &str) -> Result<DocRef> {
    DocRef::checked(collections::page_history(site_key), page_key)
}

fn collect_tags(page: &Page) -> Vec<String> {
    normalize_tags(
        page.tags
            .iter()
            .cloned()
            .chain(extract_tags(&page.markdown_content)),
    )
}

fn toc_entry(page: &Page) -> PageRef {
    PageRef {
        key: page.key.clone(),
        name: page.name.clone(),
        author: page.author().to_string(),
        flow_time: page.flow_time,
        category: page.category.clone(),
    }
}

fn index_entry(page: &Page) -> TagIndexEntry {
    TagIndexEntry {
        key: page_entry_key(&page.site_key, &page.key),
        title: page.name.clone(),
        entry_type: EntryType::Page,
        tags: page.tags.clone(),
        author: page.author().to_string(),
        flow_time: page.flow_time,
    }
}

/// Wiki pages
///
/// STATELESS FACADE over Database.
#[derive(Clone)]
pub struct PageStore {
    db: Arc<Database>,
}

impl PageStore {
    /// Create new PageStore instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn require_editor(&self, uid: &str, site: &Site) -> Result<()> {
        if site.can_edit(uid) {
            return Ok(());
        }
        access::ensure_owner_or_admin(&self.db, uid, &site.owners, &site_ref(&site.key)?)
    }

    fn touch_site(&self, site: &mut Site, now: i64) -> Result<()> {
        site.flow_time = now;
        site.updated_at = now;
        access::save(&self.db, &site_ref(&site.key)?, &*site)
    }

    /// Create a page in a site (site owners, players or admins)
    ///
    /// The key is the slug of the page name; a taken key fails with
    /// `AlreadyExists`. The first page of a site becomes its homepage.
    pub fn create_page(&self, uid: &str, site_key: &str, raw: &Value) -> Result<Page> {
        access::ensure_can_create(&self.db, uid)?;
        let mut site: Site = access::require(&self.db, &site_ref(site_key)?)?;
        self.require_editor(uid, &site)?;

        let mut body = access::with_owner(raw, uid)?;
        if let Some(map) = body.as_object_mut() {
            map.insert("siteKey".to_string(), Value::from(site_key));
        }
        let mut page = Page::parse(&body)?;
        page.key = to_mekanismi_uri(&page.name);
        if page.key.is_empty() {
            return Err(Error::validation(format!(
                "page: name '{}' has no characters usable in a key",
                page.name
            )));
        }
        let now = now_millis();
        page.created_at = now;
        page.updated_at = now;
        page.flow_time = now;
        page.tags = collect_tags(&page);

        access::insert(&self.db, &page_ref(site_key, &page.key)?, &page)?;
        info!(target: "pelilauta::pages", site = site_key, key = %page.key, uid, "Page created");

        site.upsert_page_ref(toc_entry(&page));
        if site.homepage.is_none() {
            site.homepage = Some(page.key.clone());
        }
        self.refresh_aggregates(&mut site, &page, now);
        Ok(page)
    }

    /// Get a page
    pub fn get_page(&self, site_key: &str, page_key: &str) -> Result<Option<Page>> {
        access::load(&self.db, &page_ref(site_key, page_key)?)
    }

    /// Get a page or fail with `NotFound`
    pub fn require_page(&self, site_key: &str, page_key: &str) -> Result<Page> {
        access::require(&self.db, &page_ref(site_key, page_key)?)
    }

    /// Pages of a site, ordered by name
    pub fn list_pages(&self, site_key: &str) -> Result<Vec<Page>> {
        let mut pages: Vec<Page> = access::list_all(&self.db, &collections::pages(site_key))?;
        pages.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(pages)
    }

    /// Update a page (page owners, site editors or admins)
    ///
    /// A content change appends a reverse diff to the page history.
    pub fn update_page(&self, uid: &str, site_key: &str, page_key: &str, patch: &Value) -> Result<Page> {
        let doc = page_ref(site_key, page_key)?;
        let current: Page = access::require(&self.db, &doc)?;
        let mut site: Site = access::require(&self.db, &site_ref(site_key)?)?;
        if !current.owners.iter().any(|o| o == uid) {
            self.require_editor(uid, &site)?;
        }

        let mut page = apply_patch(&current, patch, PROTECTED)?;
        let now = now_millis();
        page.updated_at = now;
        page.flow_time = now;
        page.tags = collect_tags(&page);

        access::save(&self.db, &doc, &page)?;
        if page.markdown_content != current.markdown_content {
            if let Err(e) = self.record_history(uid, &page, &current.markdown_content, now) {
                // history must describe stored revisions only
                if let Err(restore) = access::save(&self.db, &doc, &current) {
                    warn!(target: "pelilauta::pages", site = site_key, key = page_key, error = %restore, "Failed to restore page after history write failed");
                }
                return Err(e);
            }
        }
        info!(target: "pelilauta::pages", site = site_key, key = page_key, uid, "Page updated");

        site.upsert_page_ref(toc_entry(&page));
        self.refresh_aggregates(&mut site, &page, now);
        Ok(page)
    }

    /// Site table of contents and tag index after a page write; failures only warn
    fn refresh_aggregates(&self, site: &mut Site, page: &Page, now: i64) {
        if let Err(e) = self.touch_site(site, now) {
            warn!(target: "pelilauta::pages", site = %site.key, key = %page.key, error = %e, "Page stored but site entry not updated");
        }
        if let Err(e) = tag_index::write_entry(&self.db, index_entry(page)) {
            warn!(target: "pelilauta::pages", site = %site.key, key = %page.key, error = %e, "Page stored but tag index not updated");
        }
    }

    fn record_history(&self, uid: &str, page: &Page, previous: &str, now: i64) -> Result<()> {
        let doc = history_ref(&page.site_key, &page.key)?;
        let mut history = access::load::<PageHistory>(&self.db, &doc)?.unwrap_or_else(|| PageHistory {
            key: page.key.clone(),
            site_key: page.site_key.clone(),
            history: Vec::new(),
        });
        let change = reverse_diff(previous, &page.markdown_content);
        debug!(target: "pelilauta::pages", site = %page.site_key, key = %page.key, hunks = change.len(), "Recording page history");
        history.history.push(HistoryEntry {
            author: uid.to_string(),
            created_at: now,
            change,
        });
        access::save(&self.db, &doc, &history)
    }

    /// Delete a page, its history, its tag entry and its site entry
    pub fn delete_page(&self, uid: &str, site_key: &str, page_key: &str) -> Result<()> {
        let doc = page_ref(site_key, page_key)?;
        let page: Page = access::require(&self.db, &doc)?;
        let mut site: Site = access::require(&self.db, &site_ref(site_key)?)?;
        if !page.owners.iter().any(|o| o == uid) {
            access::ensure_owner_or_admin(&self.db, uid, &site.owners, &doc)?;
        }

        let store = self.db.store();
        store.delete(&doc)?;
        store.delete(&history_ref(site_key, page_key)?)?;
        tag_index::remove_entry(&self.db, &page_entry_key(site_key, page_key))?;

        site.remove_page_ref(page_key);
        if site.homepage.as_deref() == Some(page_key) {
            site.homepage = None;
        }
        self.touch_site(&mut site, now_millis())?;
        info!(target: "pelilauta::pages", site = site_key, key = page_key, uid, "Page deleted");
        Ok(())
    }

    /// Recorded edits of a page, oldest first; empty when never edited
    pub fn page_history(&self, site_key: &str, page_key: &str) -> Result<PageHistory> {
        Ok(access::load(&self.db, &history_ref(site_key, page_key)?)?.unwrap_or_else(|| {
            PageHistory {
                key: page_key.to_string(),
                site_key: site_key.to_string(),
                history: Vec::new(),
            }
        }))
    }

    /// Page content as it was `steps_back` edits ago
    pub fn revert_page_content(&self, site_key: &str, page_key: &str, steps_back: usize) -> Result<String> {
        let page = self.require_page(site_key, page_key)?;
        let history = self.page_history(site_key, page_key)?;
        reconstruct(&page.markdown_content, &history.history, steps_back)
    }

    /// Restore the content from `steps_back` edits ago as a new edit
    pub fn restore_page(&self, uid: &str, site_key: &str, page_key: &str, steps_back: usize) -> Result<Page> {
        let content = self.revert_page_content(site_key, page_key, steps_back)?;
        self.update_page(
            uid,
            site_key,
            page_key,
            &serde_json::json!({ "markdownContent": content }),
        )
    }
}
