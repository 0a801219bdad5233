//! TagIndex: content lookup by tag
//!
//! One `tags/{entryKey}` document per tagged thread or page. Tags are
//! normalized (trimmed, lowercased, deduplicated) before they are written,
//! and an entry whose tag list ends up empty is removed instead.
//!
//! Page entries are keyed `{siteKey}:{pageKey}` because page keys are only
//! unique within their site.

use crate::access;
use pelilauta_core::schema::{EntryType, TagIndexEntry};
use pelilauta_core::{collections, normalize_tag, normalize_tags, DocRef, Result};
use pelilauta_engine::Database;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Tag index key of a page
pub fn page_entry_key(site_key: &str, page_key: &str) -> String {
    format!("{}:{}", site_key, page_key)
}

fn entry_ref(key: &str) -> DocRef {
    DocRef::new(collections::TAGS, key)
}

pub(crate) fn write_entry(db: &Database, mut entry: TagIndexEntry) -> Result<Option<TagIndexEntry>> {
    entry.tags = normalize_tags(&entry.tags);
    let doc = entry_ref(&entry.key);

    if entry.tags.is_empty() {
        let removed = db.store().delete(&doc)?;
        debug!(target: "pelilauta::tags", key = %entry.key, removed, "Tag entry cleared");
        return Ok(None);
    }

    access::save(db, &doc, &entry)?;
    debug!(target: "pelilauta::tags", key = %entry.key, tags = ?entry.tags, "Tag entry written");
    Ok(Some(entry))
}

pub(crate) fn remove_entry(db: &Database, key: &str) -> Result<bool> {
    db.store().delete(&entry_ref(key))
}

/// Tag index over threads and pages
///
/// STATELESS FACADE over Database.
#[derive(Clone)]
pub struct TagIndex {
    db: Arc<Database>,
}

impl TagIndex {
    /// Create new TagIndex instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Write the index entry for a piece of content
    ///
    /// Tags are normalized first. Returns `None` (and removes any stored
    /// entry) when no tags remain.
    pub fn update_tags(
        &self,
        key: &str,
        entry_type: EntryType,
        title: &str,
        author: &str,
        flow_time: i64,
        tags: &[String],
    ) -> Result<Option<TagIndexEntry>> {
        write_entry(
            &self.db,
            TagIndexEntry {
                key: key.to_string(),
                title: title.to_string(),
                entry_type,
                tags: tags.to_vec(),
                author: author.to_string(),
                flow_time,
            },
        )
    }

    /// Index entry of a piece of content
    pub fn get(&self, key: &str) -> Result<Option<TagIndexEntry>> {
        access::load(&self.db, &entry_ref(key))
    }

    /// Remove the index entry of a piece of content
    pub fn remove(&self, key: &str) -> Result<bool> {
        remove_entry(&self.db, key)
    }

    /// Entries carrying `tag`, most recent activity first
    pub fn entries_for_tag(&self, tag: &str) -> Result<Vec<TagIndexEntry>> {
        let tag = normalize_tag(tag);
        if tag.is_empty() {
            return Ok(Vec::new());
        }
        let mut entries: Vec<TagIndexEntry> =
            access::find_all(&self.db, collections::TAGS, "tags", &Value::from(tag))?;
        entries.sort_by(|a, b| b.flow_time.cmp(&a.flow_time).then_with(|| a.key.cmp(&b.key)));
        Ok(entries)
    }
}
