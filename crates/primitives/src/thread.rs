//! ThreadStore: forum threads
//!
//! ## Design: STATELESS FACADE
//!
//! ThreadStore holds ONLY `Arc<Database>`. Creating or removing a thread
//! also maintains the dependent aggregates:
//!
//! | Operation | Side effects |
//! |-----------|--------------|
//! | `create_thread` | channel count + latest pointers, tag index |
//! | `update_thread` | tag index, channel counts when the channel changes |
//! | `delete_thread` | replies, reaction records, tag index, channel count |
//!
//! None of these run in a transaction. A failing side effect after the
//! thread write is logged and the thread write stands.

use crate::access;
use crate::channel_index;
use crate::patch::{apply_patch, touches};
use crate::tag_index;
use pelilauta_core::schema::{EntryType, Reply, TagIndexEntry, Thread};
use pelilauta_core::{
    collections, extract_tags, new_key, normalize_tags, now_millis, DocRef, Entity, Error, Result,
};
use pelilauta_engine::Database;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Fields only the store changes
const PROTECTED: &[&str] = &["owners", "replyCount", "lovedCount"];

pub(crate) fn thread_ref(key: &str) -> DocRef {
    DocRef::new(collections::THREADS, key)
}

/// Explicit tags plus `#hashtags` from the content, normalized
fn collect_tags(thread: &Thread) -> Vec<String> {
    normalize_tags(
        thread
            .tags
            .iter()
            .cloned()
            .chain(extract_tags(&thread.markdown_content)),
    )
}

/// How a thread write moves it between channels
enum ChannelChange<'a> {
    Added,
    Moved(&'a str),
    Unchanged,
}

fn index_entry(thread: &Thread) -> TagIndexEntry {
    TagIndexEntry {
        key: thread.key.clone(),
        title: thread.title.clone(),
        entry_type: EntryType::Thread,
        tags: thread.tags.clone(),
        author: thread.author().to_string(),
        flow_time: thread.flow_time,
    }
}

/// Forum threads
///
/// # Example
///
/// ```
/// use pelilauta_engine::Database;
/// use pelilauta_primitives::ThreadStore;
/// use serde_json::json;
///
/// let threads = ThreadStore::new(Database::ephemeral());
/// let thread = threads
///     .create_thread("u1", &json!({"title": "Hei", "markdownContent": "#osr"}))
///     .unwrap();
/// assert_eq!(thread.tags, vec!["osr".to_string()]);
/// ```
#[derive(Clone)]
pub struct ThreadStore {
    db: Arc<Database>,
}

impl ThreadStore {
    /// Create new ThreadStore instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get the underlying database reference
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Create a thread owned by `uid`
    ///
    /// The key is generated; counters start at zero; `createdAt`,
    /// `updatedAt` and `flowTime` are set to now. A missing channel falls
    /// back to the configured default channel.
    pub fn create_thread(&self, uid: &str, raw: &Value) -> Result<Thread> {
        access::ensure_can_create(&self.db, uid)?;
        let mut body = access::with_owner(raw, uid)?;
        if let Some(map) = body.as_object_mut() {
            if !map.contains_key("channel") {
                map.insert(
                    "channel".to_string(),
                    Value::from(self.db.config().default_channel.clone()),
                );
            }
        }

        let mut thread = Thread::parse_with_key(&new_key(), &body)?;
        let now = now_millis();
        thread.reply_count = 0;
        thread.loved_count = 0;
        thread.created_at = now;
        thread.updated_at = now;
        thread.flow_time = now;
        thread.tags = collect_tags(&thread);

        access::insert(&self.db, &thread_ref(&thread.key), &thread)?;
        info!(target: "pelilauta::threads", key = %thread.key, channel = %thread.channel, uid, "Thread created");

        self.record_aggregates(&thread, ChannelChange::Added);
        Ok(thread)
    }

    /// Channel and tag side effects of a thread write; failures only warn
    fn record_aggregates(&self, thread: &Thread, channel: ChannelChange<'_>) {
        if let ChannelChange::Moved(previous) = channel {
            if let Err(e) = channel_index::record_removed_thread(&self.db, previous) {
                warn!(target: "pelilauta::threads", key = %thread.key, channel = previous, error = %e, "Thread moved but old channel count not updated");
            }
        }
        if !matches!(channel, ChannelChange::Unchanged) {
            if let Err(e) = channel_index::record_new_thread(&self.db, thread) {
                warn!(target: "pelilauta::threads", key = %thread.key, channel = %thread.channel, error = %e, "Thread stored but channel aggregate not updated");
            }
        }
        if let Err(e) = tag_index::write_entry(&self.db, index_entry(thread)) {
            warn!(target: "pelilauta::threads", key = %thread.key, error = %e, "Thread stored but tag index not updated");
        }
    }

    /// Get a thread
    pub fn get_thread(&self, key: &str) -> Result<Option<Thread>> {
        access::load(&self.db, &DocRef::checked(collections::THREADS, key)?)
    }

    /// Get a thread or fail with `NotFound`
    pub fn require_thread(&self, key: &str) -> Result<Thread> {
        access::require(&self.db, &DocRef::checked(collections::THREADS, key)?)
    }

    /// Update a thread (owners or admins)
    ///
    /// `owners`, counters and timestamps cannot be patched. Content updates
    /// bump `flowTime`.
    pub fn update_thread(&self, uid: &str, key: &str, patch: &Value) -> Result<Thread> {
        let current = self.require_thread(key)?;
        let doc = thread_ref(key);
        access::ensure_owner_or_admin(&self.db, uid, &current.owners, &doc)?;

        let mut thread = apply_patch(&current, patch, PROTECTED)?;
        let now = now_millis();
        thread.updated_at = now;
        thread.flow_time = now;
        if touches(patch, "tags") || touches(patch, "markdownContent") {
            thread.tags = collect_tags(&thread);
        }

        access::save(&self.db, &doc, &thread)?;
        info!(target: "pelilauta::threads", key, uid, "Thread updated");

        let channel = if thread.channel != current.channel {
            ChannelChange::Moved(&current.channel)
        } else {
            ChannelChange::Unchanged
        };
        self.record_aggregates(&thread, channel);
        Ok(thread)
    }

    /// Delete a thread and everything hanging off it (owners or admins)
    ///
    /// Removes the replies, the reaction records of the thread and its
    /// replies, the tag index entry, and decrements the channel count.
    pub fn delete_thread(&self, uid: &str, key: &str) -> Result<()> {
        let thread = self.require_thread(key)?;
        let doc = thread_ref(key);
        access::ensure_owner_or_admin(&self.db, uid, &thread.owners, &doc)?;

        let store = self.db.store();
        let replies = collections::replies(key);
        for (reply_key, _) in store.list(&replies)? {
            if let Err(e) = store.delete(&DocRef::new(collections::REACTIONS, reply_key.as_str())) {
                warn!(target: "pelilauta::threads", key, reply = %reply_key, error = %e, "Failed to remove reply reactions");
            }
        }
        let removed_replies = store.delete_collection(&replies)?;
        store.delete(&DocRef::new(collections::REACTIONS, key))?;
        tag_index::remove_entry(&self.db, key)?;
        store.delete(&doc)?;

        if let Err(e) = channel_index::record_removed_thread(&self.db, &thread.channel) {
            warn!(target: "pelilauta::threads", key, channel = %thread.channel, error = %e, "Thread deleted but channel count not updated");
        }
        info!(target: "pelilauta::threads", key, uid, removed_replies, "Thread deleted");
        Ok(())
    }

    /// Threads, optionally limited to one channel, most recent activity first
    ///
    /// Non-public threads only when `include_private` is set.
    pub fn list_threads(
        &self,
        channel: Option<&str>,
        limit: usize,
        include_private: bool,
    ) -> Result<Vec<Thread>> {
        let mut threads: Vec<Thread> = match channel {
            Some(slug) => {
                access::find_all(&self.db, collections::THREADS, "channel", &Value::from(slug))?
            }
            None => access::list_all(&self.db, collections::THREADS)?,
        };
        threads.retain(|t| include_private || t.public);
        threads.sort_by(|a, b| b.flow_time.cmp(&a.flow_time).then_with(|| a.key.cmp(&b.key)));
        threads.truncate(limit);
        Ok(threads)
    }

    /// Threads owned by `uid`, most recent activity first
    pub fn list_threads_by_owner(&self, uid: &str) -> Result<Vec<Thread>> {
        let mut threads: Vec<Thread> =
            access::find_all(&self.db, collections::THREADS, "owners", &Value::from(uid))?;
        threads.sort_by(|a, b| b.flow_time.cmp(&a.flow_time));
        Ok(threads)
    }

    /// Replies of a thread, oldest first
    ///
    /// Shortcut for callers that only hold a ThreadStore.
    pub fn replies(&self, key: &str) -> Result<Vec<Reply>> {
        if !self.db.store().exists(&thread_ref(key))? {
            return Err(Error::not_found(thread_ref(key)));
        }
        crate::reply::list_for_thread(&self.db, key)
    }
}
