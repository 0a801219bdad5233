//! ReplyStore: thread replies
//!
//! Replies live under `threads/{threadKey}/comments`. Adding a reply
//! increments the thread's `replyCount`, bumps its `flowTime`, moves the
//! channel's latest-reply pointer and notifies the thread owners.
//!
//! Deleting a reply is a three-step cascade with no transaction:
//!
//! 1. remove the reply document
//! 2. decrement the thread's `replyCount` (atomic increment)
//! 3. remove the reaction record keyed by the reply, if any
//!
//! A failure after step 1 is logged; the orphaned counter or reaction
//! record has no other effect.

use crate::access;
use crate::channel_index;
use crate::notification;
use crate::thread::thread_ref;
use pelilauta_core::schema::{fields, Notification, Reply, Thread};
use pelilauta_core::{collections, new_key, now_millis, DocRef, Entity, Result};
use pelilauta_engine::Database;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

fn reply_ref(thread_key: &str, reply_key: &str) -> DocRef {
    DocRef::new(collections::replies(thread_key), reply_key)
}

pub(crate) fn list_for_thread(db: &Database, thread_key: &str) -> Result<Vec<Reply>> {
    let mut replies: Vec<Reply> = access::list_all(db, &collections::replies(thread_key))?;
    replies.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.key.cmp(&b.key)));
    Ok(replies)
}

/// Thread replies
///
/// STATELESS FACADE over Database.
#[derive(Clone)]
pub struct ReplyStore {
    db: Arc<Database>,
}

impl ReplyStore {
    /// Create new ReplyStore instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Add a reply by `uid` to an existing thread
    pub fn add_reply(&self, uid: &str, thread_key: &str, raw: &Value) -> Result<Reply> {
        access::ensure_can_create(&self.db, uid)?;
        let thread_doc = DocRef::checked(collections::THREADS, thread_key)?;
        let thread: Thread = access::require(&self.db, &thread_doc)?;

        let mut body = access::with_owner(raw, uid)?;
        if let Some(map) = body.as_object_mut() {
            map.insert("threadKey".to_string(), Value::from(thread_key));
        }
        let mut reply = Reply::parse_with_key(&new_key(), &body)?;
        let now = now_millis();
        reply.created_at = now;
        reply.updated_at = now;
        reply.flow_time = now;

        access::insert(&self.db, &reply_ref(thread_key, &reply.key), &reply)?;
        info!(target: "pelilauta::replies", thread = thread_key, key = %reply.key, uid, "Reply added");

        let store = self.db.store();
        if let Err(e) = store.increment(&thread_doc, "replyCount", 1) {
            warn!(target: "pelilauta::replies", thread = thread_key, key = %reply.key, error = %e, "Reply added but thread counter not updated");
        }
        if let Err(e) = fields(json!({"flowTime": now})).and_then(|bump| store.update(&thread_doc, bump)) {
            warn!(target: "pelilauta::replies", thread = thread_key, key = %reply.key, error = %e, "Reply added but thread flowTime not bumped");
        }
        if let Err(e) = channel_index::record_new_reply(&self.db, &thread.channel, &reply) {
            warn!(target: "pelilauta::replies", thread = thread_key, channel = %thread.channel, error = %e, "Reply added but channel aggregate not updated");
        }
        for owner in &thread.owners {
            let sent = notification::send(
                &self.db,
                Notification {
                    key: String::new(),
                    to: owner.clone(),
                    from: uid.to_string(),
                    target_type: "thread.reply".to_string(),
                    target_key: thread.key.clone(),
                    target_title: thread.title.clone(),
                    message: String::new(),
                    read: false,
                    created_at: 0,
                },
            );
            if let Err(e) = sent {
                warn!(target: "pelilauta::replies", thread = thread_key, to = %owner, error = %e, "Reply added but owner not notified");
            }
        }
        Ok(reply)
    }

    /// Get a reply
    pub fn get_reply(&self, thread_key: &str, reply_key: &str) -> Result<Option<Reply>> {
        let doc = DocRef::checked(collections::replies(thread_key), reply_key)?;
        access::load(&self.db, &doc)
    }

    /// Replies of a thread, oldest first
    pub fn list_replies(&self, thread_key: &str) -> Result<Vec<Reply>> {
        list_for_thread(&self.db, thread_key)
    }

    /// Update a reply's content (owners or admins)
    pub fn update_reply(
        &self,
        uid: &str,
        thread_key: &str,
        reply_key: &str,
        patch: &Value,
    ) -> Result<Reply> {
        let doc = DocRef::checked(collections::replies(thread_key), reply_key)?;
        let current: Reply = access::require(&self.db, &doc)?;
        access::ensure_owner_or_admin(&self.db, uid, &current.owners, &doc)?;

        let mut reply = crate::patch::apply_patch(&current, patch, &["owners", "threadKey"])?;
        reply.updated_at = now_millis();
        access::save(&self.db, &doc, &reply)?;
        Ok(reply)
    }

    /// Delete a reply and cascade (owners or admins)
    ///
    /// The thread's reply count drops by exactly one; a missing reaction
    /// record is not an error.
    pub fn delete_reply(&self, uid: &str, thread_key: &str, reply_key: &str) -> Result<()> {
        let doc = DocRef::checked(collections::replies(thread_key), reply_key)?;
        let reply: Reply = access::require(&self.db, &doc)?;
        access::ensure_owner_or_admin(&self.db, uid, &reply.owners, &doc)?;

        let store = self.db.store();
        store.delete(&doc)?;

        match store.increment(&thread_ref(thread_key), "replyCount", -1) {
            Ok(reply_count) => {
                info!(target: "pelilauta::replies", thread = thread_key, key = reply_key, uid, reply_count, "Reply deleted")
            }
            Err(e) => {
                warn!(target: "pelilauta::replies", thread = thread_key, key = reply_key, error = %e, "Reply deleted but thread counter not updated")
            }
        }

        let reactions = DocRef::new(collections::REACTIONS, reply_key);
        if let Err(e) = store.delete(&reactions) {
            warn!(target: "pelilauta::replies", key = reply_key, error = %e, "Reply deleted but reaction record left behind");
        }
        Ok(())
    }
}
