//! ReactionStore: loves and subscriptions
//!
//! One `reactions/{entryKey}` record per reacted-to entry (thread or reply).
//! When the entry is a thread, its `lovedCount` mirrors the number of loves
//! and the lover's profile tracks it in `lovedThreads`.

use crate::access;
use crate::notification;
use crate::thread::thread_ref;
use pelilauta_core::schema::{fields, Notification, Profile, Reactions, Thread};
use pelilauta_core::{collections, DocRef, Error, Result};
use pelilauta_engine::Database;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

fn reactions_ref(key: &str) -> Result<DocRef> {
    DocRef::checked(collections::REACTIONS, key)
}

/// Reactions on threads and replies
///
/// STATELESS FACADE over Database.
#[derive(Clone)]
pub struct ReactionStore {
    db: Arc<Database>,
}

impl ReactionStore {
    /// Create new ReactionStore instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Reactions of an entry; empty when none are recorded
    pub fn get_reactions(&self, key: &str) -> Result<Reactions> {
        let doc = reactions_ref(key)?;
        Ok(access::load(&self.db, &doc)?.unwrap_or_else(|| Reactions {
            key: key.to_string(),
            ..Reactions::default()
        }))
    }

    /// Add or remove `uid`'s love on an entry
    ///
    /// Returns the updated record. Adding a love to a thread notifies its
    /// owners.
    pub fn toggle_love(&self, uid: &str, key: &str) -> Result<Reactions> {
        if uid.trim().is_empty() {
            return Err(Error::unauthorized("anonymous users may not react"));
        }
        let doc = reactions_ref(key)?;
        let mut reactions = self.get_reactions(key)?;
        let added = !reactions.loves(uid);
        if added {
            reactions.love.push(uid.to_string());
        } else {
            reactions.love.retain(|u| u != uid);
        }
        access::save(&self.db, &doc, &reactions)?;
        debug!(target: "pelilauta::reactions", key, uid, added, loves = reactions.love.len(), "Love toggled");

        if let Some(thread) = access::load::<Thread>(&self.db, &thread_ref(key))? {
            self.db.store().update(
                &thread_ref(key),
                fields(json!({"lovedCount": reactions.love.len()}))?,
            )?;
            self.sync_profile(uid, key, added)?;
            if added {
                for owner in &thread.owners {
                    notification::send(
                        &self.db,
                        Notification {
                            key: String::new(),
                            to: owner.clone(),
                            from: uid.to_string(),
                            target_type: "thread.loved".to_string(),
                            target_key: thread.key.clone(),
                            target_title: thread.title.clone(),
                            message: String::new(),
                            read: false,
                            created_at: 0,
                        },
                    )?;
                }
            }
        }
        Ok(reactions)
    }

    fn sync_profile(&self, uid: &str, thread_key: &str, loved: bool) -> Result<()> {
        let doc = DocRef::new(collections::PROFILES, uid);
        let Some(mut profile) = access::load::<Profile>(&self.db, &doc)? else {
            return Ok(());
        };
        profile.loved_threads.retain(|k| k != thread_key);
        if loved {
            profile.loved_threads.push(thread_key.to_string());
        }
        self.db.store().update(
            &doc,
            fields(json!({"lovedThreads": profile.loved_threads}))?,
        )?;
        Ok(())
    }

    /// Add `uid` to the subscribers of an entry; returns whether it changed
    pub fn subscribe(&self, uid: &str, key: &str) -> Result<bool> {
        let mut reactions = self.get_reactions(key)?;
        if reactions.subscribers.iter().any(|s| s == uid) {
            return Ok(false);
        }
        reactions.subscribers.push(uid.to_string());
        access::save(&self.db, &reactions_ref(key)?, &reactions)?;
        Ok(true)
    }

    /// Remove `uid` from the subscribers of an entry; returns whether it changed
    pub fn unsubscribe(&self, uid: &str, key: &str) -> Result<bool> {
        let mut reactions = self.get_reactions(key)?;
        let before = reactions.subscribers.len();
        reactions.subscribers.retain(|s| s != uid);
        if reactions.subscribers.len() == before {
            return Ok(false);
        }
        access::save(&self.db, &reactions_ref(key)?, &reactions)?;
        Ok(true)
    }
}
