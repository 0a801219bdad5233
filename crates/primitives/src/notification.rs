//! NotificationStore: per-user notifications
//!
//! Notifications are fire-and-forget side effects of other operations
//! (replies, loves). A user never notifies themselves.

use crate::access;
use pelilauta_core::schema::{fields, Entity, Notification};
use pelilauta_core::{collections, new_key, now_millis, DocRef, Error, Result};
use pelilauta_engine::Database;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

fn notification_ref(key: &str) -> DocRef {
    DocRef::new(collections::NOTIFICATIONS, key)
}

/// Store a notification unless it targets its own sender
pub(crate) fn send(db: &Database, mut notification: Notification) -> Result<Option<Notification>> {
    if notification.to == notification.from {
        debug!(target: "pelilauta::notifications", uid = %notification.to, "Skipping self-notification");
        return Ok(None);
    }
    notification.key = new_key();
    notification.read = false;
    notification.created_at = now_millis();
    notification.validate()?;

    access::insert(db, &notification_ref(&notification.key), &notification)?;
    debug!(
        target: "pelilauta::notifications",
        to = %notification.to,
        target_type = %notification.target_type,
        target_key = %notification.target_key,
        "Notification sent"
    );
    Ok(Some(notification))
}

/// Notification inbox
///
/// STATELESS FACADE over Database.
#[derive(Clone)]
pub struct NotificationStore {
    db: Arc<Database>,
}

impl NotificationStore {
    /// Create new NotificationStore instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Send a notification; `None` when sender and recipient are the same
    pub fn send_notification(&self, notification: Notification) -> Result<Option<Notification>> {
        send(&self.db, notification)
    }

    /// Notifications addressed to `uid`, newest first
    pub fn list_notifications(&self, uid: &str) -> Result<Vec<Notification>> {
        let mut list: Vec<Notification> =
            access::find_all(&self.db, collections::NOTIFICATIONS, "to", &Value::from(uid))?;
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.key.cmp(&b.key)));
        Ok(list)
    }

    /// Number of unread notifications for `uid`
    pub fn unread_count(&self, uid: &str) -> Result<usize> {
        Ok(self.list_notifications(uid)?.iter().filter(|n| !n.read).count())
    }

    fn require_own(&self, uid: &str, key: &str) -> Result<Notification> {
        let doc = notification_ref(key);
        let notification: Notification = access::require(&self.db, &doc)?;
        if notification.to != uid {
            return Err(Error::unauthorized(format!("{} may not modify {}", uid, doc)));
        }
        Ok(notification)
    }

    /// Mark one notification read (recipient only)
    pub fn mark_read(&self, uid: &str, key: &str) -> Result<()> {
        self.require_own(uid, key)?;
        self.db
            .store()
            .update(&notification_ref(key), fields(json!({"read": true}))?)?;
        Ok(())
    }

    /// Mark every unread notification of `uid` read, returning how many changed
    pub fn mark_all_read(&self, uid: &str) -> Result<usize> {
        let mut changed = 0;
        for notification in self.list_notifications(uid)?.into_iter().filter(|n| !n.read) {
            self.db.store().update(
                &notification_ref(&notification.key),
                fields(json!({"read": true}))?,
            )?;
            changed += 1;
        }
        Ok(changed)
    }

    /// Delete one notification (recipient only)
    pub fn delete_notification(&self, uid: &str, key: &str) -> Result<bool> {
        self.require_own(uid, key)?;
        self.db.store().delete(&notification_ref(key))
    }
}
