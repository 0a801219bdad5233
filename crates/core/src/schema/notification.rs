//! Notification schema

use super::{require_non_empty, Entity};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A notification addressed to one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Document key
    #[serde(default)]
    pub key: String,
    /// Recipient uid
    pub to: String,
    /// Sender uid
    pub from: String,
    /// Kind of target (`thread.reply`, `thread.loved`, ...)
    pub target_type: String,
    /// Target entry key
    pub target_key: String,
    /// Target title for display
    #[serde(default)]
    pub target_title: String,
    /// Optional message
    #[serde(default)]
    pub message: String,
    /// Seen by the recipient
    #[serde(default)]
    pub read: bool,
    /// Creation time (millis)
    #[serde(default)]
    pub created_at: i64,
}

impl Entity for Notification {
    const KIND: &'static str = "notification";

    fn key(&self) -> &str {
        &self.key
    }

    fn set_key(&mut self, key: String) {
        self.key = key;
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(Self::KIND, "to", &self.to)?;
        require_non_empty(Self::KIND, "from", &self.from)?;
        require_non_empty(Self::KIND, "targetType", &self.target_type)?;
        require_non_empty(Self::KIND, "targetKey", &self.target_key)
    }
}
