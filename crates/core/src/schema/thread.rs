//! Forum thread schema

use super::{require_non_empty, require_owners, Entity};
use crate::error::Result;
use serde::{Deserialize, Serialize};

use super::channel::DEFAULT_CHANNEL;

/// A forum thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    /// Document key
    #[serde(default)]
    pub key: String,
    /// Thread title
    pub title: String,
    /// Channel slug the thread is filed under
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Opening post body
    #[serde(default)]
    pub markdown_content: String,
    /// Uids allowed to edit the thread; the first one is the author
    pub owners: Vec<String>,
    /// Lowercase tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Number of replies, kept by the reply primitives
    #[serde(default)]
    pub reply_count: i64,
    /// Number of loves, kept by the reaction primitives
    #[serde(default)]
    pub loved_count: i64,
    /// Listed in public feeds
    #[serde(default = "default_true")]
    pub public: bool,
    /// Pinned to the top of its channel
    #[serde(default)]
    pub sticky: bool,
    /// Site the thread discusses, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_key: Option<String>,
    /// Creation time (millis)
    #[serde(default)]
    pub created_at: i64,
    /// Last edit time (millis)
    #[serde(default)]
    pub updated_at: i64,
    /// Latest activity time (millis)
    #[serde(default)]
    pub flow_time: i64,
}

fn default_channel() -> String {
    DEFAULT_CHANNEL.to_string()
}

fn default_true() -> bool {
    true
}

impl Thread {
    /// First owner, used as the author on aggregates
    pub fn author(&self) -> &str {
        self.owners.first().map(String::as_str).unwrap_or_default()
    }

    /// Whether `uid` is listed as an owner
    pub fn is_owner(&self, uid: &str) -> bool {
        self.owners.iter().any(|o| o == uid)
    }
}

impl Entity for Thread {
    const KIND: &'static str = "thread";

    fn key(&self) -> &str {
        &self.key
    }

    fn set_key(&mut self, key: String) {
        self.key = key;
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(Self::KIND, "title", &self.title)?;
        require_owners(Self::KIND, &self.owners)?;
        require_non_empty(Self::KIND, "channel", &self.channel)
    }
}
