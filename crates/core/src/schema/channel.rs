//! Channel schema
//!
//! Channels are not stored as separate documents: the whole list lives in
//! the `meta/threads` document as `topics`, and each entry caches thread
//! count and latest activity pointers.

use super::{parse_value, require_non_empty, Entity};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Channel threads land in when none is given
pub const DEFAULT_CHANNEL: &str = "yleinen";

/// Pointer to the newest entry in a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LatestEntry {
    /// Entry key
    pub key: String,
    /// Entry creation time (millis)
    #[serde(default)]
    pub created_at: i64,
    /// Entry author uid
    #[serde(default)]
    pub author: String,
}

/// A discussion channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// URL slug, unique within the list
    pub slug: String,
    /// Display name
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Icon name
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Grouping category
    #[serde(default = "default_category")]
    pub category: String,
    /// Cached number of threads
    #[serde(default)]
    pub thread_count: i64,
    /// Latest activity time (millis)
    #[serde(default)]
    pub flow_time: i64,
    /// Newest thread
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_thread: Option<LatestEntry>,
    /// Newest reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_reply: Option<LatestEntry>,
}

fn default_icon() -> String {
    "discussion".to_string()
}

fn default_category() -> String {
    "Pelilauta".to_string()
}

impl Entity for Channel {
    const KIND: &'static str = "channel";

    fn key(&self) -> &str {
        &self.slug
    }

    fn set_key(&mut self, key: String) {
        self.slug = key;
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(Self::KIND, "slug", &self.slug)?;
        require_non_empty(Self::KIND, "name", &self.name)
    }
}

/// The `meta/threads` document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChannelsMeta {
    /// Channel list, in display order
    #[serde(default)]
    pub topics: Vec<Channel>,
}

impl ChannelsMeta {
    /// Parse the stored document, validating every channel
    pub fn parse(raw: &Value) -> Result<Self> {
        let meta: ChannelsMeta = parse_value("channels", raw)?;
        for channel in &meta.topics {
            channel.validate()?;
        }
        Ok(meta)
    }

    /// Channel with the given slug
    pub fn find(&self, slug: &str) -> Option<&Channel> {
        self.topics.iter().find(|c| c.slug == slug)
    }
}
