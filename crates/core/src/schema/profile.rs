//! Public profile schema

use super::{require_non_empty, Entity};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Public profile of a user, keyed by uid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Document key (uid)
    #[serde(default)]
    pub key: String,
    /// Display nickname, unique case-insensitively
    pub nick: String,
    /// Handle derived from the nickname
    #[serde(default)]
    pub username: String,
    /// Avatar image URL
    #[serde(default, rename = "avatarURL", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Free-form bio
    #[serde(default)]
    pub bio: String,
    /// Lowercase interest tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Thread keys the user has loved
    #[serde(default)]
    pub loved_threads: Vec<String>,
    /// Creation time (millis)
    #[serde(default)]
    pub created_at: i64,
    /// Last edit time (millis)
    #[serde(default)]
    pub updated_at: i64,
}

impl Entity for Profile {
    const KIND: &'static str = "profile";

    fn key(&self) -> &str {
        &self.key
    }

    fn set_key(&mut self, key: String) {
        self.key = key;
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(Self::KIND, "nick", &self.nick)
    }
}
