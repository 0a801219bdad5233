//! Thread reply schema

use super::{require_non_empty, require_owners, Entity};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A reply in a thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    /// Document key
    #[serde(default)]
    pub key: String,
    /// Parent thread key
    pub thread_key: String,
    /// Reply body
    pub markdown_content: String,
    /// Author uids
    pub owners: Vec<String>,
    /// Key of the reply this one quotes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_ref: Option<String>,
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

impl Reply {
    /// First owner
    pub fn author(&self) -> &str {
        self.owners.first().map(String::as_str).unwrap_or_default()
    }

    /// Whether `uid` is listed as an owner
    pub fn is_owner(&self, uid: &str) -> bool {
        self.owners.iter().any(|o| o == uid)
    }
}

impl Entity for Reply {
    const KIND: &'static str = "reply";

    fn key(&self) -> &str {
        &self.key
    }

    fn set_key(&mut self, key: String) {
        self.key = key;
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(Self::KIND, "threadKey", &self.thread_key)?;
        require_non_empty(Self::KIND, "markdownContent", &self.markdown_content)?;
        require_owners(Self::KIND, &self.owners)
    }
}
