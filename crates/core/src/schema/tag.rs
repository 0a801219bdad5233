//! Tag index schema

use super::Entity;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Kind of entry a tag index record points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// A forum thread
    Thread,
    /// A site page
    Page,
}

/// Tag index record for one tagged entry, keyed by the entry key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagIndexEntry {
    /// Entry key
    #[serde(default)]
    pub key: String,
    /// Entry title
    #[serde(default)]
    pub title: String,
    /// Entry kind
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Lowercase tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Entry author uid
    #[serde(default)]
    pub author: String,
    /// Entry activity time (millis)
    #[serde(default)]
    pub flow_time: i64,
}

impl Entity for TagIndexEntry {
    const KIND: &'static str = "tag";

    fn key(&self) -> &str {
        &self.key
    }

    fn set_key(&mut self, key: String) {
        self.key = key;
    }

    fn validate(&self) -> Result<()> {
        if let Some(bad) = self.tags.iter().find(|t| t.to_lowercase() != **t) {
            return Err(Error::validation(format!("tag: '{}' is not lowercase", bad)));
        }
        Ok(())
    }
}
