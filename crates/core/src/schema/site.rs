//! Wiki site schema

use super::{require_non_empty, require_owners, Entity};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A wiki-like site holding pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    /// Document key (slug of the name at creation)
    #[serde(default)]
    pub key: String,
    /// Display name
    pub name: String,
    /// Uids allowed to administer the site
    pub owners: Vec<String>,
    /// Uids allowed to edit pages
    #[serde(default)]
    pub players: Vec<String>,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Game system slug
    #[serde(default = "default_system")]
    pub system: String,
    /// Hidden from public listings
    #[serde(default)]
    pub hidden: bool,
    /// Page ordering used by clients
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
    /// Key of the front page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Denormalized index of the site's pages
    #[serde(default)]
    pub page_refs: Vec<PageRef>,
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

/// Cached summary of a page kept on its site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRef {
    /// Page key
    pub key: String,
    /// Page name
    pub name: String,
    /// Latest editor
    #[serde(default)]
    pub author: String,
    /// Latest activity time (millis)
    #[serde(default)]
    pub flow_time: i64,
    /// Page category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

fn default_system() -> String {
    "homebrew".to_string()
}

fn default_sort_order() -> String {
    "name".to_string()
}

impl Site {
    /// Whether `uid` owns the site
    pub fn is_owner(&self, uid: &str) -> bool {
        self.owners.iter().any(|o| o == uid)
    }

    /// Whether `uid` may edit the site's pages
    pub fn can_edit(&self, uid: &str) -> bool {
        self.is_owner(uid) || self.players.iter().any(|p| p == uid)
    }

    /// Insert or replace the page ref with the same key
    pub fn upsert_page_ref(&mut self, page_ref: PageRef) {
        match self.page_refs.iter_mut().find(|r| r.key == page_ref.key) {
            Some(existing) => *existing = page_ref,
            None => self.page_refs.push(page_ref),
        }
    }

    /// Remove the page ref for `page_key`, returning whether one was present
    pub fn remove_page_ref(&mut self, page_key: &str) -> bool {
        let before = self.page_refs.len();
        self.page_refs.retain(|r| r.key != page_key);
        self.page_refs.len() != before
    }
}

impl Entity for Site {
    const KIND: &'static str = "site";

    fn key(&self) -> &str {
        &self.key
    }

    fn set_key(&mut self, key: String) {
        self.key = key;
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(Self::KIND, "name", &self.name)?;
        require_owners(Self::KIND, &self.owners)
    }
}
