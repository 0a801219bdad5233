//! Wiki page schema

use super::{require_non_empty, require_owners, Entity};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A page of a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Document key (slug of the name at creation)
    #[serde(default)]
    pub key: String,
    /// Owning site key
    pub site_key: String,
    /// Page name
    pub name: String,
    /// Page body
    #[serde(default)]
    pub markdown_content: String,
    /// Editors of the page
    pub owners: Vec<String>,
    /// Category within the site
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Lowercase tags
    #[serde(default)]
    pub tags: Vec<String>,
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

impl Page {
    /// First owner
    pub fn author(&self) -> &str {
        self.owners.first().map(String::as_str).unwrap_or_default()
    }
}

impl Entity for Page {
    const KIND: &'static str = "page";

    fn key(&self) -> &str {
        &self.key
    }

    fn set_key(&mut self, key: String) {
        self.key = key;
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(Self::KIND, "siteKey", &self.site_key)?;
        require_non_empty(Self::KIND, "name", &self.name)?;
        require_owners(Self::KIND, &self.owners)
    }
}
