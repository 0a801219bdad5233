//! Character sheet schema

use super::{require_non_empty, require_owners, Entity};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One stat line on a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    /// Stat kind (`number`, `text`, `toggled`, ...)
    #[serde(rename = "type")]
    pub stat_type: String,
    /// Stat name
    pub key: String,
    /// Display group
    #[serde(default)]
    pub group: String,
    /// Current value
    #[serde(default)]
    pub value: Value,
}

/// A character sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheet {
    /// Document key
    #[serde(default)]
    pub key: String,
    /// Character name
    pub name: String,
    /// Game system slug
    pub system: String,
    /// Owner uids
    pub owners: Vec<String>,
    /// Stat lines
    #[serde(default)]
    pub stats: Vec<Stat>,
    /// Creation time (millis)
    #[serde(default)]
    pub created_at: i64,
    /// Last edit time (millis)
    #[serde(default)]
    pub updated_at: i64,
}

impl CharacterSheet {
    /// Whether `uid` owns the sheet
    pub fn is_owner(&self, uid: &str) -> bool {
        self.owners.iter().any(|o| o == uid)
    }
}

impl Entity for CharacterSheet {
    const KIND: &'static str = "character sheet";

    fn key(&self) -> &str {
        &self.key
    }

    fn set_key(&mut self, key: String) {
        self.key = key;
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(Self::KIND, "name", &self.name)?;
        require_non_empty(Self::KIND, "system", &self.system)?;
        require_owners(Self::KIND, &self.owners)
    }
}
