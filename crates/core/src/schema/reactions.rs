//! Reaction record schema

use super::Entity;
use serde::{Deserialize, Serialize};

/// Reactions on a single entry, keyed by the entry's key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Reactions {
    /// Key of the reacted entry
    #[serde(default)]
    pub key: String,
    /// Uids following the entry
    #[serde(default)]
    pub subscribers: Vec<String>,
    /// Uids that loved the entry
    #[serde(default)]
    pub love: Vec<String>,
}

impl Reactions {
    /// Whether `uid` has loved the entry
    pub fn loves(&self, uid: &str) -> bool {
        self.love.iter().any(|u| u == uid)
    }
}

impl Entity for Reactions {
    const KIND: &'static str = "reactions";

    fn key(&self) -> &str {
        &self.key
    }

    fn set_key(&mut self, key: String) {
        self.key = key;
    }
}
