//! Page history schema
//!
//! A page's history is a list of reverse diffs, oldest first. Each diff turns
//! the text written by that edit back into the text it replaced.

use super::Entity;
use serde::{Deserialize, Serialize};

/// One contiguous change in a reverse diff
///
/// Applied to the newer text's lines: remove `delete` lines starting at line
/// `at`, then insert `insert` in their place. Line numbers refer to the
/// newer text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// First affected line of the newer text
    pub at: usize,
    /// Number of newer-text lines to remove
    pub delete: usize,
    /// Older-text lines to put back
    #[serde(default)]
    pub insert: Vec<String>,
}

/// Hunks turning a newer text back into the previous one, in line order
pub type ReverseDiff = Vec<Hunk>;

/// A single recorded edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Uid of the editor
    pub author: String,
    /// Edit time (millis)
    pub created_at: i64,
    /// Reverse diff of the edit
    pub change: ReverseDiff,
}

/// Recorded edits of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageHistory {
    /// Page key
    #[serde(default)]
    pub key: String,
    /// Site key
    #[serde(default)]
    pub site_key: String,
    /// Edits, oldest first
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Entity for PageHistory {
    const KIND: &'static str = "page history";

    fn key(&self) -> &str {
        &self.key
    }

    fn set_key(&mut self, key: String) {
        self.key = key;
    }
}
