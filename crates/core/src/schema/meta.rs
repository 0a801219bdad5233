//! Application metadata schema

use super::parse_value;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `meta/pelilauta` document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AppMeta {
    /// Admin uids
    #[serde(default)]
    pub admins: Vec<String>,
    /// Frozen uids, barred from creating content
    #[serde(default)]
    pub frozen: Vec<String>,
}

impl AppMeta {
    /// Parse the stored document
    pub fn parse(raw: &Value) -> Result<Self> {
        parse_value("app meta", raw)
    }

    /// Whether `uid` is an admin
    pub fn is_admin(&self, uid: &str) -> bool {
        self.admins.iter().any(|a| a == uid)
    }

    /// Whether `uid` is frozen
    pub fn is_frozen(&self, uid: &str) -> bool {
        self.frozen.iter().any(|f| f == uid)
    }
}
