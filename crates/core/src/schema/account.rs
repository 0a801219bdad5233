//! Private account schema

use super::{require_non_empty, Entity};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Private account settings of a user, keyed by uid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// User id, also the document key
    #[serde(default)]
    pub uid: String,
    /// User accepted the terms of use
    #[serde(default)]
    pub eula_accepted: bool,
    /// UI language code
    #[serde(default = "default_language")]
    pub language: String,
    /// Latest login time (millis)
    #[serde(default)]
    pub last_login: i64,
    /// Account is frozen by an admin
    #[serde(default)]
    pub frozen: bool,
    /// Creation time (millis)
    #[serde(default)]
    pub created_at: i64,
    /// Last edit time (millis)
    #[serde(default)]
    pub updated_at: i64,
}

fn default_language() -> String {
    "fi".to_string()
}

impl Entity for Account {
    const KIND: &'static str = "account";

    fn key(&self) -> &str {
        &self.uid
    }

    fn set_key(&mut self, key: String) {
        self.uid = key;
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(Self::KIND, "uid", &self.uid)
    }
}
