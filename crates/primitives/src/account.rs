//! AccountStore: private per-user settings
//!
//! Accounts are keyed by uid and read only by their user. The `frozen`
//! flag is admin-controlled and checked by every content-creating call.

use crate::access;
use crate::patch::{apply_patch, touches};
use pelilauta_core::schema::{fields, Account};
use pelilauta_core::{collections, now_millis, DocRef, Entity, Error, Result};
use pelilauta_engine::Database;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

fn account_ref(uid: &str) -> Result<DocRef> {
    DocRef::checked(collections::ACCOUNTS, uid)
}

/// Private accounts
///
/// STATELESS FACADE over Database.
#[derive(Clone)]
pub struct AccountStore {
    db: Arc<Database>,
}

impl AccountStore {
    /// Create new AccountStore instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create the account of `uid`; fails with `AlreadyExists` if present
    pub fn create_account(&self, uid: &str, raw: &Value) -> Result<Account> {
        let doc = account_ref(uid)?;
        let mut account = Account::parse_with_key(uid, raw)?;
        account.frozen = false;
        let now = now_millis();
        account.created_at = now;
        account.updated_at = now;
        account.last_login = now;

        access::insert(&self.db, &doc, &account)?;
        info!(target: "pelilauta::accounts", uid, "Account created");
        Ok(account)
    }

    /// Get an account
    pub fn get_account(&self, uid: &str) -> Result<Option<Account>> {
        access::load(&self.db, &account_ref(uid)?)
    }

    /// Update an account (its user or an admin)
    ///
    /// Only admins may change `frozen`.
    pub fn update_account(&self, acting_uid: &str, uid: &str, patch: &Value) -> Result<Account> {
        let doc = account_ref(uid)?;
        let current: Account = access::require(&self.db, &doc)?;
        access::ensure_owner_or_admin(&self.db, acting_uid, &[uid.to_string()], &doc)?;
        if touches(patch, "frozen") {
            access::ensure_admin(&self.db, acting_uid)?;
        }

        let mut account = apply_patch(&current, patch, &["uid", "lastLogin"])?;
        account.updated_at = now_millis();
        access::save(&self.db, &doc, &account)?;
        info!(target: "pelilauta::accounts", uid, acting_uid, frozen = account.frozen, "Account updated");
        Ok(account)
    }

    /// Stamp `lastLogin` with the current time
    pub fn record_login(&self, uid: &str) -> Result<i64> {
        let doc = account_ref(uid)?;
        if !self.db.store().exists(&doc)? {
            return Err(Error::not_found(&doc));
        }
        let now = now_millis();
        self.db.store().update(&doc, fields(json!({"lastLogin": now}))?)?;
        Ok(now)
    }

    /// Mark the terms of use accepted
    pub fn accept_eula(&self, uid: &str) -> Result<Account> {
        let doc = account_ref(uid)?;
        if !self.db.store().exists(&doc)? {
            return Err(Error::not_found(&doc));
        }
        self.db.store().update(
            &doc,
            fields(json!({"eulaAccepted": true, "updatedAt": now_millis()}))?,
        )?;
        access::require(&self.db, &doc)
    }
}
