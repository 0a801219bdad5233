//! ProfileStore: public user profiles
//!
//! Profiles are keyed by uid. Nicknames are unique case-insensitively; the
//! check is a collection scan, so two racing creates with the same nick can
//! both pass it.

use crate::access;
use crate::patch::{apply_patch, touches};
use pelilauta_core::schema::Profile;
use pelilauta_core::{collections, normalize_tags, now_millis, DocRef, Entity, Error, Result};
use pelilauta_engine::Database;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Fields only the store changes
const PROTECTED: &[&str] = &["lovedThreads"];

fn profile_ref(uid: &str) -> Result<DocRef> {
    DocRef::checked(collections::PROFILES, uid)
}

/// Public profiles
///
/// STATELESS FACADE over Database.
#[derive(Clone)]
pub struct ProfileStore {
    db: Arc<Database>,
}

impl ProfileStore {
    /// Create new ProfileStore instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn ensure_nick_free(&self, nick: &str, except_uid: &str) -> Result<()> {
        let wanted = nick.trim().to_lowercase();
        let profiles: Vec<Profile> = access::list_all(&self.db, collections::PROFILES)?;
        if profiles
            .iter()
            .any(|p| p.key != except_uid && p.nick.trim().to_lowercase() == wanted)
        {
            return Err(Error::already_exists(format!("nick {}", nick.trim())));
        }
        Ok(())
    }

    /// Create the profile of `uid` (the user itself or an admin)
    ///
    /// Fails with `AlreadyExists` if the uid already has a profile or the
    /// nick is taken (case-insensitively). Frozen users cannot create.
    pub fn create_profile(&self, acting_uid: &str, uid: &str, raw: &Value) -> Result<Profile> {
        let doc = profile_ref(uid)?;
        access::ensure_can_create(&self.db, acting_uid)?;
        access::ensure_owner_or_admin(&self.db, acting_uid, &[uid.to_string()], &doc)?;
        let mut profile = Profile::parse_with_key(uid, raw)?;
        if self.db.store().exists(&doc)? {
            return Err(Error::already_exists(&doc));
        }
        self.ensure_nick_free(&profile.nick, uid)?;

        profile.nick = profile.nick.trim().to_string();
        profile.tags = normalize_tags(&profile.tags);
        profile.loved_threads.clear();
        let now = now_millis();
        profile.created_at = now;
        profile.updated_at = now;

        access::insert(&self.db, &doc, &profile)?;
        info!(target: "pelilauta::profiles", uid, acting_uid, nick = %profile.nick, "Profile created");
        Ok(profile)
    }

    /// Get a profile
    pub fn get_profile(&self, uid: &str) -> Result<Option<Profile>> {
        access::load(&self.db, &profile_ref(uid)?)
    }

    /// Update a profile (its user or an admin)
    ///
    /// A nick change re-checks uniqueness.
    pub fn update_profile(&self, acting_uid: &str, uid: &str, patch: &Value) -> Result<Profile> {
        let doc = profile_ref(uid)?;
        let current: Profile = access::require(&self.db, &doc)?;
        access::ensure_owner_or_admin(&self.db, acting_uid, &[uid.to_string()], &doc)?;

        let mut profile = apply_patch(&current, patch, PROTECTED)?;
        if touches(patch, "nick") {
            profile.nick = profile.nick.trim().to_string();
            self.ensure_nick_free(&profile.nick, uid)?;
        }
        profile.tags = normalize_tags(&profile.tags);
        profile.updated_at = now_millis();

        access::save(&self.db, &doc, &profile)?;
        info!(target: "pelilauta::profiles", uid, acting_uid, "Profile updated");
        Ok(profile)
    }

    /// Delete a profile (its user or an admin)
    pub fn delete_profile(&self, acting_uid: &str, uid: &str) -> Result<()> {
        let doc = profile_ref(uid)?;
        if !self.db.store().exists(&doc)? {
            return Err(Error::not_found(&doc));
        }
        access::ensure_owner_or_admin(&self.db, acting_uid, &[uid.to_string()], &doc)?;
        self.db.store().delete(&doc)?;
        info!(target: "pelilauta::profiles", uid, acting_uid, "Profile deleted");
        Ok(())
    }
}
