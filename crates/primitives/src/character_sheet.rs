//! CharacterSheetStore: player character sheets

use crate::access;
use crate::patch::apply_patch;
use pelilauta_core::schema::CharacterSheet;
use pelilauta_core::{collections, new_key, now_millis, DocRef, Entity, Result};
use pelilauta_engine::Database;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

fn sheet_ref(key: &str) -> Result<DocRef> {
    DocRef::checked(collections::CHARACTER_SHEETS, key)
}

/// Character sheets
///
/// STATELESS FACADE over Database.
#[derive(Clone)]
pub struct CharacterSheetStore {
    db: Arc<Database>,
}

impl CharacterSheetStore {
    /// Create new CharacterSheetStore instance
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a sheet owned by `uid` under a generated key
    pub fn create_sheet(&self, uid: &str, raw: &Value) -> Result<CharacterSheet> {
        access::ensure_can_create(&self.db, uid)?;
        let body = access::with_owner(raw, uid)?;
        let mut sheet = CharacterSheet::parse_with_key(&new_key(), &body)?;
        let now = now_millis();
        sheet.created_at = now;
        sheet.updated_at = now;

        access::insert(&self.db, &sheet_ref(&sheet.key)?, &sheet)?;
        info!(target: "pelilauta::sheets", key = %sheet.key, uid, system = %sheet.system, "Character sheet created");
        Ok(sheet)
    }

    /// Get a sheet
    pub fn get_sheet(&self, key: &str) -> Result<Option<CharacterSheet>> {
        access::load(&self.db, &sheet_ref(key)?)
    }

    /// Update a sheet (owners or admins)
    ///
    /// `stats` in the patch replaces the whole stat list.
    pub fn update_sheet(&self, uid: &str, key: &str, patch: &Value) -> Result<CharacterSheet> {
        let doc = sheet_ref(key)?;
        let current: CharacterSheet = access::require(&self.db, &doc)?;
        access::ensure_owner_or_admin(&self.db, uid, &current.owners, &doc)?;

        let mut sheet = apply_patch(&current, patch, &["owners"])?;
        sheet.updated_at = now_millis();
        access::save(&self.db, &doc, &sheet)?;
        Ok(sheet)
    }

    /// Delete a sheet (owners or admins)
    pub fn delete_sheet(&self, uid: &str, key: &str) -> Result<()> {
        let doc = sheet_ref(key)?;
        let sheet: CharacterSheet = access::require(&self.db, &doc)?;
        access::ensure_owner_or_admin(&self.db, uid, &sheet.owners, &doc)?;
        self.db.store().delete(&doc)?;
        info!(target: "pelilauta::sheets", key, uid, "Character sheet deleted");
        Ok(())
    }

    /// Sheets owned by `uid`, most recently edited first
    pub fn list_sheets_for_owner(&self, uid: &str) -> Result<Vec<CharacterSheet>> {
        let mut sheets: Vec<CharacterSheet> = access::find_all(
            &self.db,
            collections::CHARACTER_SHEETS,
            "owners",
            &Value::from(uid),
        )?;
        sheets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.key.cmp(&b.key)));
        Ok(sheets)
    }
}
