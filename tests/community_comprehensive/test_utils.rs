//! Test utilities for the community suite

use pelilauta_core::schema::{AppMeta, Channel, ChannelsMeta, Entity};
use pelilauta_engine::{Database, PelilautaConfig};
use pelilauta_primitives::{
    AccountStore, CharacterSheetStore, MetaStore, NotificationStore, PageStore, ProfileStore,
    ReactionStore, ReplyStore, SiteStore, TagIndex, ThreadStore,
};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

/// Channels seeded into every test database
pub const CHANNELS: &[(&str, &str)] = &[("yleinen", "Yleinen"), ("dnd", "D&D"), ("pbta", "PbtA")];

/// Uid listed as admin in every test database
pub const ADMIN: &str = "admin";

/// Every facade over one database
pub struct TestCommunity {
    pub db: Arc<Database>,
    pub threads: ThreadStore,
    pub replies: ReplyStore,
    pub reactions: ReactionStore,
    pub sites: SiteStore,
    pub pages: PageStore,
    pub profiles: ProfileStore,
    pub accounts: AccountStore,
    pub tags: TagIndex,
    pub notifications: NotificationStore,
    pub sheets: CharacterSheetStore,
    pub meta: MetaStore,
}

impl TestCommunity {
    /// Ephemeral database with channels and one admin
    pub fn new() -> Self {
        let community = Self::over(Database::ephemeral());
        community.seed();
        community
    }

    /// Database persisted under `dir`, seeded only when empty
    pub fn persistent(dir: &Path) -> Self {
        let config = PelilautaConfig {
            data_dir: Some(dir.to_path_buf()),
            ..PelilautaConfig::default()
        };
        let community = Self::over(Database::open(config).expect("open database"));
        if community.meta.channels().unwrap().topics.is_empty() {
            community.seed();
        }
        community
    }

    fn over(db: Arc<Database>) -> Self {
        Self {
            threads: ThreadStore::new(db.clone()),
            replies: ReplyStore::new(db.clone()),
            reactions: ReactionStore::new(db.clone()),
            sites: SiteStore::new(db.clone()),
            pages: PageStore::new(db.clone()),
            profiles: ProfileStore::new(db.clone()),
            accounts: AccountStore::new(db.clone()),
            tags: TagIndex::new(db.clone()),
            notifications: NotificationStore::new(db.clone()),
            sheets: CharacterSheetStore::new(db.clone()),
            meta: MetaStore::new(db.clone()),
            db,
        }
    }

    fn seed(&self) {
        let topics = CHANNELS
            .iter()
            .map(|(slug, name)| Channel::parse(&json!({"slug": slug, "name": name})).unwrap())
            .collect();
        self.meta.save_channels(&ChannelsMeta { topics }).unwrap();
        self.meta
            .save_app_meta(&AppMeta {
                admins: vec![ADMIN.to_string()],
                frozen: vec![],
            })
            .unwrap();
    }

    /// Cached thread count of a channel
    pub fn channel_count(&self, slug: &str) -> i64 {
        self.meta
            .channels()
            .unwrap()
            .find(slug)
            .map(|c| c.thread_count)
            .unwrap_or_else(|| panic!("channel {} missing", slug))
    }

    /// Current reply count of a thread
    pub fn reply_count(&self, thread_key: &str) -> i64 {
        self.threads.require_thread(thread_key).unwrap().reply_count
    }
}
