//! Pelilauta - community backend for tabletop role-playing games
//!
//! Discussion threads with replies and reactions, wiki sites with page
//! history, public profiles and private accounts, a tag index,
//! notifications and character sheets, all kept in an embedded document
//! store and served as HTTP JSON.
//!
//! # Quick Start
//!
//! ```
//! use pelilauta::{Database, ThreadStore, ReplyStore};
//! use serde_json::json;
//!
//! let db = Database::ephemeral();
//! let threads = ThreadStore::new(db.clone());
//! let thread = threads.create_thread("u1", &json!({"title": "Hei"}))?;
//!
//! ReplyStore::new(db.clone()).add_reply("u2", &thread.key, &json!({"markdownContent": "Moi"}))?;
//! assert_eq!(threads.require_thread(&thread.key)?.reply_count, 1);
//! # Ok::<(), pelilauta::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `pelilauta-core`: schema types, errors, keys, slugs and the
//!   `DocumentStore` trait
//! - `pelilauta-storage`: the sharded in-memory store and JSON snapshots
//! - `pelilauta-engine`: `Database`, configuration and page-history diffs
//! - `pelilauta-primitives`: the community facades
//! - `pelilauta-api`: the axum router and the `pelilauta-server` binary

pub use pelilauta_api::{router, serve, AppState, AuthUser, ConfigTokenVerifier, TokenVerifier};
pub use pelilauta_core::schema;
pub use pelilauta_core::{DocRef, DocumentStore, Entity, Error, Result};
pub use pelilauta_engine::{Database, PelilautaConfig, PersistenceMode};
pub use pelilauta_primitives::{
    AccountStore, CharacterSheetStore, MetaStore, NotificationStore, PageStore, ProfileStore,
    ReactionStore, ReplyStore, SiteStore, TagIndex, ThreadStore,
};
pub use pelilauta_storage::ShardedStore;
