//! Community primitives for Pelilauta
//!
//! Each primitive is a stateless facade over the `pelilauta_engine::Database` engine:
//! - **ThreadStore** / **ReplyStore**: discussion threads and their replies
//! - **ReactionStore**: loves and subscriptions
//! - **SiteStore** / **PageStore**: wiki sites, pages and page history
//! - **ProfileStore** / **AccountStore**: public profiles and private accounts
//! - **TagIndex**: tag lookups across threads and pages
//! - **NotificationStore**: per-user inbox
//! - **CharacterSheetStore**: player character sheets
//! - **MetaStore**: admins, frozen users and the channel list
//!
//! ## Design Principle: Stateless Facades
//!
//! Facades hold only an `Arc<Database>`. Any number of them can share one
//! database; all state lives in the document store.
//!
//! ## Denormalized aggregates
//!
//! Reply counts, channel thread counts, page tables of contents and the tag
//! index are copies kept in step by the facade operations that change their
//! sources. The store has no multi-document transactions, so each step is
//! its own write: counters use atomic increments, list-shaped aggregates are
//! read-modify-write and may lose an update under concurrent writers.
//!
//! ## Authorization
//!
//! Mutating calls take the acting uid. Owners (or admins listed in the app
//! metadata) may change an entity; frozen users may not create content.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod access;
pub mod account;
pub mod channel_index;
pub mod character_sheet;
pub mod meta;
pub mod notification;
pub mod page;
pub mod patch;
pub mod profile;
pub mod reactions;
pub mod reply;
pub mod site;
pub mod tag_index;
pub mod thread;

pub use account::AccountStore;
pub use character_sheet::CharacterSheetStore;
pub use meta::MetaStore;
pub use notification::NotificationStore;
pub use page::PageStore;
pub use patch::apply_patch;
pub use profile::ProfileStore;
pub use reactions::ReactionStore;
pub use reply::ReplyStore;
pub use site::SiteStore;
pub use tag_index::{page_entry_key, TagIndex};
pub use thread::ThreadStore;
