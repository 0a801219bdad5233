//! Core types and traits for Pelilauta
//!
//! This crate defines the foundational types used throughout the system:
//! - Error: Error type shared by every layer
//! - DocRef / Document / VersionedDocument: document addressing and bodies
//! - Key validation and size limits
//! - Slug and tag helpers (`to_mekanismi_uri`, `normalize_tags`)
//! - Traits: `DocumentStore`, the seam between primitives and storage
//! - Schemas: entity structs with `parse` (Thread, Reply, Site, Page, ...)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod key;
pub mod limits;
pub mod schema;
pub mod slug;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use key::{validate_key, KeyError};
pub use limits::{LimitError, Limits};
pub use schema::Entity;
pub use slug::{extract_tags, normalize_tag, normalize_tags, to_mekanismi_uri};
pub use traits::DocumentStore;
pub use types::{collections, new_key, now_millis, DocRef, Document, VersionedDocument};
