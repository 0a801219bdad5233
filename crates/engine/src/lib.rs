//! Database engine for Pelilauta
//!
//! This crate sits between storage and the entity facades:
//! - Database: owns the document store, configuration and app metadata cache
//! - Config: `pelilauta.toml` loading with commented defaults
//! - History: line-based reverse diffs for page history
//!
//! The engine is the only component that knows about:
//! - Where the store comes from (ephemeral or snapshot-backed)
//! - When snapshots are written

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;
pub mod history;

pub use database::{
    AuthConfig, CacheConfig, Database, PelilautaConfig, PersistenceMode, BIND_ENV,
    CONFIG_FILE_NAME,
};
pub use history::{apply_reverse, reconstruct, reverse_diff};
