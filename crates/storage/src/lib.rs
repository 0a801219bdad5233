//! Storage layer for Pelilauta
//!
//! This crate implements the embedded document store:
//! - ShardedStore: DashMap by collection path + FxHashMap of documents
//! - Per-document versions and a global write counter (AtomicU64)
//! - Key and document size limits enforced on every write
//! - Disk snapshots (JSON, write-fsync-rename) for persistence across restarts
//!
//! # Concurrency
//!
//! - Lock-free reads via DashMap
//! - Per-collection sharding (no cross-collection contention)
//! - Read-modify-write calls hold the shard guard for their whole duration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod disk_snapshot;
pub mod sharded;

pub use disk_snapshot::{load_snapshot, save_snapshot, snapshot_path, SnapshotInfo, SNAPSHOT_FILE};
pub use sharded::{Shard, ShardedStore};
