//! Database struct and open/close logic
//!
//! This module provides the `Database` that every facade shares:
//! - Storage initialization (ephemeral, or loaded from a disk snapshot)
//! - The process-wide application metadata cache
//! - Snapshot persistence on demand and at shutdown
//!
//! The database holds no per-request state. Facades in `pelilauta-primitives`
//! wrap an `Arc<Database>` and go through [`Database::store`].

pub mod config;

pub use config::{AuthConfig, CacheConfig, PelilautaConfig, BIND_ENV, CONFIG_FILE_NAME};

use parking_lot::RwLock;
use pelilauta_core::schema::AppMeta;
use pelilauta_core::{DocumentStore, Limits, Result};
use pelilauta_storage::{load_snapshot, save_snapshot, snapshot_path, ShardedStore, SnapshotInfo};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

// ============================================================================
// Persistence Mode
// ============================================================================

/// Controls whether the store is written to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceMode {
    /// No disk files at all; data is lost when the process exits
    Ephemeral,
    /// Snapshots are loaded on open and written by `flush`
    Snapshot,
}

// ============================================================================
// Database Struct
// ============================================================================

/// Shared application database
///
/// # Example
///
/// ```
/// use pelilauta_engine::Database;
///
/// let db = Database::ephemeral();
/// assert!(db.cached_app_meta().is_none());
/// ```
pub struct Database {
    /// Store used by every facade
    store: Arc<dyn DocumentStore>,

    /// Concrete sharded store when this database owns it (snapshot source)
    sharded: Option<Arc<ShardedStore>>,

    /// Snapshot directory; `None` for ephemeral databases
    data_dir: Option<PathBuf>,

    /// Configuration the database was opened with
    config: PelilautaConfig,

    /// Cached `meta/pelilauta`, filled on first read
    ///
    /// parking_lot avoids lock poisoning on panic.
    app_meta: RwLock<Option<AppMeta>>,
}

impl Database {
    /// In-memory database with default configuration
    pub fn ephemeral() -> Arc<Self> {
        Self::ephemeral_with_config(PelilautaConfig::default())
    }

    /// In-memory database with the given configuration (its `data_dir` is ignored)
    pub fn ephemeral_with_config(config: PelilautaConfig) -> Arc<Self> {
        let sharded = Arc::new(ShardedStore::new());
        Arc::new(Self {
            store: sharded.clone(),
            sharded: Some(sharded),
            data_dir: None,
            config,
            app_meta: RwLock::new(None),
        })
    }

    /// Open a database according to `config`
    ///
    /// With `data_dir` set, the directory is created if needed and an
    /// existing snapshot is loaded. Without it the database is ephemeral.
    pub fn open(config: PelilautaConfig) -> Result<Arc<Self>> {
        config.validate()?;
        let Some(data_dir) = config.data_dir.clone() else {
            info!(target: "pelilauta::engine", "Opening ephemeral database");
            return Ok(Self::ephemeral_with_config(config));
        };

        std::fs::create_dir_all(&data_dir)?;
        let sharded = match load_snapshot(&snapshot_path(&data_dir), Limits::default())? {
            Some((store, info)) => {
                info!(
                    target: "pelilauta::engine",
                    data_dir = %data_dir.display(),
                    documents = info.documents,
                    "Recovered database from snapshot"
                );
                store
            }
            None => {
                info!(target: "pelilauta::engine", data_dir = %data_dir.display(), "Opening new database");
                ShardedStore::new()
            }
        };

        let sharded = Arc::new(sharded);
        Ok(Arc::new(Self {
            store: sharded.clone(),
            sharded: Some(sharded),
            data_dir: Some(data_dir),
            config,
            app_meta: RwLock::new(None),
        }))
    }

    /// Wrap an external store; snapshots are unavailable
    pub fn with_store(store: Arc<dyn DocumentStore>, config: PelilautaConfig) -> Arc<Self> {
        Arc::new(Self {
            store,
            sharded: None,
            data_dir: None,
            config,
            app_meta: RwLock::new(None),
        })
    }

    /// Underlying document store
    #[inline]
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Configuration the database was opened with
    pub fn config(&self) -> &PelilautaConfig {
        &self.config
    }

    /// Snapshot directory, if persistent
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Whether writes survive a restart
    pub fn persistence_mode(&self) -> PersistenceMode {
        if self.data_dir.is_some() && self.sharded.is_some() {
            PersistenceMode::Snapshot
        } else {
            PersistenceMode::Ephemeral
        }
    }

    /// Write a snapshot of the whole store
    ///
    /// Returns `Ok(None)` for ephemeral databases.
    pub fn flush(&self) -> Result<Option<SnapshotInfo>> {
        match (&self.data_dir, &self.sharded) {
            (Some(dir), Some(sharded)) => Ok(Some(save_snapshot(sharded, &snapshot_path(dir))?)),
            _ => Ok(None),
        }
    }

    // ========================================================================
    // Application metadata cache
    // ========================================================================

    /// Cached application metadata, if loaded
    pub fn cached_app_meta(&self) -> Option<AppMeta> {
        self.app_meta.read().clone()
    }

    /// Replace the cached application metadata
    pub fn cache_app_meta(&self, meta: AppMeta) {
        *self.app_meta.write() = Some(meta);
    }

    /// Drop the cached application metadata so the next read reloads it
    pub fn invalidate_app_meta(&self) {
        *self.app_meta.write() = None;
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("data_dir", &self.data_dir)
            .field("persistence", &self.persistence_mode())
            .finish()
    }
}
