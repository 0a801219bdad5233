//! Disk snapshots for point-in-time persistence
//!
//! A snapshot captures every collection of a [`ShardedStore`] as one JSON
//! file. Writes use the write-fsync-rename pattern:
//!
//! 1. Write to `.{name}.tmp` next to the target
//! 2. fsync the temporary file
//! 3. Atomic rename to the final path
//!
//! A crash mid-write leaves the previous snapshot intact.
//!
//! # File Layout
//!
//! ```text
//! {
//!   "format": 1,
//!   "version": <global write counter>,
//!   "collections": { "<path>": { "<key>": <VersionedDocument> } }
//! }
//! ```

use crate::sharded::ShardedStore;
use pelilauta_core::error::{Error, Result};
use pelilauta_core::limits::Limits;
use pelilauta_core::traits::DocumentStore;
use pelilauta_core::types::VersionedDocument;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Snapshot file name inside the data directory
pub const SNAPSHOT_FILE: &str = "snapshot.json";

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    format: u32,
    version: u64,
    collections: BTreeMap<String, BTreeMap<String, VersionedDocument>>,
}

/// Summary of a written or loaded snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    /// Snapshot file path
    pub path: PathBuf,
    /// Global write counter captured in the snapshot
    pub version: u64,
    /// Number of collections
    pub collections: usize,
    /// Number of documents
    pub documents: usize,
}

/// Path of the snapshot file inside `data_dir`
pub fn snapshot_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SNAPSHOT_FILE)
}

/// Write the full contents of `store` to `path`
pub fn save_snapshot(store: &ShardedStore, path: &Path) -> Result<SnapshotInfo> {
    let mut collections = BTreeMap::new();
    let mut documents = 0;
    for name in store.collections() {
        let docs: BTreeMap<String, VersionedDocument> = store.list(&name)?.into_iter().collect();
        documents += docs.len();
        collections.insert(name, docs);
    }

    let file = SnapshotFile {
        format: FORMAT_VERSION,
        version: store.version(),
        collections,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(path);
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer(&mut writer, &file)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
    }
    fs::rename(&tmp, path)?;

    let info = SnapshotInfo {
        path: path.to_path_buf(),
        version: file.version,
        collections: file.collections.len(),
        documents,
    };
    info!(
        target: "pelilauta::storage",
        path = %path.display(),
        version = info.version,
        documents = info.documents,
        "Snapshot written"
    );
    Ok(info)
}

/// Load a snapshot into a fresh store
///
/// Returns `Ok(None)` when no snapshot exists at `path`.
pub fn load_snapshot(path: &Path, limits: Limits) -> Result<Option<(ShardedStore, SnapshotInfo)>> {
    if !path.exists() {
        return Ok(None);
    }

    let reader = BufReader::new(File::open(path)?);
    let file: SnapshotFile = serde_json::from_reader(reader)?;
    if file.format != FORMAT_VERSION {
        return Err(Error::Serialization(format!(
            "unsupported snapshot format {} (expected {})",
            file.format, FORMAT_VERSION
        )));
    }

    let store = ShardedStore::with_limits(limits);
    let mut documents = 0;
    let collections = file.collections.len();
    for (collection, docs) in file.collections {
        for (key, doc) in docs {
            if pelilauta_core::key::validate_key(&key).is_err() {
                warn!(target: "pelilauta::storage", collection = %collection, key = %key, "Skipping snapshot entry with invalid key");
                continue;
            }
            store.restore(&collection, key, doc);
            documents += 1;
        }
    }
    store.set_version(file.version);

    let info = SnapshotInfo {
        path: path.to_path_buf(),
        version: file.version,
        collections,
        documents,
    };
    info!(
        target: "pelilauta::storage",
        path = %path.display(),
        version = info.version,
        documents = info.documents,
        "Snapshot loaded"
    );
    Ok(Some((store, info)))
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| SNAPSHOT_FILE.to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pelilauta_core::types::DocRef;
    use serde_json::json;
    use tempfile::TempDir;

    fn populated() -> ShardedStore {
        let store = ShardedStore::new();
        let body = |v: serde_json::Value| v.as_object().cloned().unwrap();
        store
            .create(&DocRef::new("threads", "t1"), body(json!({"title": "Hei"})))
            .unwrap();
        store
            .create(&DocRef::new("threads/t1/comments", "r1"), body(json!({"markdownContent": "moi"})))
            .unwrap();
        store.increment(&DocRef::new("threads", "t1"), "replyCount", 1).unwrap();
        store
    }

    #[test]
    fn test_missing_snapshot_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let loaded = load_snapshot(&snapshot_path(dir.path()), Limits::default()).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load_restores_documents_and_versions() {
        let dir = TempDir::new().unwrap();
        let path = snapshot_path(dir.path());
        let store = populated();

        let saved = save_snapshot(&store, &path).unwrap();
        assert_eq!(saved.documents, 2);
        assert_eq!(saved.collections, 2);

        let (loaded, info) = load_snapshot(&path, Limits::default()).unwrap().unwrap();
        assert_eq!(info.version, store.version());
        assert_eq!(loaded.version(), store.version());

        let thread = loaded.get(&DocRef::new("threads", "t1")).unwrap().unwrap();
        assert_eq!(thread.version, 2);
        assert_eq!(thread.data.get("replyCount"), Some(&json!(1)));
        assert_eq!(loaded.list("threads/t1/comments").unwrap().len(), 1);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = snapshot_path(dir.path());
        save_snapshot(&populated(), &path).unwrap();
        assert!(path.exists());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let dir = TempDir::new().unwrap();
        let path = snapshot_path(dir.path());
        fs::write(&path, r#"{"format": 99, "version": 0, "collections": {}}"#).unwrap();
        let err = load_snapshot(&path, Limits::default()).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_corrupt_snapshot_is_error() {
        let dir = TempDir::new().unwrap();
        let path = snapshot_path(dir.path());
        fs::write(&path, "{not json").unwrap();
        assert!(load_snapshot(&path, Limits::default()).is_err());
    }
}
