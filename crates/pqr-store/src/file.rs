//! JSON file backend.
//!
//! Layout:
//!
//! ```text
//! { "schema_version": 1, "cases": [ { "id": "...", "record": { ... } } ] }
//! ```
//!
//! The file is re-read on every operation so that edits by another process
//! are picked up. Writes go through a temp file and a rename.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::batch::WriteBatch;
use crate::collection::Collection;
use crate::error::{Result, StoreError};
use crate::store::CaseStore;
use crate::types::{CollectionPath, DocumentId, StoredCase};

/// Current collection file schema version.
///
/// Files with a higher version are rejected.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    schema_version: u32,
    #[serde(default)]
    cases: Collection,
}

/// [`CaseStore`] persisted as a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Opens the collection under `root`. The file is created lazily on the
    /// first commit.
    pub fn open(root: &Path, collection: &CollectionPath) -> Result<Self> {
        let path = root.join(collection.relative_file());
        let store = Self::at_path(path);
        // Surface format problems early.
        store.load()?;
        tracing::info!(path = %store.path.display(), %collection, "opened case store");
        Ok(store)
    }

    /// Uses an explicit file path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Collection> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Collection::default());
            }
            Err(e) => {
                return Err(StoreError::Io {
                    operation: "read",
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        let envelope: Envelope =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::InvalidFormat {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        if envelope.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: envelope.schema_version,
                max_supported: CURRENT_SCHEMA_VERSION,
                path: self.path.clone(),
            });
        }

        Ok(envelope.cases)
    }

    fn save(&self, cases: Collection) -> Result<()> {
        let envelope = Envelope {
            schema_version: CURRENT_SCHEMA_VERSION,
            cases,
        };
        let bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|source| StoreError::Serialization { source })?;

        let temp_path = self.path.with_extension("json.tmp");

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = File::create(&temp_path).map_err(|e| StoreError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;
        file.write_all(&bytes).map_err(|e| StoreError::Io {
            operation: "write",
            path: temp_path.clone(),
            source: e,
        })?;
        file.sync_all().map_err(|e| StoreError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| StoreError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: self.path.clone(),
            source: e,
        })?;
        Ok(())
    }
}

impl CaseStore for FileStore {
    fn list(&self) -> Result<Vec<StoredCase>> {
        Ok(self.load()?.documents().to_vec())
    }

    fn get(&self, id: &DocumentId) -> Result<Option<StoredCase>> {
        Ok(self.load()?.get(id).cloned())
    }

    fn commit(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let ops = batch.len();
        let next = self.load()?.with_batch(batch)?;
        self.save(next)?;
        tracing::debug!(ops, path = %self.path.display(), "committed batch");
        Ok(())
    }
}
