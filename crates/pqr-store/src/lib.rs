//! Case document store.
//!
//! Cases are documents keyed by an opaque store id, independent of the
//! business key `SN`. All writes go through [`WriteBatch`]: a batch applies
//! completely or not at all.
//!
//! # Backends
//!
//! - [`MemoryStore`]: process-local, used by tests and dry runs
//! - [`FileStore`]: one JSON document per collection, written atomically
//!   (temp file + rename) under `artifacts/<app>/users/<user>/cases.json`
//!
//! # Example
//!
//! ```ignore
//! use pqr_model::CaseRecord;
//! use pqr_store::{CaseStore, CollectionPath, FileStore, WriteBatch};
//!
//! let store = FileStore::open(root, &CollectionPath::new("pqr", "operador-1"))?;
//! let mut batch = WriteBatch::new();
//! let id = batch.insert(CaseRecord::new("12345"));
//! store.commit(batch)?;
//! ```
//!
//! Consistency between concurrent writers is last-write-wins; the store does
//! no locking across processes.

mod batch;
mod collection;
mod error;
mod file;
mod memory;
mod store;
mod types;

pub use batch::{BatchOp, WriteBatch};
pub use error::{Result, StoreError};
pub use file::{CURRENT_SCHEMA_VERSION, FileStore};
pub use memory::MemoryStore;
pub use store::CaseStore;
pub use types::{CollectionPath, DocumentId, StoredCase};
