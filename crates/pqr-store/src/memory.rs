//! Process-local store.

use std::sync::RwLock;

use crate::batch::WriteBatch;
use crate::collection::Collection;
use crate::error::{Result, StoreError};
use crate::store::CaseStore;
use crate::types::{DocumentId, StoredCase};

/// In-memory [`CaseStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|c| c.documents().len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CaseStore for MemoryStore {
    fn list(&self) -> Result<Vec<StoredCase>> {
        let guard = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.documents().to_vec())
    }

    fn get(&self, id: &DocumentId) -> Result<Option<StoredCase>> {
        let guard = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn commit(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let ops = batch.len();
        *guard = guard.with_batch(batch)?;
        tracing::debug!(ops, "committed batch to memory store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pqr_model::CaseRecord;

    #[test]
    fn test_insert_get_delete() {
        let store = MemoryStore::new();
        let id = store.insert(CaseRecord::new("77")).unwrap();
        assert_eq!(store.get(&id).unwrap().unwrap().record.sn, "77");
        assert_eq!(store.find_by_sn("77").unwrap().unwrap().id, id);
        store.delete(&id).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_missing_is_rejected() {
        let store = MemoryStore::new();
        let result = store.update(&DocumentId::from("nope"), CaseRecord::new("1"));
        assert!(matches!(result, Err(StoreError::BatchRejected { .. })));
    }
}
