//! The store interface used by the lifecycle layer.

use pqr_model::CaseRecord;

use crate::batch::WriteBatch;
use crate::error::{Result, StoreError};
use crate::types::{DocumentId, StoredCase};

/// A collection of case documents for one user.
///
/// Implementations must apply a [`WriteBatch`] atomically.
pub trait CaseStore: Send + Sync {
    /// All cases in insertion order.
    fn list(&self) -> Result<Vec<StoredCase>>;

    fn get(&self, id: &DocumentId) -> Result<Option<StoredCase>>;

    /// Applies every operation of the batch, or none of them.
    fn commit(&self, batch: WriteBatch) -> Result<()>;

    /// First case whose `SN` equals `sn`.
    fn find_by_sn(&self, sn: &str) -> Result<Option<StoredCase>> {
        Ok(self.list()?.into_iter().find(|case| case.record.sn == sn))
    }

    fn require(&self, id: &DocumentId) -> Result<StoredCase> {
        self.get(id)?
            .ok_or_else(|| StoreError::DocumentNotFound { id: id.clone() })
    }

    fn insert(&self, record: CaseRecord) -> Result<DocumentId> {
        let mut batch = WriteBatch::new();
        let id = batch.insert(record);
        self.commit(batch)?;
        Ok(id)
    }

    fn update(&self, id: &DocumentId, record: CaseRecord) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.update(id.clone(), record);
        self.commit(batch)
    }

    fn delete(&self, id: &DocumentId) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.delete(id.clone());
        self.commit(batch)
    }
}
