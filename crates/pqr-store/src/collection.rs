//! Ordered in-memory collection shared by both backends.

use serde::{Deserialize, Serialize};

use crate::batch::{BatchOp, WriteBatch};
use crate::error::{Result, StoreError};
use crate::types::{DocumentId, StoredCase};

/// Documents in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Collection {
    documents: Vec<StoredCase>,
}

impl Collection {
    pub(crate) fn documents(&self) -> &[StoredCase] {
        &self.documents
    }

    pub(crate) fn get(&self, id: &DocumentId) -> Option<&StoredCase> {
        self.documents.iter().find(|doc| &doc.id == id)
    }

    fn position(&self, id: &DocumentId) -> Option<usize> {
        self.documents.iter().position(|doc| &doc.id == id)
    }

    /// Applies a batch to a copy and returns it. `self` is left untouched
    /// when any operation is rejected.
    pub(crate) fn with_batch(&self, batch: WriteBatch) -> Result<Self> {
        let mut next = self.clone();
        for (index, op) in batch.into_ops().into_iter().enumerate() {
            next.apply(op).map_err(|reason| StoreError::BatchRejected { index, reason })?;
        }
        Ok(next)
    }

    fn apply(&mut self, op: BatchOp) -> std::result::Result<(), String> {
        match op {
            BatchOp::Insert { id, record } => {
                if self.position(&id).is_some() {
                    return Err(format!("document {id} already exists"));
                }
                self.documents.push(StoredCase::new(id, record));
            }
            BatchOp::Update { id, record } => {
                let index = self
                    .position(&id)
                    .ok_or_else(|| format!("document {id} not found"))?;
                self.documents[index].record = record;
            }
            BatchOp::Delete { id } => {
                let index = self
                    .position(&id)
                    .ok_or_else(|| format!("document {id} not found"))?;
                self.documents.remove(index);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pqr_model::CaseRecord;

    #[test]
    fn test_rejected_batch_leaves_collection_untouched() {
        let mut batch = WriteBatch::new();
        batch.insert(CaseRecord::new("1"));
        let base = Collection::default().with_batch(batch).unwrap();

        let mut bad = WriteBatch::new();
        bad.insert(CaseRecord::new("2"));
        bad.delete(DocumentId::from("missing"));
        let result = base.with_batch(bad);

        assert!(matches!(result, Err(StoreError::BatchRejected { index: 1, .. })));
        assert_eq!(base.documents().len(), 1);
    }

    #[test]
    fn test_ops_see_earlier_ops_in_same_batch() {
        let mut batch = WriteBatch::new();
        let id = batch.insert(CaseRecord::new("1"));
        batch.update(id.clone(), CaseRecord::new("1-b"));
        let collection = Collection::default().with_batch(batch).unwrap();
        assert_eq!(collection.get(&id).unwrap().record.sn, "1-b");
    }
}
