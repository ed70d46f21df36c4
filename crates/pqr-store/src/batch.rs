//! Atomic write batches.

use pqr_model::CaseRecord;

use crate::types::DocumentId;

/// One write inside a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOp {
    /// Create a document under a pre-assigned id.
    Insert { id: DocumentId, record: CaseRecord },
    /// Replace an existing document.
    Update { id: DocumentId, record: CaseRecord },
    /// Remove an existing document.
    Delete { id: DocumentId },
}

impl BatchOp {
    pub fn id(&self) -> &DocumentId {
        match self {
            BatchOp::Insert { id, .. } | BatchOp::Update { id, .. } | BatchOp::Delete { id } => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BatchOp::Insert { .. } => "insert",
            BatchOp::Update { .. } => "update",
            BatchOp::Delete { .. } => "delete",
        }
    }
}

/// Ordered set of writes committed all-or-nothing.
///
/// Ids for inserted documents are assigned when the insert is queued, so
/// later operations in the same batch (and the caller) can refer to them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a new document and returns the id it will have.
    pub fn insert(&mut self, record: CaseRecord) -> DocumentId {
        let id = DocumentId::generate();
        self.ops.push(BatchOp::Insert {
            id: id.clone(),
            record,
        });
        id
    }

    pub fn update(&mut self, id: DocumentId, record: CaseRecord) {
        self.ops.push(BatchOp::Update { id, record });
    }

    pub fn delete(&mut self, id: DocumentId) {
        self.ops.push(BatchOp::Delete { id });
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
