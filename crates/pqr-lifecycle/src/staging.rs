//! Working copy of the collection used to plan one atomic batch.

use std::collections::BTreeSet;

use pqr_model::CaseRecord;
use pqr_store::{DocumentId, StoredCase, WriteBatch};

use crate::error::{LifecycleError, Result};

/// Snapshot plus pending changes. Several plans can touch the same case;
/// each case still produces a single update.
#[derive(Debug)]
pub(crate) struct Staging {
    cases: Vec<StoredCase>,
    touched: BTreeSet<usize>,
    removed: BTreeSet<usize>,
    inserts: Vec<CaseRecord>,
}

impl Staging {
    pub(crate) fn new(cases: Vec<StoredCase>) -> Self {
        Self {
            cases,
            touched: BTreeSet::new(),
            removed: BTreeSet::new(),
            inserts: Vec::new(),
        }
    }

    fn index(&self, id: &DocumentId) -> Result<usize> {
        self.cases
            .iter()
            .position(|c| &c.id == id)
            .filter(|i| !self.removed.contains(i))
            .ok_or_else(|| LifecycleError::NotFound(id.clone()))
    }

    pub(crate) fn get(&self, id: &DocumentId) -> Result<&CaseRecord> {
        Ok(&self.cases[self.index(id)?].record)
    }

    pub(crate) fn get_mut(&mut self, id: &DocumentId) -> Result<&mut CaseRecord> {
        let index = self.index(id)?;
        self.touched.insert(index);
        Ok(&mut self.cases[index].record)
    }

    /// Ids of live cases with the given SN, in collection order.
    pub(crate) fn ids_with_sn(&self, sn: &str) -> Vec<DocumentId> {
        self.cases
            .iter()
            .enumerate()
            .filter(|(i, c)| !self.removed.contains(i) && c.record.sn == sn)
            .map(|(_, c)| c.id.clone())
            .collect()
    }

    pub(crate) fn sn_exists(&self, sn: &str) -> bool {
        !self.ids_with_sn(sn).is_empty() || self.inserts.iter().any(|r| r.sn == sn)
    }

    pub(crate) fn live(&self) -> impl Iterator<Item = &StoredCase> {
        self.cases
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.removed.contains(i))
            .map(|(_, c)| c)
    }

    pub(crate) fn remove(&mut self, id: &DocumentId) -> Result<()> {
        let index = self.index(id)?;
        self.removed.insert(index);
        self.touched.remove(&index);
        Ok(())
    }

    pub(crate) fn insert(&mut self, record: CaseRecord) {
        self.inserts.push(record);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.touched.is_empty() && self.removed.is_empty() && self.inserts.is_empty()
    }

    /// Builds the batch. Returns it with the ids assigned to the inserts.
    pub(crate) fn into_batch(self) -> (WriteBatch, Vec<DocumentId>) {
        let mut batch = WriteBatch::new();
        for index in &self.touched {
            let case = &self.cases[*index];
            batch.update(case.id.clone(), case.record.clone());
        }
        for index in &self.removed {
            batch.delete(self.cases[*index].id.clone());
        }
        let inserted = self.inserts.into_iter().map(|r| batch.insert(r)).collect();
        (batch, inserted)
    }
}
