//! Shared fixtures for lifecycle integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use pqr_lifecycle::{CaseContext, Controller};
use pqr_model::{CaseRecord, Catalog, FixedClock};
use pqr_store::{CaseStore, DocumentId, MemoryStore, StoreError, StoredCase, WriteBatch};

/// 2024-05-20 10:00 in Bogotá.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 20, 15, 0, 0).unwrap()
}

pub fn controller_at(store: Arc<dyn CaseStore>, at: DateTime<Utc>) -> Controller {
    let ctx = CaseContext::new(store, Arc::new(FixedClock(at)), "operador-1");
    Controller::new(Arc::new(Catalog::default()), ctx)
}

pub fn controller(store: Arc<dyn CaseStore>) -> Controller {
    controller_at(store, now())
}

pub fn seeded(records: Vec<CaseRecord>) -> (Arc<MemoryStore>, Vec<DocumentId>) {
    let store = Arc::new(MemoryStore::new());
    let ids = records
        .into_iter()
        .map(|r| store.insert(r).unwrap())
        .collect();
    (store, ids)
}

/// Memory store with switchable failures.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_list: AtomicBool,
    /// Inserts of cases with this SN fail.
    pub reject_sn: Option<String>,
}

impl CaseStore for FlakyStore {
    fn list(&self) -> pqr_store::Result<Vec<StoredCase>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("collection offline".to_string()));
        }
        self.inner.list()
    }

    fn get(&self, id: &DocumentId) -> pqr_store::Result<Option<StoredCase>> {
        self.inner.get(id)
    }

    fn commit(&self, batch: WriteBatch) -> pqr_store::Result<()> {
        if let Some(sn) = &self.reject_sn {
            let hit = batch.ops().iter().any(|op| match op {
                pqr_store::BatchOp::Insert { record, .. } => &record.sn == sn,
                _ => false,
            });
            if hit {
                return Err(StoreError::Unavailable(format!("write of {sn} refused")));
            }
        }
        self.inner.commit(batch)
    }
}
