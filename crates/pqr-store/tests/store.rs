//! Backend behaviour shared by the memory and file stores.

use pqr_model::{CaseRecord, CaseStatus, ObservationEntry};
use pqr_store::{CaseStore, CollectionPath, DocumentId, FileStore, MemoryStore, StoreError, WriteBatch};
use tempfile::tempdir;

fn sample(sn: &str) -> CaseRecord {
    let mut record = CaseRecord::new(sn);
    record.cun = format!("CUN-{sn}");
    record.extra.insert("Canal".to_string(), "Web".to_string());
    record
}

fn exercise_atomic_batch(store: &dyn CaseStore) {
    let keep = store.insert(sample("100")).unwrap();

    let mut batch = WriteBatch::new();
    let mut updated = sample("100");
    updated.status = CaseStatus::Decretado;
    batch.update(keep.clone(), updated);
    batch.insert(sample("100-D1"));
    batch.delete(DocumentId::from("missing"));

    let result = store.commit(batch);
    assert!(matches!(result, Err(StoreError::BatchRejected { index: 2, .. })));

    let cases = store.list().unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].record.status, CaseStatus::Pendiente);
}

fn exercise_insertion_order(store: &dyn CaseStore) {
    for sn in ["3", "1", "2"] {
        store.insert(sample(sn)).unwrap();
    }
    let sns: Vec<_> = store.list().unwrap().into_iter().map(|c| c.record.sn).collect();
    assert_eq!(sns, vec!["3", "1", "2"]);
}

#[test]
fn test_memory_store_batch_is_atomic() {
    exercise_atomic_batch(&MemoryStore::new());
}

#[test]
fn test_file_store_batch_is_atomic() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path(), &CollectionPath::new("pqr", "ana")).unwrap();
    exercise_atomic_batch(&store);
}

#[test]
fn test_both_backends_keep_insertion_order() {
    exercise_insertion_order(&MemoryStore::new());
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path(), &CollectionPath::new("pqr", "ana")).unwrap();
    exercise_insertion_order(&store);
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = CollectionPath::new("pqr", "ana");

    let id = {
        let store = FileStore::open(dir.path(), &path).unwrap();
        let mut record = sample("555");
        record.observation_log.push(ObservationEntry {
            timestamp: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            text: "Llamada al cliente".to_string(),
        });
        store.insert(record).unwrap()
    };

    let reopened = FileStore::open(dir.path(), &path).unwrap();
    let case = reopened.require(&id).unwrap();
    assert_eq!(case.record.cun, "CUN-555");
    assert_eq!(case.record.extra["Canal"], "Web");
    assert_eq!(case.record.observation_log.len(), 1);
}

#[test]
fn test_users_are_isolated() {
    let dir = tempdir().unwrap();
    let ana = FileStore::open(dir.path(), &CollectionPath::new("pqr", "ana")).unwrap();
    let luis = FileStore::open(dir.path(), &CollectionPath::new("pqr", "luis")).unwrap();
    ana.insert(sample("1")).unwrap();
    assert!(luis.list().unwrap().is_empty());
    assert!(luis.find_by_sn("1").unwrap().is_none());
}
