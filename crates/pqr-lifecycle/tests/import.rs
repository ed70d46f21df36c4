//! Import pipeline.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use common::{FlakyStore, controller, seeded};
use pqr_assist::{AiBackend, AiRequest, AssistError};
use pqr_ingest::parse_csv;
use pqr_lifecycle::{CancellationToken, ImportOptions, LifecycleError};
use pqr_model::{CaseRecord, CaseStatus, ObservationEntry, Priority};
use pqr_store::{CaseStore, MemoryStore};

struct Offline;

impl AiBackend for Offline {
    fn generate(&self, _request: &AiRequest) -> pqr_assist::Result<String> {
        Err(AssistError::Backend {
            status: 503,
            message: "sin servicio".to_string(),
        })
    }
}

struct Canned;

impl AiBackend for Canned {
    fn generate(&self, request: &AiRequest) -> pqr_assist::Result<String> {
        if request.prompt.contains("prioridad") {
            Ok(r#"{"prioridad": "Alta"}"#.to_string())
        } else {
            Ok(r#"{"analisis_ia": "Cobro no reconocido", "categoria_reclamo": "Error en facturación"}"#.to_string())
        }
    }
}

const FILE: &str = "SN,CUN,Nro_Nuip_Cliente,Nombre_Cliente,obs,Canal\n\
                    12345,C-1,8001234567890,juan perez,ver 1234567890123456,Web\n\
                    ,C-2,123,sin sn,,Web\n\
                    12346,C-3,52123,maria,,Tienda\n";

#[test]
fn test_new_rows_are_created_with_normalized_fields() {
    let store = Arc::new(MemoryStore::new());
    let ctl = controller(store.clone());
    let parsed = parse_csv(FILE);

    let report = ctl
        .import(&parsed, ImportOptions { enrich: false }, &CancellationToken::new(), |_| {})
        .unwrap();
    assert_eq!((report.added, report.updated, report.skipped), (2, 0, 1));
    assert!(!report.cancelled);

    let case = ctl.find_by_sn("12345").unwrap().record;
    assert_eq!(case.customer_id, "800123456");
    assert_eq!(case.customer_name, "JUAN PEREZ");
    assert_eq!(case.status, CaseStatus::Pendiente);
    assert_eq!(case.related_complaint, "1234567890123456");
    assert_eq!(case.extra["Canal"], "Web");
    assert_eq!(case.assigned_date, "2024-05-20");
}

#[test]
fn test_known_sn_is_updated_not_duplicated() {
    let mut existing = CaseRecord::new("12345");
    existing.status = CaseStatus::Escalado;
    existing.observation_log.push(ObservationEntry {
        timestamp: common::now(),
        text: "primera llamada".to_string(),
    });
    let (store, ids) = seeded(vec![existing]);
    let ctl = controller(store.clone());

    let report = ctl
        .import(&parse_csv(FILE), ImportOptions { enrich: false }, &CancellationToken::new(), |_| {})
        .unwrap();
    assert_eq!((report.added, report.updated), (1, 1));
    assert_eq!(store.len(), 2);

    let case = ctl.get(&ids[0]).unwrap().record;
    assert_eq!(case.cun, "C-1");
    assert_eq!(case.status, CaseStatus::Escalado);
    assert_eq!(case.observation_log.len(), 1);
}

#[test]
fn test_enrichment_failure_degrades_to_placeholders() {
    let store = Arc::new(MemoryStore::new());
    let ctl = controller(store).with_assistant(Arc::new(Offline));
    let report = ctl
        .import(&parse_csv(FILE), ImportOptions::default(), &CancellationToken::new(), |_| {})
        .unwrap();
    assert_eq!(report.added, 2);
    assert_eq!(report.enrichment_failures, 2);

    let case = ctl.find_by_sn("12346").unwrap().record;
    assert_eq!(case.priority, Priority::Media);
    assert_eq!(case.ai_analysis, "N/A");
}

#[test]
fn test_enrichment_fills_analysis_and_priority() {
    let store = Arc::new(MemoryStore::new());
    let ctl = controller(store).with_assistant(Arc::new(Canned));
    ctl.import(&parse_csv(FILE), ImportOptions::default(), &CancellationToken::new(), |_| {})
        .unwrap();
    let case = ctl.find_by_sn("12345").unwrap().record;
    assert_eq!(case.category, "Error en facturación");
    assert_eq!(case.priority, Priority::Alta);
}

#[test]
fn test_cancellation_keeps_processed_rows() {
    let store = Arc::new(MemoryStore::new());
    let ctl = controller(store.clone());
    let token = CancellationToken::new();
    let handle = token.clone();

    let report = ctl
        .import(&parse_csv(FILE), ImportOptions { enrich: false }, &token, |done| {
            if done == 1 {
                handle.cancel();
            }
        })
        .unwrap();
    assert!(report.cancelled);
    assert_eq!(report.processed(), 1);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_row_failure_does_not_stop_import() {
    let store = Arc::new(FlakyStore {
        reject_sn: Some("12345".to_string()),
        ..Default::default()
    });
    let ctl = controller(store.clone());
    let report = ctl
        .import(&parse_csv(FILE), ImportOptions { enrich: false }, &CancellationToken::new(), |_| {})
        .unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].sn, "12345");
    assert_eq!(report.failures[0].row, 1);
    assert_eq!(report.added, 1);
    assert_eq!(store.inner.list().unwrap().len(), 1);
}

#[test]
fn test_collection_failure_aborts() {
    let store = Arc::new(FlakyStore::default());
    store.fail_list.store(true, Ordering::SeqCst);
    let ctl = controller(store);
    let result = ctl.import(&parse_csv(FILE), ImportOptions { enrich: false }, &CancellationToken::new(), |_| {});
    assert!(matches!(result, Err(LifecycleError::Store(_))));
}
