//! Integration tests for the case record's persisted shape.

use chrono::{TimeZone, Utc};
use pqr_model::{
    CaseRecord, CaseStatus, Catalog, DependentField, Gate, ObservationEntry, TicketStatus,
};

fn sample_case() -> CaseRecord {
    let mut case = CaseRecord::new("SN-001");
    case.cun = "4500012345".to_string();
    case.customer_name = "JUAN PEREZ".to_string();
    case.status = CaseStatus::Escalado;
    case.adjustment.requested = true;
    case.adjustment.ticket_status = Some(TicketStatus::Pendiente);
    case.work_started_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap());
    case.observation_log.push(ObservationEntry {
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap(),
        text: "Cliente contactado".to_string(),
    });
    case.extra
        .insert("Nivel_2".to_string(), "Cobros".to_string());
    case
}

#[test]
fn test_full_record_round_trip() {
    let case = sample_case();
    let json = serde_json::to_string_pretty(&case).unwrap();
    let back: CaseRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, case);
}

#[test]
fn test_persisted_shape_is_flat() {
    let value = serde_json::to_value(sample_case()).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object["estadoTT"], "Pendiente");
    assert_eq!(object["requiereAjuste"], true);
    assert_eq!(object["Nivel_2"], "Cobros");
    assert_eq!(object["Observaciones_Historial"][0]["texto"], "Cliente contactado");
    assert!(object.contains_key("Fecha_Inicio_Gestion"));
    assert!(!object.contains_key("extra"));
}

#[test]
fn test_missing_fields_take_defaults() {
    let back: CaseRecord = serde_json::from_str(r#"{"SN":"7"}"#).unwrap();
    assert_eq!(back.status, CaseStatus::Pendiente);
    assert_eq!(back.resolution_minutes, None);
    assert!(back.extra.is_empty());
}

#[test]
fn test_every_dependent_field_is_addressable() {
    let mut case = CaseRecord::new("1");
    for field in DependentField::ALL {
        let value = if field == DependentField::TicketStatus {
            "Aplicado"
        } else {
            "x"
        };
        field.set(&mut case, value).unwrap();
        assert_eq!(field.get(&case), value);
        assert_eq!(field.key().parse::<DependentField>().unwrap(), field);
        field.clear(&mut case);
        assert!(field.get(&case).is_empty());
    }
    for gate in Gate::ALL {
        gate.set(&mut case, true);
        assert!(gate.get(&case));
    }
}

#[test]
fn test_default_catalog_covers_every_status() {
    let catalog = Catalog::default();
    for status in CaseStatus::ALL {
        assert!(catalog.has_status(status));
    }
}
