//! Append-only history log entries.
//!
//! Each case carries four logs. Entries are only ever appended; nothing in
//! the workspace edits or removes an existing entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-text note in `Observaciones_Historial`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationEntry {
    #[serde(rename = "fecha")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "texto")]
    pub text: String,
}

/// Saved escalation in `Escalamiento_Historial`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationEntry {
    #[serde(rename = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "areaEscalada")]
    pub area: String,
    #[serde(rename = "motivoEscalado")]
    pub reason: String,
    #[serde(rename = "idEscalado", default)]
    pub ticket_id: String,
    #[serde(rename = "reqGenerado", default)]
    pub requirement: String,
    #[serde(rename = "descripcionEscalamiento", default)]
    pub description: String,
}

/// Snapshot of the assurance fields in `Aseguramiento_Historial`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssuranceEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "ID_Aseguramiento", default)]
    pub assurance_id: String,
    #[serde(rename = "Corte_Facturacion", default)]
    pub billing_cut: String,
    #[serde(rename = "Cuenta", default)]
    pub account: String,
    #[serde(rename = "Operacion_Aseguramiento", default)]
    pub operation_type: String,
    #[serde(rename = "Tipo_Aseguramiento", default)]
    pub assurance_type: String,
    #[serde(rename = "Mes_Aseguramiento", default)]
    pub month: String,
    #[serde(rename = "observaciones", default)]
    pub note: String,
}

/// Linked complaint in `SNAcumulados_Historial`, resolved with its primary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulatedSnEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "sn")]
    pub sn: String,
    #[serde(rename = "cun", default)]
    pub cun: String,
    #[serde(rename = "obs", default)]
    pub note: String,
}
