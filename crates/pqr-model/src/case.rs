//! The case record and its conditional sub-state groups.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{CaseStatus, Priority, TicketStatus};
use crate::history::{AccumulatedSnEntry, AssuranceEntry, EscalationEntry, ObservationEntry};
use crate::keys;

/// Placeholder for values that are not applicable or not yet known.
pub const NOT_AVAILABLE: &str = "N/A";

/// Request to apply special handling to a customer's upcoming bills.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssuranceRequest {
    #[serde(rename = "Requiere_Aseguramiento_Facturas")]
    pub requested: bool,
    #[serde(rename = "ID_Aseguramiento")]
    pub assurance_id: String,
    #[serde(rename = "Corte_Facturacion")]
    pub billing_cut: String,
    #[serde(rename = "Cuenta")]
    pub account: String,
    #[serde(rename = "Operacion_Aseguramiento")]
    pub operation_type: String,
    #[serde(rename = "Tipo_Aseguramiento")]
    pub assurance_type: String,
    #[serde(rename = "Mes_Aseguramiento")]
    pub month: String,
}

/// Request to cancel the customer's service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CancellationRequest {
    #[serde(rename = "requiereBaja")]
    pub requested: bool,
    #[serde(rename = "numeroOrdenBaja")]
    pub order_number: String,
}

/// Request to adjust the customer's balance, optionally with a refund.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentRequest {
    #[serde(rename = "requiereAjuste")]
    pub requested: bool,
    #[serde(rename = "numeroTT")]
    pub ticket_number: String,
    #[serde(rename = "estadoTT", skip_serializing_if = "Option::is_none")]
    pub ticket_status: Option<TicketStatus>,
    #[serde(rename = "requiereDevolucionDinero")]
    pub refund_requested: bool,
    #[serde(rename = "cantidadDevolver")]
    pub refund_amount: String,
    #[serde(rename = "idEnvioDevoluciones")]
    pub refund_dispatch_id: String,
    #[serde(rename = "fechaEfectivaDevolucion")]
    pub refund_effective_date: String,
}

/// Current escalation of a case. Empty unless the case is `Escalado`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationFields {
    #[serde(rename = "areaEscalada")]
    pub area: String,
    #[serde(rename = "motivoEscalado")]
    pub reason: String,
    #[serde(rename = "idEscalado")]
    pub ticket_id: String,
    #[serde(rename = "reqGenerado")]
    pub requirement: String,
    #[serde(rename = "descripcionEscalamiento")]
    pub description: String,
}

impl EscalationFields {
    pub fn is_empty(&self) -> bool {
        self.area.is_empty()
            && self.reason.is_empty()
            && self.ticket_id.is_empty()
            && self.requirement.is_empty()
            && self.description.is_empty()
    }
}

/// A customer complaint case.
///
/// Identity is the business key `SN`; the store keys documents by its own
/// opaque id. Columns ingested from CSV that have no typed field are kept in
/// [`CaseRecord::extra`] and survive storage and export unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    #[serde(rename = "SN", default)]
    pub sn: String,
    /// Business key of the case this one was decreed from.
    #[serde(rename = "SN_Original", default, skip_serializing_if = "Option::is_none")]
    pub sn_original: Option<String>,
    #[serde(rename = "CUN", default)]
    pub cun: String,
    #[serde(rename = "Estado_Gestion", default)]
    pub status: CaseStatus,
    #[serde(rename = "Prioridad", default)]
    pub priority: Priority,
    #[serde(rename = "Categoria del reclamo", default)]
    pub category: String,
    #[serde(rename = "Analisis de la IA", default)]
    pub ai_analysis: String,
    #[serde(rename = "Resumen_Hechos_IA", default)]
    pub ai_summary: String,
    #[serde(rename = "Proyeccion_Respuesta_IA", default)]
    pub ai_response_projection: String,
    #[serde(rename = "Documento_Adjunto", default)]
    pub attached_document: String,

    #[serde(rename = "Fecha Radicado", default)]
    pub filing_date: String,
    #[serde(rename = "Fecha Vencimiento", default)]
    pub due_date: String,
    #[serde(rename = "Fecha Cierre", default)]
    pub closure_date: String,
    #[serde(
        rename = "Fecha_Inicio_Gestion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub work_started_at: Option<DateTime<Utc>>,
    /// Whole minutes between work start and closure; `None` is stored as `N/A`.
    #[serde(
        rename = "Tiempo_Resolucion_Minutos",
        default,
        with = "resolution_minutes"
    )]
    pub resolution_minutes: Option<i64>,
    #[serde(rename = "fecha_asignacion", default)]
    pub assigned_date: String,
    #[serde(rename = "user", default)]
    pub assigned_user: String,
    /// Externally supplied age counter in days, kept as ingested.
    #[serde(rename = "Dia", default)]
    pub day_counter: String,

    #[serde(rename = "Nombre_Cliente", default)]
    pub customer_name: String,
    #[serde(rename = "Nro_Nuip_Cliente", default)]
    pub customer_id: String,
    #[serde(rename = "obs", default)]
    pub observations: String,
    #[serde(rename = "Numero_Reclamo_Relacionado", default)]
    pub related_complaint: String,

    #[serde(rename = "Radicado_SIC", default)]
    pub sic_filing: String,
    #[serde(rename = "Fecha_Vencimiento_Decreto", default)]
    pub decree_due_date: String,

    #[serde(rename = "Despacho_Respuesta_Confirmado", default)]
    pub dispatch_confirmed: bool,
    #[serde(flatten)]
    pub assurance: AssuranceRequest,
    #[serde(flatten)]
    pub cancellation: CancellationRequest,
    #[serde(flatten)]
    pub adjustment: AdjustmentRequest,
    #[serde(flatten)]
    pub escalation: EscalationFields,

    #[serde(rename = "Observaciones_Historial", default)]
    pub observation_log: Vec<ObservationEntry>,
    #[serde(rename = "Escalamiento_Historial", default)]
    pub escalation_log: Vec<EscalationEntry>,
    #[serde(rename = "Aseguramiento_Historial", default)]
    pub assurance_log: Vec<AssuranceEntry>,
    #[serde(rename = "SNAcumulados_Historial", default)]
    pub accumulated_sn_log: Vec<AccumulatedSnEntry>,

    /// Ingested columns without a typed field. Must stay the last field:
    /// flattened maps take whatever the fields above did not claim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl CaseRecord {
    /// Creates a `Pendiente` case with empty logs and no requests.
    pub fn new(sn: impl Into<String>) -> Self {
        Self {
            sn: sn.into(),
            ..Default::default()
        }
    }

    /// Returns true if any of assurance, cancellation or adjustment is requested.
    pub fn has_ancillary_request(&self) -> bool {
        self.assurance.requested || self.cancellation.requested || self.adjustment.requested
    }

    /// Returns true if this case was spawned by a decree.
    pub fn is_decree_successor(&self) -> bool {
        self.sn_original.as_deref().is_some_and(|sn| !sn.is_empty())
    }

    /// Clears every escalation sub-field.
    pub fn clear_escalation(&mut self) {
        self.escalation = EscalationFields::default();
    }

    /// Returns true if `key` names a field owned by the lifecycle rules.
    ///
    /// Ingestion never writes these: status, derived dates, gates, dependent
    /// fields and logs only change through lifecycle operations.
    pub fn is_managed_key(key: &str) -> bool {
        matches!(
            key,
            keys::STATUS
                | keys::SN_ORIGINAL
                | keys::CLOSURE_DATE
                | keys::WORK_STARTED_AT
                | keys::RESOLUTION_MINUTES
                | keys::DISPATCH_CONFIRMED
                | keys::ASSURANCE_REQUESTED
                | keys::ASSURANCE_ID
                | keys::BILLING_CUT
                | keys::ACCOUNT
                | keys::OPERATION_TYPE
                | keys::ASSURANCE_TYPE
                | keys::ASSURANCE_MONTH
                | keys::CANCELLATION_REQUESTED
                | keys::ORDER_NUMBER
                | keys::ADJUSTMENT_REQUESTED
                | keys::TICKET_NUMBER
                | keys::TICKET_STATUS
                | keys::REFUND_REQUESTED
                | keys::REFUND_AMOUNT
                | keys::REFUND_DISPATCH_ID
                | keys::REFUND_EFFECTIVE_DATE
                | keys::ESCALATION_AREA
                | keys::ESCALATION_REASON
                | keys::ESCALATION_TICKET_ID
                | keys::ESCALATION_REQUIREMENT
                | keys::ESCALATION_DESCRIPTION
                | keys::OBSERVATION_LOG
                | keys::ESCALATION_LOG
                | keys::ASSURANCE_LOG
                | keys::ACCUMULATED_SN_LOG
        )
    }

    /// Writes an ingested column into the record.
    ///
    /// Typed text fields are set directly, a parseable `Prioridad` replaces
    /// the priority, and anything unknown lands in [`CaseRecord::extra`].
    /// Returns false (and writes nothing) for lifecycle-managed keys.
    pub fn set_ingested(&mut self, key: &str, value: String) -> bool {
        if Self::is_managed_key(key) {
            return false;
        }
        match key {
            keys::SN => self.sn = value,
            keys::CUN => self.cun = value,
            keys::PRIORITY => {
                if let Ok(priority) = value.parse() {
                    self.priority = priority;
                }
            }
            keys::CATEGORY => self.category = value,
            keys::AI_ANALYSIS => self.ai_analysis = value,
            keys::AI_SUMMARY => self.ai_summary = value,
            keys::AI_RESPONSE_PROJECTION => self.ai_response_projection = value,
            keys::ATTACHED_DOCUMENT => self.attached_document = value,
            keys::FILING_DATE => self.filing_date = value,
            keys::DUE_DATE => self.due_date = value,
            keys::ASSIGNED_DATE => self.assigned_date = value,
            keys::ASSIGNED_USER => self.assigned_user = value,
            keys::DAY_COUNTER => self.day_counter = value,
            keys::CUSTOMER_NAME => self.customer_name = value,
            keys::CUSTOMER_ID => self.customer_id = value,
            keys::OBSERVATIONS => self.observations = value,
            keys::RELATED_COMPLAINT => self.related_complaint = value,
            keys::SIC_FILING => self.sic_filing = value,
            keys::DECREE_DUE_DATE => self.decree_due_date = value,
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
        true
    }
}

/// Serde adapter storing `Option<i64>` minutes as a number or `"N/A"`.
mod resolution_minutes {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    use super::NOT_AVAILABLE;

    pub fn serialize<S: Serializer>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(minutes) => serializer.serialize_i64(*minutes),
            None => serializer.serialize_str(NOT_AVAILABLE),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        deserializer.deserialize_any(MinutesVisitor)
    }

    struct MinutesVisitor;

    impl Visitor<'_> for MinutesVisitor {
        type Value = Option<i64>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a whole number of minutes or \"N/A\"")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v).map(Some).map_err(E::custom)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.round() as i64))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.trim().parse::<i64>().ok())
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }
}
