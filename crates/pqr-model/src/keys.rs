//! Persisted field names.
//!
//! These are the keys used by the document store, the ingestion CSV and the
//! export CSV. They are kept verbatim, spaces and casing included.

pub const SN: &str = "SN";
pub const SN_ORIGINAL: &str = "SN_Original";
pub const CUN: &str = "CUN";
pub const STATUS: &str = "Estado_Gestion";
pub const PRIORITY: &str = "Prioridad";
pub const CATEGORY: &str = "Categoria del reclamo";
pub const AI_ANALYSIS: &str = "Analisis de la IA";
pub const AI_SUMMARY: &str = "Resumen_Hechos_IA";
pub const AI_RESPONSE_PROJECTION: &str = "Proyeccion_Respuesta_IA";
pub const ATTACHED_DOCUMENT: &str = "Documento_Adjunto";
pub const FILING_DATE: &str = "Fecha Radicado";
pub const DUE_DATE: &str = "Fecha Vencimiento";
pub const CLOSURE_DATE: &str = "Fecha Cierre";
pub const WORK_STARTED_AT: &str = "Fecha_Inicio_Gestion";
pub const RESOLUTION_MINUTES: &str = "Tiempo_Resolucion_Minutos";
pub const ASSIGNED_DATE: &str = "fecha_asignacion";
pub const ASSIGNED_USER: &str = "user";
pub const DAY_COUNTER: &str = "Dia";
pub const CUSTOMER_NAME: &str = "Nombre_Cliente";
pub const CUSTOMER_ID: &str = "Nro_Nuip_Cliente";
pub const OBSERVATIONS: &str = "obs";
pub const RELATED_COMPLAINT: &str = "Numero_Reclamo_Relacionado";
pub const SIC_FILING: &str = "Radicado_SIC";
pub const DECREE_DUE_DATE: &str = "Fecha_Vencimiento_Decreto";
pub const DISPATCH_CONFIRMED: &str = "Despacho_Respuesta_Confirmado";

pub const ASSURANCE_REQUESTED: &str = "Requiere_Aseguramiento_Facturas";
pub const ASSURANCE_ID: &str = "ID_Aseguramiento";
pub const BILLING_CUT: &str = "Corte_Facturacion";
pub const ACCOUNT: &str = "Cuenta";
pub const OPERATION_TYPE: &str = "Operacion_Aseguramiento";
pub const ASSURANCE_TYPE: &str = "Tipo_Aseguramiento";
pub const ASSURANCE_MONTH: &str = "Mes_Aseguramiento";

pub const CANCELLATION_REQUESTED: &str = "requiereBaja";
pub const ORDER_NUMBER: &str = "numeroOrdenBaja";

pub const ADJUSTMENT_REQUESTED: &str = "requiereAjuste";
pub const TICKET_NUMBER: &str = "numeroTT";
pub const TICKET_STATUS: &str = "estadoTT";
pub const REFUND_REQUESTED: &str = "requiereDevolucionDinero";
pub const REFUND_AMOUNT: &str = "cantidadDevolver";
pub const REFUND_DISPATCH_ID: &str = "idEnvioDevoluciones";
pub const REFUND_EFFECTIVE_DATE: &str = "fechaEfectivaDevolucion";

pub const ESCALATION_AREA: &str = "areaEscalada";
pub const ESCALATION_REASON: &str = "motivoEscalado";
pub const ESCALATION_TICKET_ID: &str = "idEscalado";
pub const ESCALATION_REQUIREMENT: &str = "reqGenerado";
pub const ESCALATION_DESCRIPTION: &str = "descripcionEscalamiento";

pub const OBSERVATION_LOG: &str = "Observaciones_Historial";
pub const ESCALATION_LOG: &str = "Escalamiento_Historial";
pub const ASSURANCE_LOG: &str = "Aseguramiento_Historial";
pub const ACCUMULATED_SN_LOG: &str = "SNAcumulados_Historial";

/// Columns shown in the main case listing.
pub const LISTING_COLUMNS: [&str; 10] = [
    SN,
    CUN,
    FILING_DATE,
    DAY_COUNTER,
    DUE_DATE,
    CUSTOMER_NAME,
    CUSTOMER_ID,
    CATEGORY,
    PRIORITY,
    STATUS,
];
