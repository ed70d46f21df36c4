//! Immutable catalogue of allowed values.
//!
//! The catalogue is loaded once at start-up (built-in defaults or a TOML
//! file) and shared by reference; nothing mutates it afterwards.

use serde::{Deserialize, Serialize};

use crate::enums::{CaseStatus, Priority, TicketStatus};
use crate::error::{ModelError, Result};

/// An internal area cases can be escalated to, with its accepted reasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationArea {
    pub name: String,
    pub reasons: Vec<String>,
}

impl EscalationArea {
    fn new(name: &str, reasons: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            reasons: reasons.iter().map(|r| (*r).to_string()).collect(),
        }
    }
}

/// Enumerations and lookup tables used by the lifecycle rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub statuses: Vec<CaseStatus>,
    pub priorities: Vec<Priority>,
    pub ticket_states: Vec<TicketStatus>,
    pub assurance_operation_types: Vec<String>,
    pub assurance_types: Vec<String>,
    pub assurance_months: Vec<String>,
    pub escalation_areas: Vec<EscalationArea>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            statuses: CaseStatus::ALL.to_vec(),
            priorities: Priority::ALL.to_vec(),
            ticket_states: vec![TicketStatus::Pendiente, TicketStatus::Aplicado],
            assurance_operation_types: to_strings(&[
                "Aseguramiento FS",
                "Aseguramiento TELCO",
                "Aseguramiento SINTEL",
                "Aseguramiento D@VOX",
            ]),
            assurance_types: to_strings(&[
                "Eliminar cobros facturados (paz y salvo)",
                "Ajustes to invoice de cartera",
                "Aprobación envío SMS",
                "Aseguramiento clientes reconectados",
                "Aseguramiento FS - No cobro RX - RXM",
                "Calidad de impresión",
                "Cambio de localidad FS",
                "Carga a tablas FS",
                "NO Cobros gastos de cobranza",
                "Generar reconexión FS",
                "Solicitud ajustes cartera",
                "Validacion inconsistencias / Aplicar DTO",
                "Validación cambio de suscriptor",
                "Ajustar cobros por aceleración Baseport",
                "Confirmar BAJA del servicio",
                "Recepción factura electronica",
                "Recepción factura fisica",
                "No cobros plataforma Streaming",
            ]),
            assurance_months: to_strings(&[
                "enero",
                "febrero",
                "marzo",
                "abril",
                "mayo",
                "junio",
                "julio",
                "agosto",
                "septiembre",
                "octubre",
                "noviembre",
                "diciembre",
            ]),
            escalation_areas: vec![
                EscalationArea::new(
                    "Facturación",
                    &[
                        "Ajuste de cobro",
                        "Error en cargos",
                        "Solicitud detalle factura",
                        "Pago no aplicado",
                        "Otro",
                    ],
                ),
                EscalationArea::new(
                    "Soporte Técnico",
                    &[
                        "Falla masiva",
                        "Problema configuración equipo",
                        "Sin servicio",
                        "Intermitencia",
                        "Otro",
                    ],
                ),
                EscalationArea::new(
                    "Redes",
                    &[
                        "Investigación de cobertura",
                        "Falla en infraestructura",
                        "Optimización de señal",
                        "Otro",
                    ],
                ),
                EscalationArea::new(
                    "Ventas",
                    &[
                        "Incumplimiento oferta",
                        "Error en activación",
                        "Solicitud nuevo servicio",
                        "Otro",
                    ],
                ),
                EscalationArea::new(
                    "Retención",
                    &[
                        "Cancelación de servicio",
                        "Mejora de plan",
                        "Inconformidad con servicio",
                        "Otro",
                    ],
                ),
                EscalationArea::new(
                    "Legal",
                    &[
                        "Requerimiento judicial",
                        "Disputa contractual",
                        "Derecho de petición",
                        "Otro",
                    ],
                ),
                EscalationArea::new(
                    "Cartera/Recaudo",
                    &[
                        "Acuerdo de pago",
                        "Pago no aplicado",
                        "Verificación estado de cuenta",
                        "Cobro prejurídico",
                        "Otro",
                    ],
                ),
                EscalationArea::new(
                    "Calidad",
                    &[
                        "Auditoría de proceso",
                        "Incumplimiento SLA",
                        "Mejora de atención",
                        "Otro",
                    ],
                ),
                EscalationArea::new(
                    "Desarrollo/Plataformas",
                    &[
                        "Error en aplicación",
                        "Falla en portal web",
                        "Incidente de seguridad",
                        "Otro",
                    ],
                ),
                EscalationArea::new(
                    "Otro",
                    &[
                        "Motivo general no especificado",
                        "Escalamiento interno general",
                    ],
                ),
            ],
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

impl Catalog {
    /// Parses a catalogue from TOML. Sections left out keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.check()?;
        Ok(catalog)
    }

    /// Rejects catalogues that would make the lifecycle rules unusable.
    fn check(&self) -> Result<()> {
        if !self.statuses.contains(&CaseStatus::Pendiente) {
            return Err(ModelError::CatalogConsistency(
                "the initial status 'Pendiente' must be listed".to_string(),
            ));
        }
        if let Some(area) = self.escalation_areas.iter().find(|a| a.reasons.is_empty()) {
            return Err(ModelError::CatalogConsistency(format!(
                "escalation area '{}' has no reasons",
                area.name
            )));
        }
        Ok(())
    }

    /// Reasons accepted for an escalation area.
    pub fn reasons_for(&self, area: &str) -> Option<&[String]> {
        self.escalation_areas
            .iter()
            .find(|a| a.name == area)
            .map(|a| a.reasons.as_slice())
    }

    pub fn is_valid_escalation(&self, area: &str, reason: &str) -> bool {
        self.reasons_for(area)
            .is_some_and(|reasons| reasons.iter().any(|r| r == reason))
    }

    pub fn is_operation_type(&self, value: &str) -> bool {
        self.assurance_operation_types.iter().any(|v| v == value)
    }

    pub fn is_assurance_type(&self, value: &str) -> bool {
        self.assurance_types.iter().any(|v| v == value)
    }

    /// Months are matched case-insensitively (`Enero` and `enero` are equal).
    pub fn is_assurance_month(&self, value: &str) -> bool {
        let lowered = value.trim().to_lowercase();
        self.assurance_months.iter().any(|m| m.to_lowercase() == lowered)
    }

    pub fn has_status(&self, status: CaseStatus) -> bool {
        self.statuses.contains(&status)
    }

    pub fn has_priority(&self, priority: Priority) -> bool {
        self.priorities.contains(&priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_lookups() {
        let catalog = Catalog::default();
        assert!(catalog.is_valid_escalation("Legal", "Derecho de petición"));
        assert!(!catalog.is_valid_escalation("Legal", "Falla masiva"));
        assert!(catalog.reasons_for("Inexistente").is_none());
        assert!(catalog.is_assurance_month("Marzo"));
        assert_eq!(catalog.statuses.len(), 9);
    }

    #[test]
    fn test_toml_overrides_section() {
        let catalog = Catalog::from_toml_str(
            r#"
            assurance_months = ["enero"]

            [[escalation_areas]]
            name = "Redes"
            reasons = ["Otro"]
            "#,
        )
        .unwrap();
        assert_eq!(catalog.assurance_months, vec!["enero"]);
        assert_eq!(catalog.escalation_areas.len(), 1);
        assert_eq!(catalog.priorities.len(), 3);
    }

    #[test]
    fn test_toml_rejects_area_without_reasons() {
        let result = Catalog::from_toml_str(
            r#"
            [[escalation_areas]]
            name = "Redes"
            reasons = []
            "#,
        );
        assert!(matches!(result, Err(ModelError::CatalogConsistency(_))));
    }
}
