//! Type-safe enumerations for case classification.
//!
//! Statuses and priorities are stored as their Spanish labels
//! (`"Pendiente Ajustes"`, `"Alta"`, ...); these enums give them
//! compile-time safety while keeping the persisted text unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Management status of a case (`Estado_Gestion`).
///
/// The enumeration is flat, but the lifecycle implies an ordering:
/// `Pendiente` is the initial state and `Finalizado` is terminal and only
/// reached by the automatic sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CaseStatus {
    /// Initial state for every new case.
    #[default]
    Pendiente,
    /// An operator started working the case; the stuck-case watch runs.
    Iniciado,
    /// The case is being read.
    Lectura,
    /// Escalated to an internal area.
    Escalado,
    /// Waiting on an adjustment ticket. Entered automatically only.
    #[serde(rename = "Pendiente Ajustes")]
    PendienteAjustes,
    /// Successor case created by a decree.
    Decretado,
    /// Transferred to the regulator.
    #[serde(rename = "Traslado SIC")]
    TrasladoSic,
    /// Resolved; closure date and resolution time are stamped.
    Resuelto,
    /// Terminal state reached by the auto-finalize sweep.
    Finalizado,
}

impl CaseStatus {
    /// All statuses in display order.
    pub const ALL: [CaseStatus; 9] = [
        CaseStatus::Pendiente,
        CaseStatus::Iniciado,
        CaseStatus::Lectura,
        CaseStatus::Resuelto,
        CaseStatus::Finalizado,
        CaseStatus::Escalado,
        CaseStatus::Decretado,
        CaseStatus::TrasladoSic,
        CaseStatus::PendienteAjustes,
    ];

    /// Returns the persisted label.
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Pendiente => "Pendiente",
            CaseStatus::Iniciado => "Iniciado",
            CaseStatus::Lectura => "Lectura",
            CaseStatus::Escalado => "Escalado",
            CaseStatus::PendienteAjustes => "Pendiente Ajustes",
            CaseStatus::Decretado => "Decretado",
            CaseStatus::TrasladoSic => "Traslado SIC",
            CaseStatus::Resuelto => "Resuelto",
            CaseStatus::Finalizado => "Finalizado",
        }
    }

    /// Returns true for the states that carry a closure date.
    pub fn is_closed(&self) -> bool {
        matches!(self, CaseStatus::Resuelto | CaseStatus::Finalizado)
    }

    /// Returns true if an operator may request this status directly.
    ///
    /// `Pendiente Ajustes` and `Finalizado` are only ever derived.
    pub fn is_user_selectable(&self) -> bool {
        !matches!(self, CaseStatus::PendienteAjustes | CaseStatus::Finalizado)
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = ModelError;

    /// Parses a status label. Matching ignores case and surrounding
    /// whitespace, and accepts underscores in place of spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('_', " ");
        match normalized.as_str() {
            "PENDIENTE" => Ok(CaseStatus::Pendiente),
            "INICIADO" => Ok(CaseStatus::Iniciado),
            "LECTURA" => Ok(CaseStatus::Lectura),
            "ESCALADO" => Ok(CaseStatus::Escalado),
            "PENDIENTE AJUSTES" => Ok(CaseStatus::PendienteAjustes),
            "DECRETADO" => Ok(CaseStatus::Decretado),
            "TRASLADO SIC" => Ok(CaseStatus::TrasladoSic),
            "RESUELTO" => Ok(CaseStatus::Resuelto),
            "FINALIZADO" => Ok(CaseStatus::Finalizado),
            _ => Err(ModelError::UnknownStatus(s.to_string())),
        }
    }
}

/// Case priority (`Prioridad`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Alta,
    /// Default when no priority could be derived.
    #[default]
    Media,
    Baja,
}

impl Priority {
    /// All priorities, highest first.
    pub const ALL: [Priority; 3] = [Priority::Alta, Priority::Media, Priority::Baja];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Alta => "Alta",
            Priority::Media => "Media",
            Priority::Baja => "Baja",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALTA" => Ok(Priority::Alta),
            "MEDIA" => Ok(Priority::Media),
            "BAJA" => Ok(Priority::Baja),
            _ => Err(ModelError::UnknownPriority(s.to_string())),
        }
    }
}

/// State of an adjustment ticket (`estadoTT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    Pendiente,
    Aplicado,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Pendiente => "Pendiente",
            TicketStatus::Aplicado => "Aplicado",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDIENTE" => Ok(TicketStatus::Pendiente),
            "APLICADO" => Ok(TicketStatus::Aplicado),
            _ => Err(ModelError::UnknownTicketStatus(s.to_string())),
        }
    }
}
