//! Addressable checkbox gates and their dependent fields.
//!
//! The lifecycle rule table refers to fields through these enums rather than
//! through bespoke code per checkbox, so one generic applier can force gates
//! and clear fields.

use std::fmt;
use std::str::FromStr;

use crate::case::CaseRecord;
use crate::error::ModelError;
use crate::keys;

/// A boolean gate on a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Response dispatched (`Despacho_Respuesta_Confirmado`).
    DispatchConfirmed,
    /// Assurance requested (`Requiere_Aseguramiento_Facturas`).
    Assurance,
    /// Cancellation requested (`requiereBaja`).
    Cancellation,
    /// Adjustment requested (`requiereAjuste`).
    Adjustment,
    /// Refund requested (`requiereDevolucionDinero`), nested under adjustment.
    Refund,
}

impl Gate {
    pub const ALL: [Gate; 5] = [
        Gate::DispatchConfirmed,
        Gate::Assurance,
        Gate::Cancellation,
        Gate::Adjustment,
        Gate::Refund,
    ];

    /// Persisted key of the gate.
    pub fn key(&self) -> &'static str {
        match self {
            Gate::DispatchConfirmed => keys::DISPATCH_CONFIRMED,
            Gate::Assurance => keys::ASSURANCE_REQUESTED,
            Gate::Cancellation => keys::CANCELLATION_REQUESTED,
            Gate::Adjustment => keys::ADJUSTMENT_REQUESTED,
            Gate::Refund => keys::REFUND_REQUESTED,
        }
    }

    /// Returns the gate's current value on `case`.
    pub fn get(&self, case: &CaseRecord) -> bool {
        match self {
            Gate::DispatchConfirmed => case.dispatch_confirmed,
            Gate::Assurance => case.assurance.requested,
            Gate::Cancellation => case.cancellation.requested,
            Gate::Adjustment => case.adjustment.requested,
            Gate::Refund => case.adjustment.refund_requested,
        }
    }

    /// Sets the gate without any cascade.
    pub fn set(&self, case: &mut CaseRecord, value: bool) {
        match self {
            Gate::DispatchConfirmed => case.dispatch_confirmed = value,
            Gate::Assurance => case.assurance.requested = value,
            Gate::Cancellation => case.cancellation.requested = value,
            Gate::Adjustment => case.adjustment.requested = value,
            Gate::Refund => case.adjustment.refund_requested = value,
        }
    }

    /// Fields that must be empty whenever this gate is off.
    pub fn dependents(&self) -> &'static [DependentField] {
        match self {
            Gate::DispatchConfirmed => &[],
            Gate::Assurance => &[
                DependentField::AssuranceId,
                DependentField::BillingCut,
                DependentField::Account,
                DependentField::OperationType,
                DependentField::AssuranceType,
                DependentField::AssuranceMonth,
            ],
            Gate::Cancellation => &[DependentField::OrderNumber],
            Gate::Adjustment => &[
                DependentField::TicketNumber,
                DependentField::TicketStatus,
                DependentField::RefundAmount,
                DependentField::RefundDispatchId,
                DependentField::RefundEffectiveDate,
            ],
            Gate::Refund => &[
                DependentField::RefundAmount,
                DependentField::RefundDispatchId,
                DependentField::RefundEffectiveDate,
            ],
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Gate {
    type Err = ModelError;

    /// Accepts the persisted key or a short alias (`dispatch`, `assurance`,
    /// `cancellation`, `adjustment`, `refund`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Gate::ALL
            .into_iter()
            .find(|gate| gate.key() == trimmed)
            .or(match trimmed.to_lowercase().as_str() {
                "dispatch" | "despacho" => Some(Gate::DispatchConfirmed),
                "assurance" | "aseguramiento" => Some(Gate::Assurance),
                "cancellation" | "baja" => Some(Gate::Cancellation),
                "adjustment" | "ajuste" => Some(Gate::Adjustment),
                "refund" | "devolucion" => Some(Gate::Refund),
                _ => None,
            })
            .ok_or_else(|| ModelError::UnknownGate(s.to_string()))
    }
}

/// A field that is only meaningful while its gate is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependentField {
    AssuranceId,
    BillingCut,
    Account,
    OperationType,
    AssuranceType,
    AssuranceMonth,
    OrderNumber,
    TicketNumber,
    TicketStatus,
    RefundAmount,
    RefundDispatchId,
    RefundEffectiveDate,
}

impl DependentField {
    pub const ALL: [DependentField; 12] = [
        DependentField::AssuranceId,
        DependentField::BillingCut,
        DependentField::Account,
        DependentField::OperationType,
        DependentField::AssuranceType,
        DependentField::AssuranceMonth,
        DependentField::OrderNumber,
        DependentField::TicketNumber,
        DependentField::TicketStatus,
        DependentField::RefundAmount,
        DependentField::RefundDispatchId,
        DependentField::RefundEffectiveDate,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DependentField::AssuranceId => keys::ASSURANCE_ID,
            DependentField::BillingCut => keys::BILLING_CUT,
            DependentField::Account => keys::ACCOUNT,
            DependentField::OperationType => keys::OPERATION_TYPE,
            DependentField::AssuranceType => keys::ASSURANCE_TYPE,
            DependentField::AssuranceMonth => keys::ASSURANCE_MONTH,
            DependentField::OrderNumber => keys::ORDER_NUMBER,
            DependentField::TicketNumber => keys::TICKET_NUMBER,
            DependentField::TicketStatus => keys::TICKET_STATUS,
            DependentField::RefundAmount => keys::REFUND_AMOUNT,
            DependentField::RefundDispatchId => keys::REFUND_DISPATCH_ID,
            DependentField::RefundEffectiveDate => keys::REFUND_EFFECTIVE_DATE,
        }
    }

    /// The innermost gate that must be on for this field to hold a value.
    pub fn gate(&self) -> Gate {
        match self {
            DependentField::AssuranceId
            | DependentField::BillingCut
            | DependentField::Account
            | DependentField::OperationType
            | DependentField::AssuranceType
            | DependentField::AssuranceMonth => Gate::Assurance,
            DependentField::OrderNumber => Gate::Cancellation,
            DependentField::TicketNumber | DependentField::TicketStatus => Gate::Adjustment,
            DependentField::RefundAmount
            | DependentField::RefundDispatchId
            | DependentField::RefundEffectiveDate => Gate::Refund,
        }
    }

    /// Returns the field's current value as text (empty when unset).
    pub fn get(&self, case: &CaseRecord) -> String {
        match self {
            DependentField::AssuranceId => case.assurance.assurance_id.clone(),
            DependentField::BillingCut => case.assurance.billing_cut.clone(),
            DependentField::Account => case.assurance.account.clone(),
            DependentField::OperationType => case.assurance.operation_type.clone(),
            DependentField::AssuranceType => case.assurance.assurance_type.clone(),
            DependentField::AssuranceMonth => case.assurance.month.clone(),
            DependentField::OrderNumber => case.cancellation.order_number.clone(),
            DependentField::TicketNumber => case.adjustment.ticket_number.clone(),
            DependentField::TicketStatus => case
                .adjustment
                .ticket_status
                .map(|status| status.as_str().to_string())
                .unwrap_or_default(),
            DependentField::RefundAmount => case.adjustment.refund_amount.clone(),
            DependentField::RefundDispatchId => case.adjustment.refund_dispatch_id.clone(),
            DependentField::RefundEffectiveDate => case.adjustment.refund_effective_date.clone(),
        }
    }

    /// Writes `value` into the field. Blank text clears it.
    ///
    /// Only `TicketStatus` can fail, when the text is not a ticket state.
    pub fn set(&self, case: &mut CaseRecord, value: &str) -> Result<(), ModelError> {
        let value = value.trim().to_string();
        match self {
            DependentField::AssuranceId => case.assurance.assurance_id = value,
            DependentField::BillingCut => case.assurance.billing_cut = value,
            DependentField::Account => case.assurance.account = value,
            DependentField::OperationType => case.assurance.operation_type = value,
            DependentField::AssuranceType => case.assurance.assurance_type = value,
            DependentField::AssuranceMonth => case.assurance.month = value,
            DependentField::OrderNumber => case.cancellation.order_number = value,
            DependentField::TicketNumber => case.adjustment.ticket_number = value,
            DependentField::TicketStatus => {
                case.adjustment.ticket_status = if value.is_empty() {
                    None
                } else {
                    Some(value.parse()?)
                };
            }
            DependentField::RefundAmount => case.adjustment.refund_amount = value,
            DependentField::RefundDispatchId => case.adjustment.refund_dispatch_id = value,
            DependentField::RefundEffectiveDate => case.adjustment.refund_effective_date = value,
        }
        Ok(())
    }

    /// Empties the field.
    pub fn clear(&self, case: &mut CaseRecord) {
        match self {
            DependentField::TicketStatus => case.adjustment.ticket_status = None,
            _ => {
                // Blank text never fails to parse.
                let _ = self.set(case, "");
            }
        }
    }
}

impl fmt::Display for DependentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for DependentField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        DependentField::ALL
            .into_iter()
            .find(|field| field.key() == trimmed)
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}
