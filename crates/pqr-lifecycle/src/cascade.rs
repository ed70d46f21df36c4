//! Checkbox cascades.
//!
//! Toggling a gate can force other gates off, clear dependent fields and
//! revert the status. The effects are data in [`CASCADE_RULES`]; a single
//! applier interprets them.

use pqr_model::{CaseRecord, CaseStatus, DependentField, Gate, TicketStatus};

use crate::transitions::clear_closure;

/// Effect of setting `trigger` to `value`.
#[derive(Debug, Clone, Copy)]
pub struct CascadeRule {
    pub trigger: Gate,
    pub value: bool,
    /// Gates switched off, together with all of their dependent fields.
    pub forces_off: &'static [Gate],
    /// Fields emptied on the triggering case.
    pub clears: &'static [DependentField],
    /// `(from, to)`: if the case is in `from` it moves to `to`.
    pub reverts: Option<(CaseStatus, CaseStatus)>,
}

const ASSURANCE_FIELDS: &[DependentField] = &[
    DependentField::AssuranceId,
    DependentField::BillingCut,
    DependentField::Account,
    DependentField::OperationType,
    DependentField::AssuranceType,
    DependentField::AssuranceMonth,
];

const REFUND_FIELDS: &[DependentField] = &[
    DependentField::RefundAmount,
    DependentField::RefundDispatchId,
    DependentField::RefundEffectiveDate,
];

const ADJUSTMENT_FIELDS: &[DependentField] = &[
    DependentField::TicketNumber,
    DependentField::TicketStatus,
    DependentField::RefundAmount,
    DependentField::RefundDispatchId,
    DependentField::RefundEffectiveDate,
];

/// The cascade table. Gate/value pairs not listed have no side effects.
pub const CASCADE_RULES: &[CascadeRule] = &[
    CascadeRule {
        trigger: Gate::DispatchConfirmed,
        value: true,
        forces_off: &[Gate::Assurance, Gate::Cancellation, Gate::Adjustment, Gate::Refund],
        clears: &[],
        reverts: Some((CaseStatus::PendienteAjustes, CaseStatus::Pendiente)),
    },
    CascadeRule {
        trigger: Gate::Assurance,
        value: true,
        forces_off: &[Gate::DispatchConfirmed],
        clears: &[],
        reverts: None,
    },
    CascadeRule {
        trigger: Gate::Cancellation,
        value: true,
        forces_off: &[Gate::DispatchConfirmed],
        clears: &[],
        reverts: None,
    },
    CascadeRule {
        trigger: Gate::Adjustment,
        value: true,
        forces_off: &[Gate::DispatchConfirmed],
        clears: &[],
        reverts: None,
    },
    CascadeRule {
        trigger: Gate::Assurance,
        value: false,
        forces_off: &[],
        clears: ASSURANCE_FIELDS,
        reverts: None,
    },
    CascadeRule {
        trigger: Gate::Cancellation,
        value: false,
        forces_off: &[],
        clears: &[DependentField::OrderNumber],
        reverts: None,
    },
    CascadeRule {
        trigger: Gate::Adjustment,
        value: false,
        forces_off: &[Gate::Refund],
        clears: ADJUSTMENT_FIELDS,
        reverts: None,
    },
    CascadeRule {
        trigger: Gate::Refund,
        value: false,
        forces_off: &[],
        clears: REFUND_FIELDS,
        reverts: None,
    },
];

/// Looks up the rule for a gate change.
pub fn rule_for(trigger: Gate, value: bool) -> Option<&'static CascadeRule> {
    CASCADE_RULES
        .iter()
        .find(|rule| rule.trigger == trigger && rule.value == value)
}

/// Sets `gate` to `value` on `case` and applies the matching rule.
pub fn apply_gate(case: &mut CaseRecord, gate: Gate, value: bool) {
    gate.set(case, value);
    let Some(rule) = rule_for(gate, value) else {
        return;
    };
    for forced in rule.forces_off {
        forced.set(case, false);
        for field in forced.dependents() {
            field.clear(case);
        }
    }
    for field in rule.clears {
        field.clear(case);
    }
    if let Some((from, to)) = rule.reverts
        && case.status == from
    {
        case.status = to;
    }
}

/// Enters `Pendiente Ajustes` when an adjustment ticket is pending.
///
/// `Finalizado` is terminal and keeps its status. A `Resuelto` case loses
/// its closure stamps.
pub fn derive_pending_adjustment(case: &mut CaseRecord) -> bool {
    let pending = case.adjustment.requested
        && case.adjustment.ticket_status == Some(TicketStatus::Pendiente);
    let eligible = !matches!(case.status, CaseStatus::PendienteAjustes | CaseStatus::Finalizado);
    if pending && eligible {
        if case.status.is_closed() {
            clear_closure(case);
        }
        case.status = CaseStatus::PendienteAjustes;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjusted_case() -> CaseRecord {
        let mut case = CaseRecord::new("1");
        case.adjustment.requested = true;
        case.adjustment.ticket_number = "TT-9".to_string();
        case.adjustment.ticket_status = Some(TicketStatus::Pendiente);
        case.adjustment.refund_requested = true;
        case.adjustment.refund_amount = "15000".to_string();
        case
    }

    #[test]
    fn test_every_gate_change_is_covered_or_inert() {
        // Enabling refund has no side effects; every other pair has a rule.
        for gate in Gate::ALL {
            for value in [true, false] {
                let inert = gate == Gate::Refund && value
                    || gate == Gate::DispatchConfirmed && !value;
                assert_eq!(rule_for(gate, value).is_none(), inert, "{gate} -> {value}");
            }
        }
    }

    #[test]
    fn test_dispatch_clears_ancillaries_and_reverts() {
        let mut case = adjusted_case();
        case.status = CaseStatus::PendienteAjustes;
        case.cancellation.requested = true;
        case.cancellation.order_number = "OB-1".to_string();

        apply_gate(&mut case, Gate::DispatchConfirmed, true);

        assert!(case.dispatch_confirmed);
        assert!(!case.has_ancillary_request());
        assert!(!case.adjustment.refund_requested);
        assert!(case.adjustment.ticket_number.is_empty());
        assert!(case.adjustment.ticket_status.is_none());
        assert!(case.cancellation.order_number.is_empty());
        assert_eq!(case.status, CaseStatus::Pendiente);
    }

    #[test]
    fn test_ancillary_clears_dispatch() {
        let mut case = CaseRecord::new("1");
        case.dispatch_confirmed = true;
        apply_gate(&mut case, Gate::Assurance, true);
        assert!(!case.dispatch_confirmed);
        assert!(case.assurance.requested);
    }

    #[test]
    fn test_disabling_refund_keeps_ticket() {
        let mut case = adjusted_case();
        apply_gate(&mut case, Gate::Refund, false);
        assert!(case.adjustment.refund_amount.is_empty());
        assert_eq!(case.adjustment.ticket_number, "TT-9");
    }

    #[test]
    fn test_disabling_adjustment_clears_refund_too() {
        let mut case = adjusted_case();
        apply_gate(&mut case, Gate::Adjustment, false);
        assert!(!case.adjustment.refund_requested);
        assert!(case.adjustment.refund_amount.is_empty());
        assert!(case.adjustment.ticket_number.is_empty());
    }

    #[test]
    fn test_pending_ticket_enters_pending_adjustments() {
        let mut case = adjusted_case();
        assert!(derive_pending_adjustment(&mut case));
        assert_eq!(case.status, CaseStatus::PendienteAjustes);
        assert!(!derive_pending_adjustment(&mut case));

        let mut finished = adjusted_case();
        finished.status = CaseStatus::Finalizado;
        assert!(!derive_pending_adjustment(&mut finished));
    }

    #[test]
    fn test_pending_ticket_moves_decreed_and_resolved_cases() {
        let mut decreed = adjusted_case();
        decreed.status = CaseStatus::Decretado;
        assert!(derive_pending_adjustment(&mut decreed));
        assert_eq!(decreed.status, CaseStatus::PendienteAjustes);

        let mut resolved = adjusted_case();
        resolved.status = CaseStatus::Resuelto;
        resolved.closure_date = "2024-05-20".to_string();
        resolved.resolution_minutes = Some(40);
        assert!(derive_pending_adjustment(&mut resolved));
        assert_eq!(resolved.status, CaseStatus::PendienteAjustes);
        assert!(resolved.closure_date.is_empty());
        assert_eq!(resolved.resolution_minutes, None);
    }
}
