//! Preconditions for closing a case.

use pqr_model::{CaseRecord, TicketStatus};

fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Finite number, accepting a decimal comma.
fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Problems that prevent resolving `case`, one message per missing item.
///
/// Only flagged requests are checked.
pub fn resolution_problems(case: &CaseRecord) -> Vec<String> {
    let mut problems = Vec::new();

    if case.assurance.requested {
        let a = &case.assurance;
        let detailed = parse_number(&a.billing_cut).is_some()
            && present(&a.account)
            && present(&a.operation_type)
            && present(&a.assurance_type)
            && present(&a.month);
        if !present(&a.assurance_id) && !detailed {
            problems.push(
                "Aseguramiento: indique ID_Aseguramiento, o Corte_Facturacion numérico, Cuenta, \
                 Operacion_Aseguramiento, Tipo_Aseguramiento y Mes_Aseguramiento"
                    .to_string(),
            );
        }
    }

    if case.cancellation.requested && !present(&case.cancellation.order_number) {
        problems.push("Baja: falta numeroOrdenBaja".to_string());
    }

    if case.adjustment.requested {
        let adj = &case.adjustment;
        if !present(&adj.ticket_number) {
            problems.push("Ajuste: falta numeroTT".to_string());
        }
        if adj.ticket_status != Some(TicketStatus::Aplicado) {
            problems.push("Ajuste: estadoTT debe ser Aplicado".to_string());
        }
        if adj.refund_requested {
            let amount_ok = parse_number(&adj.refund_amount).is_some_and(|amount| amount > 0.0);
            if !amount_ok {
                problems.push("Devolución: cantidadDevolver debe ser un número positivo".to_string());
            }
            if !present(&adj.refund_dispatch_id) {
                problems.push("Devolución: falta idEnvioDevoluciones".to_string());
            }
            if !present(&adj.refund_effective_date) {
                problems.push("Devolución: falta fechaEfectivaDevolucion".to_string());
            }
        }
    }

    problems
}

/// Problems that prevent decreeing `case`.
pub fn decree_problems(case: &CaseRecord) -> Vec<String> {
    let mut problems = Vec::new();
    if !case.dispatch_confirmed {
        problems.push("Decreto: confirme el despacho de la respuesta".to_string());
    }
    if case.escalation_log.is_empty() {
        problems.push("Decreto: guarde al menos un escalamiento".to_string());
    }
    if !present(&case.sic_filing) {
        problems.push("Decreto: falta Radicado_SIC".to_string());
    }
    if !present(&case.decree_due_date) {
        problems.push("Decreto: falta Fecha_Vencimiento_Decreto".to_string());
    }
    problems
}
