//! Status transition planning.
//!
//! Planners mutate a [`Staging`] copy of the collection. Nothing is written
//! until the controller commits the resulting batch.

use chrono::{DateTime, Utc};
use pqr_model::{
    AccumulatedSnEntry, CaseRecord, CaseStatus, Gate, NOT_AVAILABLE, ObservationEntry, format_date,
};
use pqr_store::DocumentId;

use crate::error::{LifecycleError, Result};
use crate::staging::Staging;
use crate::validation::{decree_problems, resolution_problems};

/// Result of asking for a status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The case now has this status.
    Applied(CaseStatus),
    /// The case already had the requested status.
    Unchanged,
    /// The caller must repeat the request with explicit confirmation.
    ConfirmationRequired(String),
    /// The case was decreed; the successor was created.
    Decreed {
        successor_id: DocumentId,
        successor_sn: String,
    },
}

/// Instant and civil date used for every stamp in one operation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Now {
    pub instant: DateTime<Utc>,
    pub today: chrono::NaiveDate,
}

pub(crate) enum Planned {
    Applied(CaseStatus),
    Unchanged,
    ConfirmationRequired(String),
    /// Successor queued in staging under this SN.
    Decreed(String),
}

pub(crate) const RESOLVE_CONFIRMATION: &str = "No se ha confirmado el despacho de la respuesta ni \
    hay solicitudes de aseguramiento, baja o ajuste. ¿Confirma que la respuesta fue despachada?";

pub(crate) const DECREE_CONFIRMATION: &str = "El caso se marcará como Resuelto y se creará un nuevo \
    caso Decretado vinculado. ¿Desea continuar?";

/// Plans a move of case `id` to `target`.
pub(crate) fn plan_status(
    staging: &mut Staging,
    id: &DocumentId,
    target: CaseStatus,
    confirmed: bool,
    now: Now,
) -> Result<Planned> {
    let current = staging.get(id)?.status;
    if current == target {
        return Ok(Planned::Unchanged);
    }
    if !target.is_user_selectable() || current == CaseStatus::Finalizado {
        return Err(LifecycleError::InvalidTransition {
            from: current,
            to: target,
        });
    }

    match target {
        CaseStatus::Resuelto => plan_resolve(staging, id, confirmed, now),
        CaseStatus::Decretado => plan_decree(staging, id, confirmed, now),
        _ => {
            let case = staging.get_mut(id)?;
            leave(case, current);
            if current.is_closed() {
                clear_closure(case);
            }
            if target == CaseStatus::Iniciado {
                case.work_started_at = Some(now.instant);
                case.resolution_minutes = None;
            }
            case.status = target;
            Ok(Planned::Applied(target))
        }
    }
}

/// Side effects of leaving `from`.
fn leave(case: &mut CaseRecord, from: CaseStatus) {
    if from == CaseStatus::Escalado {
        case.clear_escalation();
    }
}

pub(crate) fn clear_closure(case: &mut CaseRecord) {
    case.closure_date.clear();
    case.resolution_minutes = None;
}

/// Stamps closure date and resolution time.
fn close(case: &mut CaseRecord, now: Now) {
    case.closure_date = format_date(now.today);
    case.resolution_minutes = case
        .work_started_at
        .map(|started| (now.instant - started).num_minutes());
}

fn plan_resolve(staging: &mut Staging, id: &DocumentId, confirmed: bool, now: Now) -> Result<Planned> {
    let case = staging.get(id)?;
    let problems = resolution_problems(case);
    if !problems.is_empty() {
        return Err(LifecycleError::Validation(problems.join("\n")));
    }
    let needs_confirmation = !case.dispatch_confirmed && !case.has_ancillary_request();
    if needs_confirmation && !confirmed {
        return Ok(Planned::ConfirmationRequired(RESOLVE_CONFIRMATION.to_string()));
    }

    let linked: Vec<String> = case
        .accumulated_sn_log
        .iter()
        .map(|entry| entry.sn.clone())
        .filter(|sn| !sn.is_empty() && *sn != case.sn)
        .collect();

    let case = staging.get_mut(id)?;
    resolve_in_place(case, needs_confirmation, now);

    // Linked cases close under the same rule; one invalid case aborts the batch.
    for sn in linked {
        for linked_id in staging.ids_with_sn(&sn) {
            let linked_case = staging.get_mut(&linked_id)?;
            if linked_case.status.is_closed() {
                continue;
            }
            let problems = resolution_problems(linked_case);
            if !problems.is_empty() {
                return Err(LifecycleError::Validation(format!(
                    "Caso acumulado {}:\n{}",
                    linked_case.sn,
                    problems.join("\n")
                )));
            }
            let unflagged = !linked_case.dispatch_confirmed && !linked_case.has_ancillary_request();
            resolve_in_place(linked_case, unflagged, now);
            tracing::debug!(sn = %linked_case.sn, "resolving accumulated case");
        }
    }

    Ok(Planned::Applied(CaseStatus::Resuelto))
}

/// Closes `case` as `Resuelto`. `confirm_dispatch` records the operator's
/// confirmation as the dispatch flag.
fn resolve_in_place(case: &mut CaseRecord, confirm_dispatch: bool, now: Now) {
    let previous = case.status;
    leave(case, previous);
    if confirm_dispatch {
        case.dispatch_confirmed = true;
    }
    close(case, now);
    case.status = CaseStatus::Resuelto;
}

/// Next free `<root>-D<n>` key.
fn successor_sn(staging: &Staging, root: &str) -> String {
    let mut n = 1;
    loop {
        let candidate = format!("{root}-D{n}");
        if !staging.sn_exists(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn plan_decree(staging: &mut Staging, id: &DocumentId, confirmed: bool, now: Now) -> Result<Planned> {
    let original = staging.get(id)?.clone();
    let problems = decree_problems(&original);
    if !problems.is_empty() {
        return Err(LifecycleError::Validation(problems.join("\n")));
    }
    if !confirmed {
        return Ok(Planned::ConfirmationRequired(DECREE_CONFIRMATION.to_string()));
    }

    let root = original
        .sn_original
        .clone()
        .filter(|sn| !sn.is_empty())
        .unwrap_or_else(|| original.sn.clone());
    let new_sn = successor_sn(staging, &root);

    let mut successor = original.clone();
    successor.sn = new_sn.clone();
    successor.sn_original = Some(root);
    successor.status = CaseStatus::Decretado;
    successor.filing_date = format_date(now.today);
    successor.day_counter = "0".to_string();
    successor.closure_date.clear();
    successor.work_started_at = None;
    successor.resolution_minutes = None;
    for gate in Gate::ALL {
        gate.set(&mut successor, false);
        for field in gate.dependents() {
            field.clear(&mut successor);
        }
    }
    successor.clear_escalation();
    successor.observation_log.clear();
    successor.escalation_log.clear();
    successor.assurance_log.clear();
    successor.accumulated_sn_log.clear();
    staging.insert(successor);

    let case = staging.get_mut(id)?;
    let previous = case.status;
    leave(case, previous);
    close(case, now);
    case.status = CaseStatus::Resuelto;
    case.observation_log.push(ObservationEntry {
        timestamp: now.instant,
        text: format!("Caso decretado. Nuevo caso creado con SN {new_sn}"),
    });

    Ok(Planned::Decreed(new_sn))
}

/// Plans a reopen. Only `Resuelto` cases can be reopened.
pub(crate) fn plan_reopen(staging: &mut Staging, id: &DocumentId) -> Result<()> {
    let case = staging.get_mut(id)?;
    if case.status != CaseStatus::Resuelto {
        return Err(LifecycleError::InvalidTransition {
            from: case.status,
            to: CaseStatus::Pendiente,
        });
    }
    case.status = CaseStatus::Pendiente;
    clear_closure(case);
    Ok(())
}

/// Moves every `Resuelto` case without ancillary requests to `Finalizado`.
///
/// Returns the SNs that were finalized.
pub(crate) fn plan_sweep(staging: &mut Staging) -> Result<Vec<String>> {
    let ids: Vec<DocumentId> = staging
        .live()
        .filter(|c| c.record.status == CaseStatus::Resuelto && !c.record.has_ancillary_request())
        .map(|c| c.id.clone())
        .collect();
    let mut finalized = Vec::with_capacity(ids.len());
    for id in ids {
        let case = staging.get_mut(&id)?;
        case.status = CaseStatus::Finalizado;
        finalized.push(case.sn.clone());
    }
    Ok(finalized)
}

/// Builds accumulated-SN log entries, skipping blanks and the case itself.
pub(crate) fn accumulated_entries(
    case: &CaseRecord,
    links: &[(String, String)],
    note: &str,
    now: Now,
) -> Vec<AccumulatedSnEntry> {
    links
        .iter()
        .map(|(sn, cun)| (sn.trim(), cun.trim()))
        .filter(|(sn, _)| !sn.is_empty() && *sn != case.sn)
        .map(|(sn, cun)| AccumulatedSnEntry {
            timestamp: now.instant,
            sn: sn.to_string(),
            cun: if cun.is_empty() { NOT_AVAILABLE.to_string() } else { cun.to_string() },
            note: note.trim().to_string(),
        })
        .collect()
}
