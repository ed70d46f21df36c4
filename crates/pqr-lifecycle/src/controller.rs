//! The case lifecycle controller.

use std::collections::BTreeSet;
use std::sync::Arc;

use pqr_assist::{AiBackend, EscalationSuggestion};
use pqr_model::{
    AssuranceEntry, CaseRecord, CaseStatus, Catalog, EscalationEntry, Gate, ObservationEntry,
    format_date,
};
use pqr_store::{DocumentId, StoredCase};

use crate::cascade::{apply_gate, derive_pending_adjustment};
use crate::context::CaseContext;
use crate::edit::{EditField, apply_edit};
use crate::error::{LifecycleError, Result};
use crate::query::{CaseFilter, extract_related_complaint, filter_cases, find_duplicates};
use crate::staging::Staging;
use crate::transitions::{
    Now, Planned, TransitionOutcome, accumulated_entries, clear_closure, plan_reopen, plan_status,
    plan_sweep,
};

/// Values saved with an escalation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EscalationInput {
    pub area: String,
    pub reason: String,
    pub ticket_id: String,
    pub requirement: String,
    pub description: String,
}

/// Outcome of a mass reopen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MassReopenReport {
    pub reopened: usize,
    /// Cases not in `Resuelto`, left untouched.
    pub skipped: usize,
}

/// Applies lifecycle rules to the cases in a store.
///
/// Every public operation plans against a fresh snapshot and commits one
/// atomic batch; a rejected operation writes nothing.
pub struct Controller {
    catalog: Arc<Catalog>,
    ctx: CaseContext,
    assistant: Option<Arc<dyn AiBackend>>,
}

impl Controller {
    pub fn new(catalog: Arc<Catalog>, ctx: CaseContext) -> Self {
        Self {
            catalog,
            ctx,
            assistant: None,
        }
    }

    /// Enables the AI-backed operations.
    pub fn with_assistant(mut self, backend: Arc<dyn AiBackend>) -> Self {
        self.assistant = Some(backend);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn context(&self) -> &CaseContext {
        &self.ctx
    }

    pub(crate) fn assistant(&self) -> Option<&dyn AiBackend> {
        self.assistant.as_deref()
    }

    pub(crate) fn now(&self) -> Now {
        Now {
            instant: self.ctx.clock.now(),
            today: self.ctx.clock.today(),
        }
    }

    fn staging(&self) -> Result<Staging> {
        Ok(Staging::new(self.ctx.store.list()?))
    }

    fn commit(&self, staging: Staging) -> Result<Vec<DocumentId>> {
        if staging.is_empty() {
            return Ok(Vec::new());
        }
        let (batch, inserted) = staging.into_batch();
        self.ctx.store.commit(batch)?;
        Ok(inserted)
    }

    /// Runs `edit` on one case and commits it.
    fn modify<T>(&self, id: &DocumentId, edit: impl FnOnce(&mut CaseRecord) -> Result<T>) -> Result<T> {
        let mut staging = self.staging()?;
        let out = edit(staging.get_mut(id)?)?;
        self.commit(staging)?;
        Ok(out)
    }

    // --- Reading -------------------------------------------------------

    /// Lists the collection after running the auto-finalize sweep.
    pub fn observe(&self) -> Result<Vec<StoredCase>> {
        let finalized = self.sweep()?;
        if !finalized.is_empty() {
            tracing::info!(count = finalized.len(), "finalized resolved cases");
        }
        Ok(self.ctx.store.list()?)
    }

    /// Moves resolved cases without ancillary requests to `Finalizado` in
    /// one batch. Idempotent. Returns the SNs finalized.
    pub fn sweep(&self) -> Result<Vec<String>> {
        let mut staging = self.staging()?;
        let finalized = plan_sweep(&mut staging)?;
        self.commit(staging)?;
        Ok(finalized)
    }

    pub fn list(&self, filter: &CaseFilter) -> Result<Vec<StoredCase>> {
        let cases = self.observe()?;
        Ok(filter_cases(&cases, filter).into_iter().cloned().collect())
    }

    pub fn get(&self, id: &DocumentId) -> Result<StoredCase> {
        self.ctx
            .store
            .get(id)?
            .ok_or_else(|| LifecycleError::NotFound(id.clone()))
    }

    pub fn find_by_sn(&self, sn: &str) -> Result<StoredCase> {
        self.ctx
            .store
            .find_by_sn(sn)?
            .ok_or_else(|| LifecycleError::UnknownSn(sn.to_string()))
    }

    /// Advisory duplicates of a case (same national id or CUN).
    pub fn duplicates_of(&self, id: &DocumentId) -> Result<Vec<StoredCase>> {
        let cases = self.ctx.store.list()?;
        let target = cases
            .iter()
            .find(|c| &c.id == id)
            .ok_or_else(|| LifecycleError::NotFound(id.clone()))?;
        Ok(find_duplicates(&cases, target).into_iter().cloned().collect())
    }

    // --- Status --------------------------------------------------------

    /// Requests a status change.
    ///
    /// `Resuelto` without dispatch or ancillary requests and `Decretado`
    /// return [`TransitionOutcome::ConfirmationRequired`] unless `confirmed`.
    pub fn change_status(
        &self,
        id: &DocumentId,
        target: CaseStatus,
        confirmed: bool,
    ) -> Result<TransitionOutcome> {
        let mut staging = self.staging()?;
        let planned = plan_status(&mut staging, id, target, confirmed, self.now())?;
        let outcome = match planned {
            Planned::Unchanged => TransitionOutcome::Unchanged,
            Planned::ConfirmationRequired(prompt) => TransitionOutcome::ConfirmationRequired(prompt),
            Planned::Applied(status) => {
                self.commit(staging)?;
                TransitionOutcome::Applied(status)
            }
            Planned::Decreed(successor_sn) => {
                let inserted = self.commit(staging)?;
                let successor_id = inserted
                    .into_iter()
                    .next()
                    .ok_or_else(|| LifecycleError::Validation("decree produced no case".to_string()))?;
                TransitionOutcome::Decreed {
                    successor_id,
                    successor_sn,
                }
            }
        };
        tracing::info!(%id, to = %target, ?outcome, "status change");
        Ok(outcome)
    }

    /// Decrees a case. Same as requesting `Decretado`.
    pub fn decree(&self, id: &DocumentId, confirmed: bool) -> Result<TransitionOutcome> {
        self.change_status(id, CaseStatus::Decretado, confirmed)
    }

    /// Reopens a resolved case.
    pub fn reopen(&self, id: &DocumentId) -> Result<()> {
        let mut staging = self.staging()?;
        plan_reopen(&mut staging, id)?;
        self.commit(staging)?;
        tracing::info!(%id, "reopened case");
        Ok(())
    }

    // --- Gates and fields ----------------------------------------------

    /// Sets a gate and applies its cascade.
    pub fn set_flag(&self, id: &DocumentId, gate: Gate, value: bool) -> Result<CaseRecord> {
        self.modify(id, |case| {
            if gate == Gate::Refund && value && !case.adjustment.requested {
                return Err(LifecycleError::Validation(
                    "Active el ajuste antes de solicitar devolución".to_string(),
                ));
            }
            apply_gate(case, gate, value);
            derive_pending_adjustment(case);
            Ok(case.clone())
        })
    }

    /// Edits one field.
    pub fn edit_field(&self, id: &DocumentId, field: EditField, value: &str) -> Result<CaseRecord> {
        let catalog = Arc::clone(&self.catalog);
        self.modify(id, |case| {
            apply_edit(case, &catalog, field, value)?;
            Ok(case.clone())
        })
    }

    // --- Logs ----------------------------------------------------------

    pub fn add_observation(&self, id: &DocumentId, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(LifecycleError::Validation("La observación está vacía".to_string()));
        }
        let now = self.now();
        self.modify(id, |case| {
            case.observation_log.push(ObservationEntry {
                timestamp: now.instant,
                text: text.to_string(),
            });
            Ok(())
        })
    }

    /// Saves an escalation and moves the case to `Escalado`.
    pub fn save_escalation(&self, id: &DocumentId, input: &EscalationInput) -> Result<()> {
        if !self.catalog.is_valid_escalation(&input.area, &input.reason) {
            return Err(LifecycleError::NotInCatalog {
                field: "escalation area/reason",
                value: format!("{} / {}", input.area, input.reason),
            });
        }
        let now = self.now();
        self.modify(id, |case| {
            if case.status == CaseStatus::Finalizado {
                return Err(LifecycleError::InvalidTransition {
                    from: case.status,
                    to: CaseStatus::Escalado,
                });
            }
            case.escalation.area = input.area.clone();
            case.escalation.reason = input.reason.clone();
            case.escalation.ticket_id = input.ticket_id.trim().to_string();
            case.escalation.requirement = input.requirement.trim().to_string();
            case.escalation.description = input.description.trim().to_string();
            case.escalation_log.push(EscalationEntry {
                timestamp: now.instant,
                area: input.area.clone(),
                reason: input.reason.clone(),
                ticket_id: case.escalation.ticket_id.clone(),
                requirement: case.escalation.requirement.clone(),
                description: case.escalation.description.clone(),
            });
            if case.status.is_closed() {
                clear_closure(case);
            }
            case.status = CaseStatus::Escalado;
            Ok(())
        })
    }

    /// Snapshots the assurance fields into the assurance history.
    pub fn save_assurance(&self, id: &DocumentId, note: &str) -> Result<()> {
        let now = self.now();
        self.modify(id, |case| {
            if !case.assurance.requested {
                return Err(LifecycleError::Validation(
                    "Active el aseguramiento antes de guardarlo".to_string(),
                ));
            }
            let a = &case.assurance;
            let entry = AssuranceEntry {
                timestamp: now.instant,
                assurance_id: a.assurance_id.clone(),
                billing_cut: a.billing_cut.clone(),
                account: a.account.clone(),
                operation_type: a.operation_type.clone(),
                assurance_type: a.assurance_type.clone(),
                month: a.month.clone(),
                note: note.trim().to_string(),
            };
            case.assurance_log.push(entry);
            Ok(())
        })
    }

    /// Links further SNs to a case. They are resolved together with it.
    ///
    /// Returns how many entries were appended.
    pub fn add_accumulated_sns(
        &self,
        id: &DocumentId,
        links: &[(String, String)],
        note: &str,
    ) -> Result<usize> {
        let now = self.now();
        self.modify(id, |case| {
            let entries = accumulated_entries(case, links, note, now);
            if entries.is_empty() {
                return Err(LifecycleError::Validation(
                    "Indique al menos un SN distinto al del caso".to_string(),
                ));
            }
            let count = entries.len();
            case.accumulated_sn_log.extend(entries);
            Ok(count)
        })
    }

    // --- Create and delete ---------------------------------------------

    /// Creates a case by hand. The SN must be new.
    pub fn create_manual(&self, mut record: CaseRecord) -> Result<DocumentId> {
        record.sn = record.sn.trim().to_string();
        if record.sn.is_empty() {
            return Err(LifecycleError::Validation("El SN es obligatorio".to_string()));
        }
        let mut staging = self.staging()?;
        if staging.sn_exists(&record.sn) {
            return Err(LifecycleError::DuplicateSn(record.sn));
        }
        self.apply_creation_defaults(&mut record);
        let sn = record.sn.clone();
        staging.insert(record);
        let id = self
            .commit(staging)?
            .into_iter()
            .next()
            .ok_or_else(|| LifecycleError::Validation("case was not created".to_string()))?;
        tracing::info!(%sn, %id, "created case");
        Ok(id)
    }

    /// Defaults shared by manual entry and import.
    pub(crate) fn apply_creation_defaults(&self, record: &mut CaseRecord) {
        let today = format_date(self.now().today);
        record.status = CaseStatus::Pendiente;
        record.customer_name = record.customer_name.trim().to_uppercase();
        if record.filing_date.trim().is_empty() {
            record.filing_date = today.clone();
        }
        record.assigned_date = today;
        record.assigned_user = self.ctx.user_id.clone();
        record.related_complaint = extract_related_complaint(&record.observations);
    }

    pub fn delete_case(&self, id: &DocumentId) -> Result<()> {
        let mut staging = self.staging()?;
        staging.remove(id)?;
        self.commit(staging)?;
        tracing::info!(%id, "deleted case");
        Ok(())
    }

    // --- Mass operations -----------------------------------------------

    /// Moves every case to `target` in one batch. Any failure, including a
    /// needed confirmation, aborts the whole operation.
    pub fn mass_change_status(&self, ids: &[DocumentId], target: CaseStatus) -> Result<usize> {
        if target == CaseStatus::Decretado {
            return Err(LifecycleError::Validation(
                "El decreto se aplica caso por caso".to_string(),
            ));
        }
        let now = self.now();
        let mut staging = self.staging()?;
        let mut changed = 0;
        for id in ids {
            let sn = staging.get(id)?.sn.clone();
            let abort = |source: LifecycleError| LifecycleError::MassAborted {
                sn: sn.clone(),
                source: Box::new(source),
            };
            match plan_status(&mut staging, id, target, false, now).map_err(abort)? {
                Planned::Applied(_) => changed += 1,
                Planned::Unchanged => {}
                Planned::ConfirmationRequired(prompt) | Planned::Decreed(prompt) => {
                    return Err(abort(LifecycleError::Validation(prompt)));
                }
            }
        }
        self.commit(staging)?;
        tracing::info!(changed, to = %target, "mass status change");
        Ok(changed)
    }

    /// Deletes every case in one batch. Repeated ids count once.
    pub fn mass_delete(&self, ids: &[DocumentId]) -> Result<usize> {
        let unique: BTreeSet<&DocumentId> = ids.iter().collect();
        let count = unique.len();
        let mut staging = self.staging()?;
        for id in unique {
            staging.remove(id)?;
        }
        self.commit(staging)?;
        tracing::info!(count, "mass delete");
        Ok(count)
    }

    /// Reopens the resolved cases among `ids`; the rest are counted as skipped.
    pub fn mass_reopen(&self, ids: &[DocumentId]) -> Result<MassReopenReport> {
        let mut staging = self.staging()?;
        let mut report = MassReopenReport::default();
        for id in ids {
            if staging.get(id)?.status == CaseStatus::Resuelto {
                plan_reopen(&mut staging, id)?;
                report.reopened += 1;
            } else {
                report.skipped += 1;
            }
        }
        self.commit(staging)?;
        tracing::info!(reopened = report.reopened, skipped = report.skipped, "mass reopen");
        Ok(report)
    }

    // --- AI ------------------------------------------------------------

    fn require_assistant(&self) -> Result<&dyn AiBackend> {
        self.assistant().ok_or(LifecycleError::NoAssistant)
    }

    /// Generates and stores the analysis and category.
    pub fn generate_analysis(&self, id: &DocumentId) -> Result<CaseRecord> {
        let backend = self.require_assistant()?;
        let case = self.get(id)?;
        let analysis = pqr_assist::generate_analysis(backend, &case.record)?;
        self.modify(id, |case| {
            case.ai_analysis = analysis.analysis;
            case.category = analysis.category;
            Ok(case.clone())
        })
    }

    /// Generates and stores the facts summary.
    pub fn generate_summary(&self, id: &DocumentId) -> Result<CaseRecord> {
        let backend = self.require_assistant()?;
        let case = self.get(id)?;
        let summary = pqr_assist::generate_summary(backend, &case.record)?;
        self.modify(id, |case| {
            case.ai_summary = summary;
            Ok(case.clone())
        })
    }

    /// Drafts and stores the response projection.
    pub fn project_response(&self, id: &DocumentId) -> Result<CaseRecord> {
        let backend = self.require_assistant()?;
        let case = self.get(id)?;
        let projection = pqr_assist::project_response(backend, &case.record)?;
        self.modify(id, |case| {
            case.ai_response_projection = projection;
            Ok(case.clone())
        })
    }

    /// Suggests an escalation. Nothing is stored.
    pub fn suggest_escalation(&self, id: &DocumentId) -> Result<EscalationSuggestion> {
        let backend = self.require_assistant()?;
        let case = self.get(id)?;
        Ok(pqr_assist::suggest_escalation(backend, &self.catalog, &case.record)?)
    }

    /// Transcribes an attached document into `Documento_Adjunto`.
    pub fn transcribe_document(
        &self,
        id: &DocumentId,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<CaseRecord> {
        let backend = self.require_assistant()?;
        self.get(id)?;
        let text = pqr_assist::transcribe_document(backend, mime_type, bytes)?;
        self.modify(id, |case| {
            case.attached_document = text;
            Ok(case.clone())
        })
    }
}
