//! Importing parsed case files into the store.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pqr_ingest::{CsvRecord, ParsedCsv};
use pqr_model::{CaseRecord, NOT_AVAILABLE, Priority, keys};
use pqr_store::DocumentId;

use crate::controller::Controller;
use crate::error::Result;
use crate::query::extract_related_complaint;

/// Cooperative cancellation flag, checked once per row.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Import switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Ask the AI backend for analysis, category and priority of new cases.
    pub enrich: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { enrich: true }
    }
}

/// A row that could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based data row number.
    pub row: usize,
    pub sn: String,
    pub message: String,
}

/// Counts reported at the end of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub updated: usize,
    /// Rows without an SN.
    pub skipped: usize,
    /// Rows whose AI enrichment failed and got placeholder values.
    pub enrichment_failures: usize,
    pub failures: Vec<RowFailure>,
    /// The run stopped early; rows already processed stay persisted.
    pub cancelled: bool,
}

impl ImportReport {
    pub fn processed(&self) -> usize {
        self.added + self.updated + self.skipped + self.failures.len()
    }
}

impl Controller {
    /// Imports parsed rows: known SNs are updated, new SNs are created.
    ///
    /// Fails only if the collection cannot be listed. Per-row write failures
    /// are recorded in the report and the loop continues. `on_row` is called
    /// after every row with the number of rows handled so far.
    pub fn import(
        &self,
        parsed: &ParsedCsv,
        options: ImportOptions,
        cancel: &CancellationToken,
        mut on_row: impl FnMut(usize),
    ) -> Result<ImportReport> {
        let store = &self.context().store;
        let mut known: HashMap<String, DocumentId> = HashMap::new();
        for case in store.list()? {
            known.entry(case.record.sn.clone()).or_insert(case.id);
        }

        let mut report = ImportReport::default();
        for (index, row) in parsed.data.iter().enumerate() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                tracing::info!(processed = index, "import cancelled");
                break;
            }

            let sn = row
                .get(keys::SN)
                .map(String::as_str)
                .map(str::trim)
                .unwrap_or_default();
            if sn.is_empty() {
                report.skipped += 1;
                on_row(index + 1);
                continue;
            }

            let result = match known.get(sn) {
                Some(id) => self.update_from_row(id, row).map(|()| {
                    report.updated += 1;
                }),
                None => {
                    let (record, enriched) = self.record_from_row(row, options);
                    if !enriched {
                        report.enrichment_failures += 1;
                    }
                    store
                        .insert(record)
                        .map(|id| {
                            known.insert(sn.to_string(), id);
                            report.added += 1;
                        })
                        .map_err(Into::into)
                }
            };

            if let Err(err) = result {
                tracing::error!(row = index + 1, %sn, error = %err, "failed to import row");
                report.failures.push(RowFailure {
                    row: index + 1,
                    sn: sn.to_string(),
                    message: err.user_message(),
                });
            }
            on_row(index + 1);
        }

        tracing::info!(
            added = report.added,
            updated = report.updated,
            skipped = report.skipped,
            failed = report.failures.len(),
            cancelled = report.cancelled,
            "import finished"
        );
        Ok(report)
    }

    /// Overwrites ingested columns of an existing case. Lifecycle-managed
    /// fields are left alone.
    fn update_from_row(&self, id: &DocumentId, row: &CsvRecord) -> Result<()> {
        let store = &self.context().store;
        let mut case = self.get(id)?.record;
        for (key, value) in row {
            case.set_ingested(key, value.clone());
        }
        if row.contains_key(keys::OBSERVATIONS) {
            case.related_complaint = extract_related_complaint(&case.observations);
        }
        store.update(id, case)?;
        Ok(())
    }

    /// Builds a new case from a row. Returns false as second value when AI
    /// enrichment was wanted but failed.
    fn record_from_row(&self, row: &CsvRecord, options: ImportOptions) -> (CaseRecord, bool) {
        let mut record = CaseRecord::default();
        for (key, value) in row {
            record.set_ingested(key, value.clone());
        }
        self.apply_creation_defaults(&mut record);

        let mut enriched = true;
        if options.enrich
            && let Some(backend) = self.assistant()
        {
            match pqr_assist::generate_analysis(backend, &record) {
                Ok(analysis) => {
                    record.ai_analysis = analysis.analysis;
                    record.category = analysis.category;
                }
                Err(err) => {
                    tracing::warn!(sn = %record.sn, error = %err, "analysis failed, using placeholders");
                    record.ai_analysis = NOT_AVAILABLE.to_string();
                    if record.category.trim().is_empty() {
                        record.category = NOT_AVAILABLE.to_string();
                    }
                    enriched = false;
                }
            }
            match pqr_assist::suggest_priority(backend, self.catalog(), &record) {
                Ok(priority) => record.priority = priority,
                Err(err) => {
                    tracing::warn!(sn = %record.sn, error = %err, "priority failed, using Media");
                    record.priority = Priority::Media;
                    enriched = false;
                }
            }
        }
        (record, enriched)
    }
}
