//! CSV export of cases.
//!
//! Every field is double-quoted and embedded quotes are doubled. History logs
//! are written as JSON text inside their field. Columns are a fixed baseline
//! followed by every other key present on the exported cases, sorted.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use pqr_model::{CaseRecord, keys};
use serde_json::Value;

use crate::error::{ExportError, Result};

/// Columns always exported first, in this order.
pub const EXPORT_BASELINE: &[&str] = &[
    keys::SN,
    keys::CUN,
    keys::FILING_DATE,
    keys::CLOSURE_DATE,
    keys::ASSIGNED_DATE,
    keys::ASSIGNED_USER,
    keys::STATUS,
    keys::WORK_STARTED_AT,
    keys::RESOLUTION_MINUTES,
    keys::SIC_FILING,
    keys::DECREE_DUE_DATE,
    keys::DAY_COUNTER,
    keys::DUE_DATE,
    keys::CUSTOMER_NAME,
    keys::CUSTOMER_ID,
    keys::OBSERVATIONS,
    keys::RELATED_COMPLAINT,
    keys::PRIORITY,
    keys::AI_ANALYSIS,
    keys::CATEGORY,
    keys::AI_SUMMARY,
    keys::ATTACHED_DOCUMENT,
];

/// Flattens a case to its persisted keys, as export text.
pub fn flatten_record(record: &CaseRecord) -> Result<BTreeMap<String, String>> {
    let value = serde_json::to_value(record)?;
    let Value::Object(map) = value else {
        return Err(ExportError::Shape("case did not serialize to an object".to_string()));
    };
    Ok(map
        .into_iter()
        .map(|(key, value)| (key, cell_text(&value)))
        .collect())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Baseline columns plus the sorted remaining keys of `rows`.
pub fn export_headers(rows: &[BTreeMap<String, String>]) -> Vec<String> {
    let baseline: BTreeSet<&str> = EXPORT_BASELINE.iter().copied().collect();
    let extra: BTreeSet<&String> = rows
        .iter()
        .flat_map(BTreeMap::keys)
        .filter(|key| !baseline.contains(key.as_str()))
        .collect();
    EXPORT_BASELINE
        .iter()
        .map(|h| (*h).to_string())
        .chain(extra.into_iter().cloned())
        .collect()
}

/// Writes `rows` under `headers`, quoting every field. Missing cells are empty.
pub fn write_table<W: Write>(
    headers: &[String],
    rows: &[BTreeMap<String, String>],
    writer: W,
) -> Result<()> {
    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    csv.write_record(headers)?;
    for row in rows {
        csv.write_record(
            headers
                .iter()
                .map(|h| row.get(h).map_or("", String::as_str)),
        )?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes every case to `writer`. Returns the number of rows written.
pub fn export_cases<W: Write>(cases: &[CaseRecord], writer: W) -> Result<usize> {
    let rows = cases
        .iter()
        .map(flatten_record)
        .collect::<Result<Vec<_>>>()?;
    let headers = export_headers(&rows);
    write_table(&headers, &rows, writer)?;
    tracing::debug!(rows = rows.len(), columns = headers.len(), "exported cases");
    Ok(rows.len())
}

/// Exports to a string.
pub fn export_to_string(cases: &[CaseRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    export_cases(cases, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ExportError::Shape(e.to_string()))
}

/// Exports to a file, replacing it.
pub fn export_to_path(cases: &[CaseRecord], path: &Path) -> Result<usize> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let count = export_cases(cases, file)?;
    tracing::info!(path = %path.display(), rows = count, "wrote export");
    Ok(count)
}
