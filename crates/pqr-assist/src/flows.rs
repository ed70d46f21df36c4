//! Assisted actions.
//!
//! Each flow builds its prompt, calls the backend once and interprets the
//! answer. None of them writes to a case; callers decide what to store.

use pqr_model::{CaseRecord, Catalog, Priority};
use serde::Deserialize;

use crate::backend::{AiBackend, AiRequest, ImagePayload};
use crate::error::{AssistError, Result};
use crate::prompts;

/// Analysis text and category for a case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaseAnalysis {
    #[serde(rename = "analisis_ia")]
    pub analysis: String,
    #[serde(rename = "categoria_reclamo")]
    pub category: String,
}

/// Suggested escalation target, already checked against the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EscalationSuggestion {
    pub area: String,
    #[serde(rename = "motivo")]
    pub reason: String,
}

#[derive(Deserialize)]
struct PriorityAnswer {
    #[serde(rename = "prioridad")]
    priority: String,
}

fn structured<T: for<'de> Deserialize<'de>>(backend: &dyn AiBackend, request: AiRequest) -> Result<T> {
    let text = backend.generate(&request)?;
    // Some models wrap JSON in a fenced block.
    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    Ok(serde_json::from_str(trimmed)?)
}

/// Generates the analysis and category of a case.
pub fn generate_analysis(backend: &dyn AiBackend, case: &CaseRecord) -> Result<CaseAnalysis> {
    let (prompt, schema) = prompts::analysis(case);
    let analysis: CaseAnalysis = structured(backend, AiRequest::structured(prompt, schema))?;
    tracing::debug!(sn = %case.sn, category = %analysis.category, "generated analysis");
    Ok(analysis)
}

/// Suggests a priority from the catalogue.
pub fn suggest_priority(
    backend: &dyn AiBackend,
    catalog: &Catalog,
    case: &CaseRecord,
) -> Result<Priority> {
    let (prompt, schema) = prompts::priority(case, catalog);
    let answer: PriorityAnswer = structured(backend, AiRequest::structured(prompt, schema))?;
    answer
        .priority
        .parse::<Priority>()
        .ok()
        .filter(|p| catalog.has_priority(*p))
        .ok_or(AssistError::UnknownSuggestion {
            kind: "priority",
            value: answer.priority,
        })
}

/// Summarises the facts of a case.
pub fn generate_summary(backend: &dyn AiBackend, case: &CaseRecord) -> Result<String> {
    let text = backend.generate(&AiRequest::text(prompts::summary(case)))?;
    Ok(text.trim().to_string())
}

/// Drafts the formal reply to the customer.
pub fn project_response(backend: &dyn AiBackend, case: &CaseRecord) -> Result<String> {
    let text = backend.generate(&AiRequest::text(prompts::response_projection(case)))?;
    Ok(text.trim().to_string())
}

/// Suggests an escalation area and reason.
///
/// Suggestions outside the catalogue are rejected rather than stored.
pub fn suggest_escalation(
    backend: &dyn AiBackend,
    catalog: &Catalog,
    case: &CaseRecord,
) -> Result<EscalationSuggestion> {
    let (prompt, schema) = prompts::escalation(case, catalog);
    let suggestion: EscalationSuggestion =
        structured(backend, AiRequest::structured(prompt, schema))?;
    if !catalog.is_valid_escalation(&suggestion.area, &suggestion.reason) {
        return Err(AssistError::UnknownSuggestion {
            kind: "escalation",
            value: format!("{} / {}", suggestion.area, suggestion.reason),
        });
    }
    Ok(suggestion)
}

/// Transcribes an attached document image to text.
pub fn transcribe_document(backend: &dyn AiBackend, mime_type: &str, bytes: &[u8]) -> Result<String> {
    let request = AiRequest::text(prompts::TRANSCRIPTION)
        .with_image(ImagePayload::from_bytes(mime_type, bytes));
    let text = backend.generate(&request)?;
    tracing::debug!(mime_type, chars = text.len(), "transcribed document");
    Ok(text.trim().to_string())
}
