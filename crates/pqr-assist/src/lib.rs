//! AI assistance for PQR cases.
//!
//! A single backend endpoint generates text from a prompt. When a response
//! schema is supplied, the returned text is a JSON document matching it.
//!
//! - [`AiBackend`]: the seam; [`HttpBackend`] talks to the real proxy
//! - [`flows`]: one function per assisted action (analysis, summary,
//!   response projection, escalation suggestion, priority, transcription)

mod backend;
mod error;
pub mod flows;
mod prompts;

pub use backend::{AiBackend, AiRequest, HttpBackend, ImagePayload};
pub use error::{AssistError, Result};
pub use flows::{
    CaseAnalysis, EscalationSuggestion, generate_analysis, generate_summary, project_response,
    suggest_escalation, suggest_priority, transcribe_document,
};
