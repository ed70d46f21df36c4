//! Flow behaviour against a scripted backend.

use std::sync::Mutex;

use pqr_assist::{
    AiBackend, AiRequest, AssistError, generate_analysis, generate_summary, suggest_escalation,
    suggest_priority, transcribe_document,
};
use pqr_model::{CaseRecord, Catalog, Priority};

/// Replies with a fixed answer and records every request.
struct Scripted {
    reply: std::result::Result<String, (u16, String)>,
    seen: Mutex<Vec<AiRequest>>,
}

impl Scripted {
    fn ok(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn failing(status: u16, message: &str) -> Self {
        Self {
            reply: Err((status, message.to_string())),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn last(&self) -> AiRequest {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

impl AiBackend for Scripted {
    fn generate(&self, request: &AiRequest) -> pqr_assist::Result<String> {
        self.seen.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err((status, message)) => Err(AssistError::Backend {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

fn case() -> CaseRecord {
    let mut case = CaseRecord::new("4501");
    case.customer_name = "MARIA LOPEZ".to_string();
    case.observations = "Cobro doble en la factura de marzo".to_string();
    case
}

#[test]
fn test_analysis_parses_structured_answer() {
    let backend = Scripted::ok(
        r#"{"analisis_ia": "Cobro duplicado", "categoria_reclamo": "Error en facturación servicio internet"}"#,
    );
    let analysis = generate_analysis(&backend, &case()).unwrap();
    assert_eq!(analysis.category, "Error en facturación servicio internet");
    let request = backend.last();
    assert!(request.response_schema.is_some());
    assert!(request.prompt.contains("MARIA LOPEZ"));
}

#[test]
fn test_fenced_json_is_accepted() {
    let backend = Scripted::ok("```json\n{\"prioridad\": \"Alta\"}\n```");
    let priority = suggest_priority(&backend, &Catalog::default(), &case()).unwrap();
    assert_eq!(priority, Priority::Alta);
}

#[test]
fn test_unknown_priority_rejected() {
    let backend = Scripted::ok(r#"{"prioridad": "Urgentísima"}"#);
    let result = suggest_priority(&backend, &Catalog::default(), &case());
    assert!(matches!(result, Err(AssistError::UnknownSuggestion { kind: "priority", .. })));
}

#[test]
fn test_escalation_outside_catalog_rejected() {
    let backend = Scripted::ok(r#"{"area": "Legal", "motivo": "Falla masiva"}"#);
    let result = suggest_escalation(&backend, &Catalog::default(), &case());
    assert!(matches!(result, Err(AssistError::UnknownSuggestion { .. })));

    let backend = Scripted::ok(r#"{"area": "Legal", "motivo": "Derecho de petición"}"#);
    let suggestion = suggest_escalation(&backend, &Catalog::default(), &case()).unwrap();
    assert_eq!(suggestion.area, "Legal");
}

#[test]
fn test_backend_error_propagates() {
    let backend = Scripted::failing(503, "modelo no disponible");
    let err = generate_summary(&backend, &case()).unwrap_err();
    assert_eq!(err.to_string(), "modelo no disponible");
}

#[test]
fn test_malformed_answer_is_invalid_response() {
    let backend = Scripted::ok("no es json");
    let result = generate_analysis(&backend, &case());
    assert!(matches!(result, Err(AssistError::InvalidResponse(_))));
}

#[test]
fn test_transcription_sends_image() {
    let backend = Scripted::ok("  Texto del documento \n");
    let text = transcribe_document(&backend, "image/jpeg", &[1, 2, 3]).unwrap();
    assert_eq!(text, "Texto del documento");
    let image = backend.last().image.unwrap();
    assert_eq!(image.mime_type, "image/jpeg");
    assert_eq!(image.data, "AQID");
}
