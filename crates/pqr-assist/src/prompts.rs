//! Prompt text and response schemas.

use std::fmt::Write;

use pqr_model::{CaseRecord, Catalog, NOT_AVAILABLE};
use serde_json::{Value, json};

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}

fn extra<'a>(case: &'a CaseRecord, key: &str) -> &'a str {
    case.extra.get(key).map(String::as_str).map_or(NOT_AVAILABLE, or_na)
}

/// The shared block describing a case.
fn case_details(case: &CaseRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "SN: {}", or_na(&case.sn));
    let _ = writeln!(out, "CUN: {}", or_na(&case.cun));
    let _ = writeln!(out, "Fecha Radicado: {}", or_na(&case.filing_date));
    let _ = writeln!(out, "Nombre Cliente: {}", or_na(&case.customer_name));
    let _ = writeln!(out, "Estado: {}", extra(case, "Estado"));
    for level in 1..=5 {
        let key = format!("Nivel_{level}");
        let _ = writeln!(out, "Nivel {level}: {}", extra(case, &key));
    }
    let _ = writeln!(out, "Observaciones Iniciales (obs): {}", or_na(&case.observations));
    let _ = write!(out, "Tipo de Operación: {}", extra(case, "Tipo_Operacion"));
    out
}

pub(crate) fn analysis(case: &CaseRecord) -> (String, Value) {
    let prompt = format!(
        "Analiza el siguiente caso de reclamo y proporciona:\n\
         1. Un \"Analisis de la IA\" conciso (máximo 200 palabras).\n\
         2. Una \"Categoria del reclamo\" específica y descriptiva (ej. \"Error en facturación \
         servicio internet\", \"Falla técnica línea telefónica\"). Evita categorías genéricas \
         de una sola palabra.\n\n\
         Detalles del Caso:\n{}",
        case_details(case)
    );
    let schema = json!({
        "type": "OBJECT",
        "properties": {
            "analisis_ia": {"type": "STRING"},
            "categoria_reclamo": {"type": "STRING"}
        },
        "propertyOrdering": ["analisis_ia", "categoria_reclamo"]
    });
    (prompt, schema)
}

pub(crate) fn priority(case: &CaseRecord, catalog: &Catalog) -> (String, Value) {
    let options: Vec<&str> = catalog.priorities.iter().map(|p| p.as_str()).collect();
    let prompt = format!(
        "Asigna una prioridad al siguiente reclamo. Responde únicamente con una de: {}.\n\n\
         Detalles del Caso:\n{}",
        options.join(", "),
        case_details(case)
    );
    let schema = json!({
        "type": "OBJECT",
        "properties": {"prioridad": {"type": "STRING", "enum": options}}
    });
    (prompt, schema)
}

pub(crate) fn summary(case: &CaseRecord) -> String {
    let mut history = String::new();
    for entry in &case.observation_log {
        let _ = writeln!(history, "- {}: {}", entry.timestamp.format("%Y-%m-%d %H:%M"), entry.text);
    }
    format!(
        "Resume los hechos principales del siguiente reclamo en un párrafo breve, \
         en tono neutral y sin inventar datos.\n\n\
         Detalles del Caso:\n{}\n\nAnálisis previo: {}\n\nHistorial de observaciones:\n{}",
        case_details(case),
        or_na(&case.ai_analysis),
        if history.is_empty() { NOT_AVAILABLE } else { history.as_str() }
    )
}

pub(crate) fn response_projection(case: &CaseRecord) -> String {
    format!(
        "Redacta una proyección de respuesta formal al cliente para el siguiente reclamo. \
         Dirígete al cliente por su nombre, resume el caso, explica las acciones tomadas \
         y cierra con los canales de contacto. No incluyas datos que no aparezcan en el caso.\n\n\
         Detalles del Caso:\n{}\n\nCategoría: {}\nResumen: {}\nAnálisis: {}",
        case_details(case),
        or_na(&case.category),
        or_na(&case.ai_summary),
        or_na(&case.ai_analysis)
    )
}

pub(crate) fn escalation(case: &CaseRecord, catalog: &Catalog) -> (String, Value) {
    let mut areas = String::new();
    for area in &catalog.escalation_areas {
        let _ = writeln!(areas, "- {}: {}", area.name, area.reasons.join("; "));
    }
    let prompt = format!(
        "Sugiere el área y el motivo de escalamiento más adecuados para el siguiente reclamo. \
         Elige exactamente un área y uno de sus motivos de esta lista:\n{areas}\n\
         Detalles del Caso:\n{}\n\nAnálisis: {}",
        case_details(case),
        or_na(&case.ai_analysis)
    );
    let schema = json!({
        "type": "OBJECT",
        "properties": {
            "area": {"type": "STRING"},
            "motivo": {"type": "STRING"}
        },
        "propertyOrdering": ["area", "motivo"]
    });
    (prompt, schema)
}

pub(crate) const TRANSCRIPTION: &str = "Transcribe el texto completo del documento adjunto. \
    Conserva el orden y los números tal como aparecen; no agregues comentarios.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_render_as_na() {
        let case = CaseRecord::new("9");
        let (prompt, schema) = analysis(&case);
        assert!(prompt.contains("SN: 9"));
        assert!(prompt.contains("Nombre Cliente: N/A"));
        assert!(prompt.contains("Nivel 3: N/A"));
        assert_eq!(schema["propertyOrdering"][1], "categoria_reclamo");
    }

    #[test]
    fn test_escalation_prompt_lists_catalog() {
        let catalog = Catalog::default();
        let (prompt, _) = escalation(&CaseRecord::new("1"), &catalog);
        for area in &catalog.escalation_areas {
            assert!(prompt.contains(&area.name));
        }
    }
}
