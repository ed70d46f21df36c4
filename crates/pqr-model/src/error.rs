//! Error types for the case model.

use thiserror::Error;

/// Errors raised while parsing model values or loading the catalogue.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Status text does not match any known case status.
    #[error("unknown case status: {0}")]
    UnknownStatus(String),

    /// Priority text does not match any known priority.
    #[error("unknown priority: {0}")]
    UnknownPriority(String),

    /// Adjustment ticket state is neither `Pendiente` nor `Aplicado`.
    #[error("unknown ticket status: {0}")]
    UnknownTicketStatus(String),

    /// Gate name does not match any known checkbox gate.
    #[error("unknown gate: {0}")]
    UnknownGate(String),

    /// Field name does not match any known dependent field.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Catalogue file could not be parsed.
    #[error("invalid catalogue: {0}")]
    Catalog(#[from] toml::de::Error),

    /// Catalogue parsed but is internally inconsistent.
    #[error("inconsistent catalogue: {0}")]
    CatalogConsistency(String),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::UnknownStatus("Cerrado".to_string());
        assert_eq!(err.to_string(), "unknown case status: Cerrado");
    }
}
