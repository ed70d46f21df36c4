//! Lifecycle error types.

use pqr_assist::AssistError;
use pqr_model::{CaseStatus, DependentField, Gate, ModelError};
use pqr_store::{DocumentId, StoreError};
use thiserror::Error;

/// Errors raised by lifecycle operations.
///
/// Every variant aborts the operation before anything is written.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A required value for the requested action is missing or invalid.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No case with this store id.
    #[error("case not found: {0}")]
    NotFound(DocumentId),

    /// No case with this business key.
    #[error("no case with SN {0}")]
    UnknownSn(String),

    /// Manual entry of an SN that already exists.
    #[error("a case with SN {0} already exists")]
    DuplicateSn(String),

    #[error("cannot move a case from {from} to {to}")]
    InvalidTransition { from: CaseStatus, to: CaseStatus },

    /// Dependent field edited while its gate is off.
    #[error("{field} requires {gate} to be enabled")]
    GateOff { field: DependentField, gate: Gate },

    /// Value not present in the catalogue.
    #[error("'{value}' is not a valid {field}")]
    NotInCatalog { field: &'static str, value: String },

    /// Field cannot be edited directly.
    #[error("field {0} cannot be edited")]
    NotEditable(String),

    /// An AI action was requested without a configured backend.
    #[error("no AI backend configured")]
    NoAssistant,

    /// One case of a mass operation failed; nothing was written.
    #[error("case {sn}: {source}")]
    MassAborted {
        sn: String,
        #[source]
        source: Box<LifecycleError>,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Assist(#[from] AssistError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl LifecycleError {
    /// The single free-text notification shown to the operator.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::NotFound(_) => "The case no longer exists. Reload the case list.".to_string(),
            Self::UnknownSn(sn) => format!("No case with SN {sn}."),
            Self::DuplicateSn(sn) => format!("A case with SN {sn} already exists."),
            Self::InvalidTransition { from, to } => {
                format!("A case in '{from}' cannot be moved to '{to}'.")
            }
            Self::GateOff { field, gate } => {
                format!("Enable {gate} before filling in {field}.")
            }
            Self::NotInCatalog { field, value } => format!("'{value}' is not a valid {field}."),
            Self::NotEditable(key) => format!("The field {key} cannot be edited directly."),
            Self::NoAssistant => "AI features are not configured.".to_string(),
            Self::MassAborted { sn, source } => {
                format!("No cases were changed. Case {sn}: {}", source.user_message())
            }
            Self::Store(err) => err.user_message(),
            Self::Assist(err) => err.user_message(),
            Self::Model(err) => err.to_string(),
        }
    }
}

/// Result type alias for lifecycle operations.
pub type Result<T> = std::result::Result<T, LifecycleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mass_abort_message_names_case() {
        let err = LifecycleError::MassAborted {
            sn: "77".to_string(),
            source: Box::new(LifecycleError::Validation("Falta numeroOrdenBaja".to_string())),
        };
        assert_eq!(
            err.user_message(),
            "No cases were changed. Case 77: Falta numeroOrdenBaja"
        );
    }
}
