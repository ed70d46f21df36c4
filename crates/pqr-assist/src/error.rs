//! Error types for AI assistance.

use thiserror::Error;

/// Errors from the AI backend or from interpreting its answer.
#[derive(Debug, Error)]
pub enum AssistError {
    /// Request could not be sent or the body could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// Backend answered with a non-success status. `message` is the
    /// backend's own `error` text when it supplied one.
    #[error("{message}")]
    Backend { status: u16, message: String },

    /// The generated text did not match the requested schema.
    #[error("unexpected AI response: {0}")]
    InvalidResponse(String),

    /// The answer named a value outside the catalogue.
    #[error("AI suggested an unknown {kind}: {value}")]
    UnknownSuggestion { kind: &'static str, value: String },
}

impl AssistError {
    /// Returns a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Could not reach the AI service.".to_string(),
            Self::Backend { message, .. } => format!("AI service error: {message}"),
            Self::InvalidResponse(_) | Self::UnknownSuggestion { .. } => {
                "The AI service returned an unusable answer.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for AssistError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AssistError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

/// Result type alias for assist operations.
pub type Result<T> = std::result::Result<T, AssistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_is_surfaced_verbatim() {
        let err = AssistError::Backend {
            status: 500,
            message: "cuota agotada".to_string(),
        };
        assert_eq!(err.to_string(), "cuota agotada");
        assert!(err.user_message().contains("cuota agotada"));
    }
}
