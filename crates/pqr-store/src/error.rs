//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::DocumentId;

/// Case store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A batch operation was rejected; nothing was written.
    #[error("batch rejected at operation {index}: {reason}")]
    BatchRejected { index: usize, reason: String },

    /// Lookup by id found nothing.
    #[error("document not found: {id}")]
    DocumentNotFound { id: DocumentId },

    /// File I/O error.
    #[error("failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The collection file is not a case collection.
    #[error("invalid collection file: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    /// Collection written by a newer schema.
    #[error("collection version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    #[error("failed to serialize case collection")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Temp file written but could not replace the target.
    #[error("failed to complete write of {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Lock held by a thread that panicked.
    #[error("store lock poisoned")]
    Poisoned,

    /// Injected or backend-specific failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::BatchRejected { reason, .. } => {
                format!("No changes were saved: {reason}")
            }
            Self::DocumentNotFound { id } => format!("Case {id} no longer exists"),
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the file at {}", operation, path.display()),
            Self::InvalidFormat { path, reason } => format!(
                "The file at {} is not a valid case collection: {}",
                path.display(),
                reason
            ),
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => format!(
                "This case collection was written by a newer version \
                (file version {found}, this version supports up to {max_supported})."
            ),
            Self::Serialization { .. } => "An error occurred while saving the cases.".to_string(),
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the cases to {}. Please check disk space and permissions.",
                target_path.display()
            ),
            Self::Poisoned => "The case store is in an inconsistent state.".to_string(),
            Self::Unavailable(reason) => format!("The case store is unavailable: {reason}"),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the store directory exists and is readable.".into())
                } else {
                    Some("Check that you have permission to write to the store directory.".into())
                }
            }
            Self::InvalidFormat { .. } => Some("Restore the collection from a backup.".into()),
            Self::UnsupportedVersion { .. } => Some("Update to the latest version.".into()),
            Self::AtomicWriteFailed { .. } => Some("Free up disk space and retry.".into()),
            Self::BatchRejected { .. } | Self::DocumentNotFound { .. } => {
                Some("Reload the case list and retry.".into())
            }
            Self::Serialization { .. } | Self::Poisoned | Self::Unavailable(_) => None,
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
