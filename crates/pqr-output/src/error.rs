//! Export error types.

use std::path::PathBuf;

use thiserror::Error;

/// Export operation error.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create export file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush export: {0}")]
    Flush(#[from] std::io::Error),

    #[error("failed to serialize case: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A case could not be flattened into a row.
    #[error("unexpected case shape: {0}")]
    Shape(String),
}

impl ExportError {
    /// Returns a user-friendly message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io { path, .. } => format!("No se pudo crear el archivo {}", path.display()),
            Self::Csv(_) | Self::Flush(_) => "Error al escribir el CSV".to_string(),
            Self::Serialization(_) | Self::Shape(_) => {
                "Un caso no se pudo convertir a fila".to_string()
            }
        }
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
