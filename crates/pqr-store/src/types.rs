//! Store-level identifiers and documents.

use std::fmt;
use std::path::PathBuf;

use pqr_model::CaseRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque document id assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Mints a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A case together with its store id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCase {
    pub id: DocumentId,
    pub record: CaseRecord,
}

impl StoredCase {
    pub fn new(id: DocumentId, record: CaseRecord) -> Self {
        Self { id, record }
    }
}

/// Address of a case collection: an application id and a per-user namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPath {
    pub app_id: String,
    pub user_id: String,
}

impl CollectionPath {
    pub fn new(app_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            user_id: user_id.into(),
        }
    }

    /// Path of the collection file relative to the store root.
    pub fn relative_file(&self) -> PathBuf {
        PathBuf::from("artifacts")
            .join(sanitize(&self.app_id))
            .join("users")
            .join(sanitize(&self.user_id))
            .join("cases.json")
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "artifacts/{}/users/{}/cases", self.app_id, self.user_id)
    }
}

/// Keeps path components to a safe character set.
fn sanitize(component: &str) -> String {
    let cleaned: String = component
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "default".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(DocumentId::generate(), DocumentId::generate());
    }

    #[test]
    fn test_collection_file_is_namespaced() {
        let path = CollectionPath::new("pqr-app", "user/../x");
        assert_eq!(
            path.relative_file(),
            PathBuf::from("artifacts/pqr-app/users/user____x/cases.json")
        );
    }
}
