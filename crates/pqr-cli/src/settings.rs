//! Settings file.
//!
//! Stored as TOML in the platform config directory:
//! - Linux: ~/.config/pqr-tracker/settings.toml
//! - macOS: ~/Library/Application Support/co.pqr-tracker.PQR Tracker/
//! - Windows: %APPDATA%/pqr-tracker/config/
//!
//! Case data goes to the matching data directory unless `store.root` is set.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use pqr_lifecycle::{POLL_INTERVAL, STUCK_THRESHOLD_MINUTES};
use pqr_model::Catalog;
use serde::{Deserialize, Serialize};

const APP_QUALIFIER: &str = "co";
const APP_ORG: &str = "pqr-tracker";
const APP_NAME: &str = "PQR Tracker";
const CONFIG_FILENAME: &str = "settings.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub assistant: AssistantSettings,
    pub monitor: MonitorSettings,
    /// Optional catalogue override (TOML).
    pub catalog_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Directory holding the `artifacts/` tree.
    pub root: Option<PathBuf>,
    pub app_id: String,
    /// Operator id; also selects the per-user collection.
    pub user_id: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            root: None,
            app_id: "pqr-tracker".to_string(),
            user_id: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    /// AI backend endpoint; AI features are off when unset.
    pub url: Option<String>,
    pub enrich_on_import: bool,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            url: None,
            enrich_on_import: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub stuck_threshold_minutes: i64,
    pub poll_interval_secs: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            stuck_threshold_minutes: STUCK_THRESHOLD_MINUTES,
            poll_interval_secs: POLL_INTERVAL.as_secs(),
        }
    }
}

impl MonitorSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Settings {
    /// Store root: configured, else the platform data directory, else `./pqr-data`.
    pub fn store_root(&self) -> PathBuf {
        if let Some(root) = &self.store.root {
            return root.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("pqr-data"))
    }

    pub fn catalog(&self) -> Result<Catalog> {
        let Some(path) = &self.catalog_file else {
            return Ok(Catalog::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("read catalogue {}", path.display()))?;
        Catalog::from_toml_str(&content).with_context(|| format!("parse catalogue {}", path.display()))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
}

/// Default settings file location.
pub fn settings_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Loads settings.
///
/// An explicit path must exist and parse. The default location falls back
/// to defaults when the file is missing or broken.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read settings {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("parse settings {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded settings");
        return Ok(settings);
    }

    let Some(path) = settings_path() else {
        tracing::warn!("could not determine settings path, using defaults");
        return Ok(Settings::default());
    };
    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                tracing::info!(path = %path.display(), "loaded settings");
                Ok(settings)
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "invalid settings file, using defaults");
                Ok(Settings::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            Ok(Settings::default())
        }
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "unreadable settings file, using defaults");
            Ok(Settings::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut settings = Settings::default();
        settings.store.user_id = "ana".to_string();
        settings.assistant.url = Some("http://localhost:8080/generate".to_string());
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: Settings = toml::from_str("[monitor]\nstuck_threshold_minutes = 60\n").unwrap();
        assert_eq!(parsed.monitor.stuck_threshold_minutes, 60);
        assert_eq!(parsed.monitor.poll_interval_secs, 30);
        assert!(parsed.assistant.enrich_on_import);
        assert_eq!(parsed.store.app_id, "pqr-tracker");
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_settings(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_default_catalog_without_file() {
        let catalog = Settings::default().catalog().unwrap();
        assert!(catalog.has_status(pqr_model::CaseStatus::Pendiente));
    }
}
