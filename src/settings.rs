//! User settings stored as settings.json in the app data directory

use crate::constants::{DEFAULT_LIST_MAX_FRACTION, RECORDS_DIR_NAME};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Paths
    pub records_root: Option<String>,

    // View
    pub list_max_fraction: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            records_root: None,
            list_max_fraction: DEFAULT_LIST_MAX_FRACTION,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    pub fn records_root_or_default(&self) -> PathBuf {
        self.records_root
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_records_root)
    }
}

/// `<documents>/DermaScanRecords`
pub fn default_records_root() -> PathBuf {
    dirs::document_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(RECORDS_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let settings = Settings::load(dir.path());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.list_max_fraction, DEFAULT_LIST_MAX_FRACTION);
    }

    #[test]
    fn invalid_json_gives_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("settings.json"), r#"{"records_root":"/data/scans"}"#).unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.records_root_or_default(), PathBuf::from("/data/scans"));
        assert_eq!(settings.list_max_fraction, DEFAULT_LIST_MAX_FRACTION);
    }

    #[test]
    fn save_and_reload() {
        let dir = tempdir().expect("Failed to create temp dir");
        let settings = Settings {
            window_w: Some(480.0),
            window_h: Some(760.0),
            list_max_fraction: 0.5,
            ..Default::default()
        };
        settings.save(dir.path());
        assert_eq!(Settings::load(dir.path()), settings);
    }

    #[test]
    fn default_root_ends_with_records_dir() {
        let settings = Settings::default();
        assert!(settings.records_root_or_default().ends_with(RECORDS_DIR_NAME));
    }
}
