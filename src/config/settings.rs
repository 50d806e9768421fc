//! User settings for medlog
//!
//! Manages user preferences: where exports land, which template to use and
//! the default overflow strategy for busy days.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::MedLogPaths;
use crate::error::MedLogError;
use crate::layout::LayoutStrategy;
use crate::storage::file_io::write_json_atomic;

/// User settings for medlog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Folder exports are written to when no output is given.
    /// Falls back to the patient's own exports directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_export_folder: Option<PathBuf>,

    /// Custom template document; the built-in template is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_path: Option<PathBuf>,

    /// Overflow handling when a day has more than three administrations
    #[serde(default)]
    pub default_strategy: LayoutStrategy,

    /// Whether exports also produce a PDF by default
    #[serde(default = "default_create_pdf")]
    pub create_pdf: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_create_pdf() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_export_folder: None,
            template_path: None,
            default_strategy: LayoutStrategy::default(),
            create_pdf: default_create_pdf(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &MedLogPaths) -> Result<Self, MedLogError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| MedLogError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                MedLogError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &MedLogPaths) -> Result<(), MedLogError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Set the default export folder; the folder must already exist
    pub fn set_default_export_folder(&mut self, folder: PathBuf) -> Result<(), MedLogError> {
        if !folder.is_dir() {
            return Err(MedLogError::Validation(format!(
                "Export folder does not exist: {}",
                folder.display()
            )));
        }
        self.default_export_folder = Some(folder);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.default_strategy, LayoutStrategy::ExtendedTable);
        assert!(settings.create_pdf);
        assert!(settings.template_path.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MedLogPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.default_strategy = LayoutStrategy::ContinuationPages;
        settings.create_pdf = false;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_strategy, LayoutStrategy::ContinuationPages);
        assert!(!loaded.create_pdf);
    }

    #[test]
    fn test_corrupt_settings_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MedLogPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{ nope").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, MedLogError::Config(_)));
    }

    #[test]
    fn test_export_folder_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let mut settings = Settings::default();

        let missing = temp_dir.path().join("missing");
        assert!(settings.set_default_export_folder(missing).is_err());

        settings
            .set_default_export_folder(temp_dir.path().to_path_buf())
            .unwrap();
        assert_eq!(
            settings.default_export_folder.as_deref(),
            Some(temp_dir.path())
        );
    }
}
