//! Path management for medlog
//!
//! `MedLogPaths` is built once at startup and handed to every store and to
//! the exporter, so no component resolves locations on its own.
//!
//! ## Path Resolution Order
//!
//! 1. `MEDLOG_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory joined with `medlog`
//!    (`~/.config/medlog`, `~/Library/Application Support/medlog`, `%APPDATA%\medlog`)
//!
//! ## Layout
//!
//! ```text
//! <base>/config.json
//! <base>/data/profiles.json
//! <base>/data/patients/<profile_id>/logs/<medicine>_<month>.json
//! <base>/data/patients/<profile_id>/medication_cards.json
//! <base>/data/patients/<profile_id>/images/medications/<medicine>/
//! <base>/data/patients/<profile_id>/exports/
//! ```

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::MedLogError;
use crate::models::safe_segment;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "MEDLOG_DATA_DIR";

/// Manages all paths used by medlog
#[derive(Debug, Clone)]
pub struct MedLogPaths {
    /// Base directory for all medlog data
    base_dir: PathBuf,
}

impl MedLogPaths {
    /// Create a new MedLogPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// override variable is not set.
    pub fn new() -> Result<Self, MedLogError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create MedLogPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to profiles.json
    pub fn profiles_file(&self) -> PathBuf {
        self.data_dir().join("profiles.json")
    }

    /// Root of all per-patient directories
    pub fn patients_dir(&self) -> PathBuf {
        self.data_dir().join("patients")
    }

    pub fn patient_dir(&self, profile_id: &str) -> PathBuf {
        self.patients_dir().join(profile_id)
    }

    /// Directory holding one JSON file per (medicine, month) log
    pub fn logs_dir(&self, profile_id: &str) -> PathBuf {
        self.patient_dir(profile_id).join("logs")
    }

    /// Path of a single medication log file
    pub fn log_file(&self, profile_id: &str, medicine_name: &str, month_year: &str) -> PathBuf {
        self.logs_dir(profile_id).join(format!(
            "{}_{}.json",
            safe_segment(medicine_name),
            safe_segment(month_year)
        ))
    }

    /// Get the path to a patient's medication_cards.json
    pub fn cards_file(&self, profile_id: &str) -> PathBuf {
        self.patient_dir(profile_id).join("medication_cards.json")
    }

    /// Directory holding the images attached to one medication card
    pub fn card_images_dir(&self, profile_id: &str, medicine_name: &str) -> PathBuf {
        self.patient_dir(profile_id)
            .join("images")
            .join("medications")
            .join(safe_segment(medicine_name))
    }

    /// Default export directory for a patient
    pub fn exports_dir(&self, profile_id: &str) -> PathBuf {
        self.patient_dir(profile_id).join("exports")
    }

    /// Ensure the base, data and patients directories exist
    pub fn ensure_directories(&self) -> Result<(), MedLogError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| MedLogError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.patients_dir())
            .map_err(|e| MedLogError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

/// Resolve the default base directory from the platform config location
fn resolve_default_path() -> Result<PathBuf, MedLogError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| MedLogError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("medlog"))
}
