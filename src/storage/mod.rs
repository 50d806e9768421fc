//! Storage layer for medlog
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. Each repository owns its own files; no two repositories write
//! the same file.

pub mod cards;
pub mod file_io;
pub mod images;
pub mod logs;
pub mod profiles;

pub use cards::CardRepository;
pub use file_io::{read_json, read_json_optional, write_json_atomic};
pub use images::{validate_image, ImageInfo};
pub use logs::LogRepository;
pub use profiles::ProfileRepository;

use crate::config::paths::MedLogPaths;
use crate::error::MedLogError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: MedLogPaths,
    pub profiles: ProfileRepository,
    pub logs: LogRepository,
    pub cards: CardRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: MedLogPaths) -> Result<Self, MedLogError> {
        paths.ensure_directories()?;

        Ok(Self {
            profiles: ProfileRepository::new(paths.profiles_file()),
            logs: LogRepository::new(paths.clone()),
            cards: CardRepository::new(paths.clone()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &MedLogPaths {
        &self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MedLogPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").join("patients").exists());
        assert!(storage.profiles.list().unwrap().is_empty());
        assert!(storage.logs.list_for_profile("p1").unwrap().is_empty());
    }
}
