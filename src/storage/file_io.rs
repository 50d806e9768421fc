//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::MedLogError;

/// Suffix carried by in-flight temp files
const TEMP_SUFFIX: &str = ".tmp";

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, MedLogError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    Ok(read_json_optional(path)?.unwrap_or_default())
}

/// Read JSON from a file, returning `None` if the file doesn't exist
///
/// A file that exists but cannot be parsed is reported as `CorruptData`.
pub fn read_json_optional<T, P>(path: P) -> Result<Option<T>, MedLogError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(MedLogError::Io(format!(
                "Failed to open {}: {}",
                path.display(),
                e
            )))
        }
    };

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map(Some).map_err(|e| {
        MedLogError::CorruptData(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// The temp file lives in the target's directory so the rename never
/// crosses filesystems. On any failure the temp file is removed and the
/// target is left exactly as it was.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), MedLogError>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            MedLogError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path);

    let result = write_temp(&temp_path, data).and_then(|()| {
        fs::rename(&temp_path, path)
            .map_err(|e| MedLogError::Io(format!("Failed to rename temp file: {}", e)))
    });

    match result {
        Ok(()) => {
            debug!(path = %path.display(), "wrote file");
            Ok(())
        }
        Err(err) => {
            remove_temp_file(&temp_path);
            Err(err)
        }
    }
}

/// Unique temp path next to `path`, e.g. `melatonin.json.3f2a….tmp`
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data".to_string());
    path.with_file_name(format!(
        "{}.{}{}",
        file_name,
        Uuid::new_v4().simple(),
        TEMP_SUFFIX
    ))
}

fn write_temp<T>(temp_path: &Path, data: &T) -> Result<(), MedLogError>
where
    T: Serialize + ?Sized,
{
    let file = File::create(temp_path)
        .map_err(|e| MedLogError::Io(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| MedLogError::Json(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| MedLogError::Io(format!("Failed to flush data: {}", e)))?;

    // Sync to disk before rename
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| MedLogError::Io(format!("Failed to sync data: {}", e)))?;

    Ok(())
}

/// Best-effort temp cleanup; a leftover temp file never masks the real error
fn remove_temp_file(temp_path: &Path) {
    match fs::remove_file(temp_path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %temp_path.display(), error = %e, "failed to remove temp file"),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::{Error as _, SerializeStruct, Serializer};
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    /// Serializes its first field, then fails mid-write
    struct FailsMidWrite;

    impl Serialize for FailsMidWrite {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut state = serializer.serialize_struct("FailsMidWrite", 2)?;
            state.serialize_field("name", &"x".repeat(64 * 1024))?;
            Err(S::Error::custom("disk full"))
        }
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let data: TestData = read_json(&path).unwrap();
        assert_eq!(data, TestData::default());

        let missing: Option<TestData> = read_json_optional(&path).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        write_json_atomic(&path, &data).unwrap();
        let loaded: TestData = read_json(&path).unwrap();
        assert_eq!(data, loaded);
    }

    #[test]
    fn test_pretty_two_space_indent_and_unicode_preserved() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        let data = TestData {
            name: "Zoë".to_string(),
            value: 1,
        };
        write_json_atomic(&path, &data).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"name\": \"Zoë\""));
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        write_json_atomic(&path, &TestData::default()).unwrap();

        assert_eq!(dir_entries(temp_dir.path()), vec!["test.json".to_string()]);
    }

    #[test]
    fn test_failed_write_preserves_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        let original = TestData {
            name: "original".to_string(),
            value: 7,
        };
        write_json_atomic(&path, &original).unwrap();
        let before = fs::read(&path).unwrap();

        let err = write_json_atomic(&path, &FailsMidWrite).unwrap_err();
        assert!(matches!(err, MedLogError::Json(_)));

        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(dir_entries(temp_dir.path()), vec!["test.json".to_string()]);
    }

    #[test]
    fn test_failed_write_preserves_absence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        assert!(write_json_atomic(&path, &FailsMidWrite).is_err());

        assert!(!path.exists());
        assert!(dir_entries(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("test.json");

        write_json_atomic(&path, &TestData::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "not json at all").unwrap();

        let err = read_json_optional::<TestData, _>(&path).unwrap_err();
        assert!(matches!(err, MedLogError::CorruptData(_)));
    }

}
