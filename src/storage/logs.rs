//! Medication log repository
//!
//! One JSON file per `(profile_id, medicine_name, month_year)`. Every
//! mutation loads the current file, changes it and writes it back through
//! `write_json_atomic`; nothing is cached between calls.

use std::collections::BTreeMap;
use std::fs;
use std::io;

use tracing::info;

use crate::config::paths::MedLogPaths;
use crate::error::{MedLogError, MedLogResult};
use crate::models::{AdministrationEntry, MedicationInfo, MedicationLog};

use super::file_io::{read_json_optional, write_json_atomic};

/// Repository for medication log persistence
pub struct LogRepository {
    paths: MedLogPaths,
}

impl LogRepository {
    /// Create a new log repository
    pub fn new(paths: MedLogPaths) -> Self {
        Self { paths }
    }

    /// Load a log, `None` if it has never been created
    pub fn get(
        &self,
        profile_id: &str,
        medicine_name: &str,
        month_year: &str,
    ) -> MedLogResult<Option<MedicationLog>> {
        read_json_optional(self.paths.log_file(profile_id, medicine_name, month_year))
    }

    /// Load a log that must exist
    pub fn get_required(
        &self,
        profile_id: &str,
        medicine_name: &str,
        month_year: &str,
    ) -> MedLogResult<MedicationLog> {
        self.get(profile_id, medicine_name, month_year)?
            .ok_or_else(|| {
                MedLogError::log_not_found(format!(
                    "{} / {} / {}",
                    profile_id, medicine_name, month_year
                ))
            })
    }

    pub fn exists(&self, profile_id: &str, medicine_name: &str, month_year: &str) -> bool {
        self.paths
            .log_file(profile_id, medicine_name, month_year)
            .exists()
    }

    /// Create an empty log and write it immediately
    ///
    /// An existing log with the same key is overwritten; callers check
    /// `exists` first when that matters.
    pub fn create(
        &self,
        profile_id: &str,
        month_year: &str,
        info: MedicationInfo,
    ) -> MedLogResult<MedicationLog> {
        if info.medicine_name.trim().is_empty() {
            return Err(MedLogError::Validation("Medicine name is required".into()));
        }

        let log = MedicationLog::new(profile_id, month_year, info);
        let path = self
            .paths
            .log_file(profile_id, &log.medicine_name, month_year);
        write_json_atomic(&path, &log)?;

        info!(log = %log.key(), "created medication log");
        Ok(log)
    }

    /// Overwrite the full record, refreshing `updated_at`
    pub fn save(
        &self,
        profile_id: &str,
        medicine_name: &str,
        month_year: &str,
        log: &mut MedicationLog,
    ) -> MedLogResult<()> {
        log.touch();
        write_json_atomic(
            self.paths.log_file(profile_id, medicine_name, month_year),
            log,
        )
    }

    /// Load, mutate and save a log in one step
    fn modify<F, R>(
        &self,
        profile_id: &str,
        medicine_name: &str,
        month_year: &str,
        mutate: F,
    ) -> MedLogResult<MedicationLog>
    where
        F: FnOnce(&mut MedicationLog) -> MedLogResult<R>,
    {
        let mut log = self.get_required(profile_id, medicine_name, month_year)?;
        mutate(&mut log)?;
        self.save(profile_id, medicine_name, month_year, &mut log)?;
        Ok(log)
    }

    /// Append an administration entry, keeping the log sorted by day
    pub fn add_entry(
        &self,
        profile_id: &str,
        medicine_name: &str,
        month_year: &str,
        entry: AdministrationEntry,
    ) -> MedLogResult<MedicationLog> {
        entry.validate()?;
        self.modify(profile_id, medicine_name, month_year, |log| {
            log.push_entry(entry);
            Ok(())
        })
    }

    /// Replace the `admin_index`-th entry recorded on `day`
    pub fn update_entry(
        &self,
        profile_id: &str,
        medicine_name: &str,
        month_year: &str,
        day: u32,
        admin_index: usize,
        entry: AdministrationEntry,
    ) -> MedLogResult<MedicationLog> {
        entry.validate()?;
        self.modify(profile_id, medicine_name, month_year, |log| {
            log.replace_entry(day, admin_index, entry)
        })
    }

    /// Delete the `admin_index`-th entry recorded on `day`
    ///
    /// Indices of later entries on the same day shift down by one.
    pub fn delete_entry(
        &self,
        profile_id: &str,
        medicine_name: &str,
        month_year: &str,
        day: u32,
        admin_index: usize,
    ) -> MedLogResult<MedicationLog> {
        self.modify(profile_id, medicine_name, month_year, |log| {
            log.remove_entry(day, admin_index)
        })
    }

    /// Delete every entry recorded on `day`
    pub fn delete_all_for_day(
        &self,
        profile_id: &str,
        medicine_name: &str,
        month_year: &str,
        day: u32,
    ) -> MedLogResult<MedicationLog> {
        self.modify(profile_id, medicine_name, month_year, |log| {
            log.remove_day(day);
            Ok(())
        })
    }

    /// Entries recorded on `day`; empty if the log doesn't exist
    pub fn entries_for_day(
        &self,
        profile_id: &str,
        medicine_name: &str,
        month_year: &str,
        day: u32,
    ) -> MedLogResult<Vec<AdministrationEntry>> {
        Ok(self
            .get(profile_id, medicine_name, month_year)?
            .map(|log| log.entries_for_day(day).into_iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Number of entries per day; empty if the log doesn't exist
    pub fn administration_summary(
        &self,
        profile_id: &str,
        medicine_name: &str,
        month_year: &str,
    ) -> MedLogResult<BTreeMap<u32, usize>> {
        Ok(self
            .get(profile_id, medicine_name, month_year)?
            .map(|log| log.summary())
            .unwrap_or_default())
    }

    /// All logs of a patient as `(medicine_name, month_year)`, sorted by
    /// month label then medicine name
    pub fn list_for_profile(&self, profile_id: &str) -> MedLogResult<Vec<(String, String)>> {
        let logs_dir = self.paths.logs_dir(profile_id);

        let dir = match fs::read_dir(&logs_dir) {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(MedLogError::Io(format!(
                    "Failed to list {}: {}",
                    logs_dir.display(),
                    e
                )))
            }
        };

        let mut logs = Vec::new();
        for dir_entry in dir {
            let path = dir_entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(log) = read_json_optional::<MedicationLog, _>(&path)? {
                logs.push((log.medicine_name, log.month_year));
            }
        }

        logs.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(logs)
    }

    /// Delete a log file; false if it did not exist
    pub fn delete(&self, profile_id: &str, medicine_name: &str, month_year: &str) -> MedLogResult<bool> {
        let path = self.paths.log_file(profile_id, medicine_name, month_year);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "deleted medication log");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(MedLogError::Io(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
