//! Medication log model
//!
//! A log is the month-scoped administration history of one medicine for one
//! patient, identified by `(profile_id, medicine_name, month_year)`.
//!
//! Entries inside a day are addressed by `admin_index`: the 0-based position
//! among the entries sharing that day, in current sequence order. The index
//! is positional, so removing an entry shifts the indices of later entries on
//! the same day.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entry::AdministrationEntry;
use super::next_timestamp;
use crate::error::MedLogError;

/// Medication details shared by logs and cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationInfo {
    #[serde(default)]
    pub medicine_name: String,
    #[serde(default)]
    pub strength: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub reason_prescribed: String,
    #[serde(default)]
    pub reason_prn: String,
}

impl MedicationInfo {
    pub fn new(medicine_name: impl Into<String>) -> Self {
        Self {
            medicine_name: medicine_name.into(),
            ..Default::default()
        }
    }
}

/// A monthly medication administration log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationLog {
    pub profile_id: String,
    pub medicine_name: String,
    pub month_year: String,
    #[serde(default)]
    pub strength: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub reason_prescribed: String,
    #[serde(default)]
    pub reason_prn: String,

    /// Always sorted by ascending day, insertion order kept within a day
    #[serde(default)]
    pub administration_log: Vec<AdministrationEntry>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MedicationLog {
    /// Create an empty log for a month
    pub fn new(profile_id: impl Into<String>, month_year: impl Into<String>, info: MedicationInfo) -> Self {
        let now = Utc::now();
        Self {
            profile_id: profile_id.into(),
            medicine_name: info.medicine_name,
            month_year: month_year.into(),
            strength: info.strength,
            dosage: info.dosage,
            reason_prescribed: info.reason_prescribed,
            reason_prn: info.reason_prn,
            administration_log: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Human-readable identity, used in error messages
    pub fn key(&self) -> String {
        format!(
            "{} / {} / {}",
            self.profile_id, self.medicine_name, self.month_year
        )
    }

    /// Mark the log as modified
    pub fn touch(&mut self) {
        self.updated_at = next_timestamp(self.updated_at);
    }

    /// Append an entry and restore day order
    ///
    /// `sort_by_key` is stable, so the new entry lands after any existing
    /// entries for the same day.
    pub fn push_entry(&mut self, entry: AdministrationEntry) {
        self.administration_log.push(entry);
        self.sort_entries();
    }

    /// Re-sort entries by day, keeping relative order within a day
    pub fn sort_entries(&mut self) {
        self.administration_log.sort_by_key(|entry| entry.day);
    }

    /// All entries recorded for a day, in sequence order
    pub fn entries_for_day(&self, day: u32) -> Vec<&AdministrationEntry> {
        self.administration_log
            .iter()
            .filter(|entry| entry.day == day)
            .collect()
    }

    /// Position in `administration_log` of the `admin_index`-th entry of `day`
    fn position_of(&self, day: u32, admin_index: usize) -> Result<usize, MedLogError> {
        self.administration_log
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.day == day)
            .nth(admin_index)
            .map(|(position, _)| position)
            .ok_or_else(|| {
                MedLogError::entry_not_found(format!(
                    "index {} for day {} in {}",
                    admin_index,
                    day,
                    self.key()
                ))
            })
    }

    /// Replace the `admin_index`-th entry of `day`
    pub fn replace_entry(
        &mut self,
        day: u32,
        admin_index: usize,
        entry: AdministrationEntry,
    ) -> Result<(), MedLogError> {
        let position = self.position_of(day, admin_index)?;
        self.administration_log[position] = entry;
        self.sort_entries();
        Ok(())
    }

    /// Remove and return the `admin_index`-th entry of `day`
    pub fn remove_entry(
        &mut self,
        day: u32,
        admin_index: usize,
    ) -> Result<AdministrationEntry, MedLogError> {
        let position = self.position_of(day, admin_index)?;
        Ok(self.administration_log.remove(position))
    }

    /// Remove every entry of `day`, returning how many were removed
    pub fn remove_day(&mut self, day: u32) -> usize {
        let before = self.administration_log.len();
        self.administration_log.retain(|entry| entry.day != day);
        before - self.administration_log.len()
    }

    /// Number of entries per day, for days that have any
    pub fn summary(&self) -> BTreeMap<u32, usize> {
        let mut summary = BTreeMap::new();
        for entry in &self.administration_log {
            *summary.entry(entry.day).or_insert(0) += 1;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log() -> MedicationLog {
        let mut info = MedicationInfo::new("Melatonin");
        info.strength = "3 mg".into();
        MedicationLog::new("p1", "March 2025", info)
    }

    fn entry(day: u32, time: &str) -> AdministrationEntry {
        AdministrationEntry::new(day, time, "JD", "")
    }

    #[test]
    fn test_new_log_is_empty() {
        let log = sample_log();
        assert_eq!(log.medicine_name, "Melatonin");
        assert_eq!(log.strength, "3 mg");
        assert!(log.administration_log.is_empty());
        assert_eq!(log.created_at, log.updated_at);
    }

    #[test]
    fn test_push_entry_keeps_day_order_and_stability() {
        let mut log = sample_log();
        log.push_entry(entry(5, "first"));
        log.push_entry(entry(2, "a"));
        log.push_entry(entry(5, "second"));
        log.push_entry(entry(1, "b"));

        let days: Vec<_> = log.administration_log.iter().map(|e| e.day).collect();
        assert_eq!(days, vec![1, 2, 5, 5]);
        assert_eq!(log.administration_log[2].time, "first");
        assert_eq!(log.administration_log[3].time, "second");
    }

    #[test]
    fn test_replace_entry_by_day_index() {
        let mut log = sample_log();
        log.push_entry(entry(3, "morning"));
        log.push_entry(entry(3, "evening"));

        log.replace_entry(3, 1, entry(3, "night")).unwrap();
        assert_eq!(log.entries_for_day(3)[1].time, "night");

        let err = log.replace_entry(3, 2, entry(3, "x")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_replace_entry_moving_day_resorts() {
        let mut log = sample_log();
        log.push_entry(entry(1, "a"));
        log.push_entry(entry(2, "b"));

        log.replace_entry(1, 0, entry(9, "moved")).unwrap();
        let days: Vec<_> = log.administration_log.iter().map(|e| e.day).collect();
        assert_eq!(days, vec![2, 9]);
    }

    #[test]
    fn test_remove_entry_shifts_indices() {
        let mut log = sample_log();
        log.push_entry(entry(4, "a"));
        log.push_entry(entry(4, "b"));
        log.push_entry(entry(4, "c"));

        let removed = log.remove_entry(4, 0).unwrap();
        assert_eq!(removed.time, "a");
        assert_eq!(log.entries_for_day(4)[0].time, "b");
        assert!(log.remove_entry(7, 0).is_err());
    }

    #[test]
    fn test_remove_day_and_summary() {
        let mut log = sample_log();
        log.push_entry(entry(1, "a"));
        log.push_entry(entry(1, "b"));
        log.push_entry(entry(2, "c"));

        let summary = log.summary();
        assert_eq!(summary.get(&1), Some(&2));
        assert_eq!(summary.get(&2), Some(&1));

        assert_eq!(log.remove_day(1), 2);
        assert_eq!(log.administration_log.len(), 1);
        assert_eq!(log.remove_day(1), 0);
    }

    #[test]
    fn test_serialized_field_names() {
        let log = sample_log();
        let value = serde_json::to_value(&log).unwrap();
        for field in [
            "profile_id",
            "medicine_name",
            "month_year",
            "strength",
            "dosage",
            "reason_prescribed",
            "reason_prn",
            "administration_log",
            "created_at",
            "updated_at",
        ] {
            assert!(value.get(field).is_some(), "missing {}", field);
        }
    }
}
