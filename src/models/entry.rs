//! Administration entry model

use serde::{Deserialize, Serialize};

use crate::error::MedLogError;

/// Highest day number a monthly log can address
pub const MAX_DAY: u32 = 31;

/// One recorded dose event
///
/// Entries have no identity beyond their position in the log; several
/// entries may share a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministrationEntry {
    /// Day of the month (1..=31)
    pub day: u32,

    /// Time of administration as entered (e.g. "8:00 PM")
    #[serde(default)]
    pub time: String,

    /// Initials of the person administering
    #[serde(default)]
    pub initials: String,

    /// Remaining supply after this dose (e.g. "29 tablets")
    #[serde(default)]
    pub amount_remaining: String,
}

impl AdministrationEntry {
    pub fn new(
        day: u32,
        time: impl Into<String>,
        initials: impl Into<String>,
        amount_remaining: impl Into<String>,
    ) -> Self {
        Self {
            day,
            time: time.into(),
            initials: initials.into(),
            amount_remaining: amount_remaining.into(),
        }
    }

    /// Whether the day falls inside the 1..=31 range of the log grid
    pub fn has_valid_day(&self) -> bool {
        (1..=MAX_DAY).contains(&self.day)
    }

    /// Validate the entry before it is written
    pub fn validate(&self) -> Result<(), MedLogError> {
        if !self.has_valid_day() {
            return Err(MedLogError::Validation(format!(
                "Day must be between 1 and {}, got {}",
                MAX_DAY, self.day
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_day_range() {
        assert!(AdministrationEntry::new(1, "8:00 AM", "JD", "30").validate().is_ok());
        assert!(AdministrationEntry::new(31, "8:00 AM", "JD", "30").validate().is_ok());

        let err = AdministrationEntry::new(0, "8:00 AM", "JD", "30")
            .validate()
            .unwrap_err();
        assert!(err.is_validation());
        assert!(AdministrationEntry::new(32, "", "", "").validate().is_err());
    }

    #[test]
    fn test_missing_text_fields_default_to_empty() {
        let entry: AdministrationEntry = serde_json::from_str(r#"{"day": 4}"#).unwrap();
        assert_eq!(entry.day, 4);
        assert!(entry.time.is_empty());
        assert!(entry.amount_remaining.is_empty());
    }
}
