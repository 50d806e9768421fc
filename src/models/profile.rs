//! Patient profile model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MedLogError;

/// Editable profile fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub child_name: String,
    #[serde(default)]
    pub foster_home: String,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub prescriber_name: String,
    #[serde(default)]
    pub prescriber_phone: String,
    #[serde(default)]
    pub pharmacy: String,
    #[serde(default)]
    pub pharmacy_phone: String,
}

impl ProfileInfo {
    pub fn new(child_name: impl Into<String>) -> Self {
        Self {
            child_name: child_name.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), MedLogError> {
        if self.child_name.trim().is_empty() {
            return Err(MedLogError::Validation("Child name is required".into()));
        }
        Ok(())
    }
}

/// A stored patient profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub profile_id: String,

    #[serde(flatten)]
    pub info: ProfileInfo,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(profile_id: impl Into<String>, info: ProfileInfo) -> Self {
        let now = Utc::now();
        Self {
            profile_id: profile_id.into(),
            info,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_serializes_flat() {
        let mut info = ProfileInfo::new("Jane Doe");
        info.pharmacy = "Main St Pharmacy".into();
        let profile = Profile::new("jane_doe", info);

        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["profile_id"], "jane_doe");
        assert_eq!(value["child_name"], "Jane Doe");
        assert_eq!(value["pharmacy"], "Main St Pharmacy");
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(ProfileInfo::new("  ").validate().unwrap_err().is_validation());
    }
}
