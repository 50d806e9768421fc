//! Medication card model
//!
//! A card is reusable medicine metadata plus reference images, independent
//! of any month's log. Cards are identified by `(profile_id, medicine_name)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::log::MedicationInfo;
use super::next_timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationCard {
    pub medicine_name: String,
    #[serde(default)]
    pub strength: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub reason_prescribed: String,
    #[serde(default)]
    pub reason_prn: String,

    /// Stored image filenames, in the order they were attached
    #[serde(default)]
    pub images: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MedicationCard {
    pub fn new(info: MedicationInfo) -> Self {
        let now = Utc::now();
        Self {
            medicine_name: info.medicine_name,
            strength: info.strength,
            dosage: info.dosage,
            reason_prescribed: info.reason_prescribed,
            reason_prn: info.reason_prn,
            images: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the descriptive fields; name and images are kept
    pub fn apply_info(&mut self, info: &MedicationInfo) {
        self.strength = info.strength.clone();
        self.dosage = info.dosage.clone();
        self.reason_prescribed = info.reason_prescribed.clone();
        self.reason_prn = info.reason_prn.clone();
        self.touch();
    }

    /// Medication details, e.g. to seed a new monthly log from the card
    pub fn info(&self) -> MedicationInfo {
        MedicationInfo {
            medicine_name: self.medicine_name.clone(),
            strength: self.strength.clone(),
            dosage: self.dosage.clone(),
            reason_prescribed: self.reason_prescribed.clone(),
            reason_prn: self.reason_prn.clone(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = next_timestamp(self.updated_at);
    }

    /// Record an image filename; returns false if it was already listed
    pub fn attach_image(&mut self, filename: &str) -> bool {
        if self.images.iter().any(|existing| existing == filename) {
            return false;
        }
        self.images.push(filename.to_string());
        self.touch();
        true
    }

    /// Forget an image filename; returns false if it was not listed
    pub fn detach_image(&mut self, filename: &str) -> bool {
        let before = self.images.len();
        self.images.retain(|existing| existing != filename);
        if self.images.len() == before {
            return false;
        }
        self.touch();
        true
    }
}
