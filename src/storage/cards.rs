//! Medication card repository
//!
//! Cards for one patient live together in `medication_cards.json` as a map
//! of medicine name to card. Attached images are copied into a directory per
//! medicine and owned by the card.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::paths::MedLogPaths;
use crate::error::{MedLogError, MedLogResult, Warning};
use crate::models::{safe_segment, MedicationCard, MedicationInfo};

use super::file_io::{read_json, write_json_atomic};
use super::images::validate_image;

type CardMap = BTreeMap<String, MedicationCard>;

/// Repository for medication card persistence
pub struct CardRepository {
    paths: MedLogPaths,
}

impl CardRepository {
    /// Create a new card repository
    pub fn new(paths: MedLogPaths) -> Self {
        Self { paths }
    }

    fn load(&self, profile_id: &str) -> MedLogResult<CardMap> {
        read_json(self.paths.cards_file(profile_id))
    }

    fn store(&self, profile_id: &str, cards: &CardMap) -> MedLogResult<()> {
        write_json_atomic(self.paths.cards_file(profile_id), cards)
    }

    /// All cards of a patient keyed by medicine name
    pub fn get_all(&self, profile_id: &str) -> MedLogResult<CardMap> {
        self.load(profile_id)
    }

    pub fn get(&self, profile_id: &str, medicine_name: &str) -> MedLogResult<Option<MedicationCard>> {
        Ok(self.load(profile_id)?.remove(medicine_name))
    }

    /// Sorted medicine names of a patient's cards
    pub fn list_cards(&self, profile_id: &str) -> MedLogResult<Vec<String>> {
        Ok(self.load(profile_id)?.into_keys().collect())
    }

    /// Create a card; the medicine name must be new for this patient
    pub fn create(&self, profile_id: &str, info: MedicationInfo) -> MedLogResult<MedicationCard> {
        if info.medicine_name.trim().is_empty() {
            return Err(MedLogError::Validation("Medicine name is required".into()));
        }
        let segment = image_segment(&info.medicine_name)?;

        let mut cards = self.load(profile_id)?;
        if cards.contains_key(&info.medicine_name) {
            return Err(MedLogError::AlreadyExists {
                entity_type: "Medication card",
                identifier: info.medicine_name,
            });
        }
        if let Some(other) = cards.keys().find(|name| safe_segment(name) == segment) {
            return Err(MedLogError::Validation(format!(
                "Medicine name '{}' would share image storage with existing card '{}'",
                info.medicine_name, other
            )));
        }

        let card = MedicationCard::new(info);
        cards.insert(card.medicine_name.clone(), card.clone());
        self.store(profile_id, &cards)?;

        info!(profile = profile_id, medicine = %card.medicine_name, "created medication card");
        Ok(card)
    }

    /// Update a card's details, keeping its attached images
    pub fn update(
        &self,
        profile_id: &str,
        medicine_name: &str,
        info: &MedicationInfo,
    ) -> MedLogResult<MedicationCard> {
        let mut cards = self.load(profile_id)?;
        let card = cards
            .get_mut(medicine_name)
            .ok_or_else(|| MedLogError::card_not_found(medicine_name))?;

        card.apply_info(info);
        let updated = card.clone();
        self.store(profile_id, &cards)?;
        Ok(updated)
    }

    /// Delete a card, optionally removing its image directory
    ///
    /// Image removal is best effort: a failure is returned as a warning
    /// and the card metadata is still deleted.
    pub fn delete(
        &self,
        profile_id: &str,
        medicine_name: &str,
        delete_images: bool,
    ) -> MedLogResult<Vec<Warning>> {
        let mut cards = self.load(profile_id)?;
        if cards.remove(medicine_name).is_none() {
            return Err(MedLogError::card_not_found(medicine_name));
        }

        let mut warnings = Vec::new();
        if delete_images && image_segment(medicine_name).is_err() {
            warn!(medicine = medicine_name, "card name has no image directory of its own");
            warnings.push(Warning::new(
                "images",
                format!("Images of '{}' were not removed", medicine_name),
            ));
        } else if delete_images {
            let images_dir = self.paths.card_images_dir(profile_id, medicine_name);
            match fs::remove_dir_all(&images_dir) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(dir = %images_dir.display(), error = %e, "failed to remove card images");
                    warnings.push(Warning::new(
                        "images",
                        format!("Could not remove {}: {}", images_dir.display(), e),
                    ));
                }
            }
        }

        self.store(profile_id, &cards)?;
        info!(profile = profile_id, medicine = medicine_name, "deleted medication card");
        Ok(warnings)
    }

    /// Full path of a stored image
    pub fn image_path(&self, profile_id: &str, medicine_name: &str, filename: &str) -> PathBuf {
        self.paths
            .card_images_dir(profile_id, medicine_name)
            .join(filename)
    }

    /// Validate and copy an image into the card's image directory
    ///
    /// Returns the stored filename. An existing file is never overwritten:
    /// `pill.png` becomes `pill_1.png`, `pill_2.png`, ... as needed.
    pub fn add_image(
        &self,
        profile_id: &str,
        medicine_name: &str,
        source_path: &Path,
    ) -> MedLogResult<String> {
        let mut cards = self.load(profile_id)?;
        if !cards.contains_key(medicine_name) {
            return Err(MedLogError::card_not_found(medicine_name));
        }

        image_segment(medicine_name)?;
        validate_image(source_path)?;

        let images_dir = self.paths.card_images_dir(profile_id, medicine_name);
        fs::create_dir_all(&images_dir).map_err(|e| {
            MedLogError::Io(format!(
                "Failed to create directory {}: {}",
                images_dir.display(),
                e
            ))
        })?;

        let (stored_name, dest_path) = free_destination(&images_dir, source_path)?;
        fs::copy(source_path, &dest_path).map_err(|e| {
            MedLogError::Io(format!(
                "Failed to copy {} to {}: {}",
                source_path.display(),
                dest_path.display(),
                e
            ))
        })?;

        if let Some(card) = cards.get_mut(medicine_name) {
            if card.attach_image(&stored_name) {
                self.store(profile_id, &cards)?;
            }
        }

        info!(profile = profile_id, medicine = medicine_name, image = %stored_name, "attached image");
        Ok(stored_name)
    }

    /// Detach an image from a card and delete the stored file
    ///
    /// A file that is already gone is not an error; any other removal
    /// failure is returned as a warning.
    pub fn remove_image(
        &self,
        profile_id: &str,
        medicine_name: &str,
        filename: &str,
    ) -> MedLogResult<Vec<Warning>> {
        if filename.contains('/') || filename.contains('\\') || filename == ".." {
            return Err(MedLogError::Validation(format!(
                "Invalid image filename: {}",
                filename
            )));
        }

        let mut cards = self.load(profile_id)?;
        let card = cards
            .get_mut(medicine_name)
            .ok_or_else(|| MedLogError::card_not_found(medicine_name))?;

        if card.detach_image(filename) {
            self.store(profile_id, &cards)?;
        }

        let mut warnings = Vec::new();
        let path = self.image_path(profile_id, medicine_name, filename);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to remove image");
                warnings.push(Warning::new(
                    "images",
                    format!("Could not remove {}: {}", path.display(), e),
                ));
            }
        }
        Ok(warnings)
    }
}

/// Image directory name of a card, rejecting names that escape or alias
/// the medications directory
fn image_segment(medicine_name: &str) -> MedLogResult<String> {
    let segment = safe_segment(medicine_name);
    if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
        return Err(MedLogError::Validation(format!(
            "Invalid medicine name: {}",
            medicine_name
        )));
    }
    Ok(segment)
}

/// First unused `<stem>[_n].<ext>` name in `dir` for the source file
fn free_destination(dir: &Path, source_path: &Path) -> MedLogResult<(String, PathBuf)> {
    let original = source_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            MedLogError::Validation(format!(
                "Image path has no usable filename: {}",
                source_path.display()
            ))
        })?;

    let stem = Path::new(original)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(original);
    let extension = Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    let mut candidate = original.to_string();
    let mut counter = 1;
    while dir.join(&candidate).exists() {
        candidate = format!("{}_{}{}", stem, counter, extension);
        counter += 1;
    }

    let path = dir.join(&candidate);
    Ok((candidate, path))
}
