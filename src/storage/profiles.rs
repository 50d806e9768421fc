//! Profile repository for JSON storage
//!
//! Manages loading and saving patient profiles to profiles.json

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use crate::error::{MedLogError, MedLogResult};
use crate::models::{generate_profile_id, Profile, ProfileInfo};

use super::file_io::{read_json, write_json_atomic};

type ProfileMap = BTreeMap<String, Profile>;

/// Repository for profile persistence
pub struct ProfileRepository {
    path: PathBuf,
}

impl ProfileRepository {
    /// Create a new profile repository
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> MedLogResult<ProfileMap> {
        read_json(&self.path)
    }

    fn store(&self, profiles: &ProfileMap) -> MedLogResult<()> {
        write_json_atomic(&self.path, profiles)
    }

    /// Create a profile, deriving a unique id from the child's name
    pub fn create(&self, info: ProfileInfo) -> MedLogResult<Profile> {
        info.validate()?;

        let mut profiles = self.load()?;
        let profile_id = generate_profile_id(&info.child_name, |candidate| {
            profiles.contains_key(candidate)
        });
        if profile_id.is_empty() {
            return Err(MedLogError::Validation(format!(
                "Child name '{}' has no usable characters",
                info.child_name
            )));
        }

        let profile = Profile::new(profile_id, info);
        profiles.insert(profile.profile_id.clone(), profile.clone());
        self.store(&profiles)?;

        info!(profile = %profile.profile_id, "created profile");
        Ok(profile)
    }

    pub fn get(&self, profile_id: &str) -> MedLogResult<Option<Profile>> {
        Ok(self.load()?.remove(profile_id))
    }

    pub fn get_required(&self, profile_id: &str) -> MedLogResult<Profile> {
        self.get(profile_id)?
            .ok_or_else(|| MedLogError::profile_not_found(profile_id))
    }

    /// All profiles sorted by child name
    pub fn list(&self) -> MedLogResult<Vec<Profile>> {
        let mut profiles: Vec<_> = self.load()?.into_values().collect();
        profiles.sort_by(|a, b| {
            a.info
                .child_name
                .to_lowercase()
                .cmp(&b.info.child_name.to_lowercase())
        });
        Ok(profiles)
    }

    /// Replace a profile's details, keeping its id and creation time
    pub fn update(&self, profile_id: &str, info: ProfileInfo) -> MedLogResult<Profile> {
        info.validate()?;

        let mut profiles = self.load()?;
        let profile = profiles
            .get_mut(profile_id)
            .ok_or_else(|| MedLogError::profile_not_found(profile_id))?;

        profile.info = info;
        profile.updated_at = Utc::now();
        let updated = profile.clone();
        self.store(&profiles)?;
        Ok(updated)
    }

    /// Delete a profile; false if it did not exist
    ///
    /// The patient's logs and cards are left on disk.
    pub fn delete(&self, profile_id: &str) -> MedLogResult<bool> {
        let mut profiles = self.load()?;
        if profiles.remove(profile_id).is_none() {
            return Ok(false);
        }
        self.store(&profiles)?;
        info!(profile = profile_id, "deleted profile");
        Ok(true)
    }

    /// Profiles whose child name contains `term`, case-insensitively
    pub fn search(&self, term: &str) -> MedLogResult<Vec<Profile>> {
        let term = term.to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .filter(|p| p.info.child_name.to_lowercase().contains(&term))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ProfileRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profiles.json");
        (temp_dir, ProfileRepository::new(path))
    }

    #[test]
    fn test_empty_list() {
        let (_temp_dir, repo) = create_test_repo();
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_generates_unique_ids() {
        let (_temp_dir, repo) = create_test_repo();
        let first = repo.create(ProfileInfo::new("Jane Doe")).unwrap();
        let second = repo.create(ProfileInfo::new("Jane Doe")).unwrap();

        assert_eq!(first.profile_id, "jane_doe");
        assert_eq!(second.profile_id, "jane_doe_1");
        assert_eq!(repo.list().unwrap().len(), 2);
    }

    #[test]
    fn test_create_rejects_unusable_names() {
        let (_temp_dir, repo) = create_test_repo();
        assert!(repo.create(ProfileInfo::new("")).unwrap_err().is_validation());
        assert!(repo.create(ProfileInfo::new("...")).unwrap_err().is_validation());
    }

    #[test]
    fn test_update_keeps_identity() {
        let (_temp_dir, repo) = create_test_repo();
        let created = repo.create(ProfileInfo::new("Jane Doe")).unwrap();

        let mut info = created.info.clone();
        info.allergies = "Penicillin".into();
        let updated = repo.update(&created.profile_id, info).unwrap();

        assert_eq!(updated.profile_id, created.profile_id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(
            repo.get_required("jane_doe").unwrap().info.allergies,
            "Penicillin"
        );
        assert!(repo
            .update("nobody", ProfileInfo::new("X"))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_delete_and_search() {
        let (_temp_dir, repo) = create_test_repo();
        repo.create(ProfileInfo::new("Jane Doe")).unwrap();
        repo.create(ProfileInfo::new("John Smith")).unwrap();

        let found = repo.search("JANE").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].info.child_name, "Jane Doe");

        assert!(repo.delete("jane_doe").unwrap());
        assert!(!repo.delete("jane_doe").unwrap());
        assert!(repo.get("jane_doe").unwrap().is_none());
    }
}
