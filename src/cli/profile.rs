//! Profile CLI commands
//!
//! Implements CLI commands for patient profile management.

use clap::{Args, Subcommand};

use crate::display::{format_profile_details, format_profile_list};
use crate::error::{MedLogError, MedLogResult};
use crate::models::ProfileInfo;
use crate::storage::Storage;

/// Optional profile fields shared by `add` and `edit`
#[derive(Args, Debug, Default)]
pub struct ProfileFields {
    /// Foster home name
    #[arg(long)]
    pub foster_home: Option<String>,
    /// Allergies and contraindications
    #[arg(long)]
    pub allergies: Option<String>,
    /// Prescriber name
    #[arg(long)]
    pub prescriber: Option<String>,
    /// Prescriber phone number
    #[arg(long)]
    pub prescriber_phone: Option<String>,
    /// Pharmacy name
    #[arg(long)]
    pub pharmacy: Option<String>,
    /// Pharmacy phone number
    #[arg(long)]
    pub pharmacy_phone: Option<String>,
}

impl ProfileFields {
    /// Overwrite the fields that were given
    pub fn apply_to(self, info: &mut ProfileInfo) {
        let targets = [
            (self.foster_home, &mut info.foster_home),
            (self.allergies, &mut info.allergies),
            (self.prescriber, &mut info.prescriber_name),
            (self.prescriber_phone, &mut info.prescriber_phone),
            (self.pharmacy, &mut info.pharmacy),
            (self.pharmacy_phone, &mut info.pharmacy_phone),
        ];
        for (value, target) in targets {
            if let Some(value) = value {
                *target = value;
            }
        }
    }
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Create a profile
    Add {
        /// Child's full name
        name: String,
        #[command(flatten)]
        fields: ProfileFields,
    },
    /// List all profiles
    List,
    /// Show profile details
    Show {
        /// Profile ID
        profile: String,
    },
    /// Edit a profile
    Edit {
        /// Profile ID
        profile: String,
        /// New child name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: ProfileFields,
    },
    /// Delete a profile (logs and cards stay on disk)
    Delete {
        /// Profile ID
        profile: String,
    },
    /// Search profiles by child name
    Search {
        /// Text to look for
        term: String,
    },
}

/// Handle a profile command
pub fn handle_profile_command(storage: &Storage, cmd: ProfileCommands) -> MedLogResult<()> {
    match cmd {
        ProfileCommands::Add { name, fields } => {
            let mut info = ProfileInfo::new(name);
            fields.apply_to(&mut info);
            let profile = storage.profiles.create(info)?;
            println!(
                "Created profile: {} ({})",
                profile.info.child_name, profile.profile_id
            );
        }

        ProfileCommands::List => {
            println!("{}", format_profile_list(&storage.profiles.list()?));
        }

        ProfileCommands::Show { profile } => {
            let profile = storage.profiles.get_required(&profile)?;
            print!("{}", format_profile_details(&profile));
        }

        ProfileCommands::Edit {
            profile,
            name,
            fields,
        } => {
            let mut info = storage.profiles.get_required(&profile)?.info;
            if let Some(name) = name {
                info.child_name = name;
            }
            fields.apply_to(&mut info);
            let updated = storage.profiles.update(&profile, info)?;
            println!("Updated profile: {}", updated.profile_id);
        }

        ProfileCommands::Delete { profile } => {
            if !storage.profiles.delete(&profile)? {
                return Err(MedLogError::profile_not_found(profile));
            }
            println!("Deleted profile: {}", profile);
        }

        ProfileCommands::Search { term } => {
            println!("{}", format_profile_list(&storage.profiles.search(&term)?));
        }
    }

    Ok(())
}
