//! Medication card CLI commands
//!
//! Implements CLI commands for medication cards and their images.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::display::{format_card_details, format_card_list};
use crate::error::{MedLogError, MedLogResult, Warning};
use crate::models::MedicationInfo;
use crate::storage::Storage;

/// Optional medication details shared by cards and logs
#[derive(Args, Debug, Default)]
pub struct MedicationFields {
    /// Strength (e.g. "3 mg")
    #[arg(long)]
    pub strength: Option<String>,
    /// Dosage instructions
    #[arg(long)]
    pub dosage: Option<String>,
    /// Reason prescribed
    #[arg(long)]
    pub reason_prescribed: Option<String>,
    /// Reason for as-needed use
    #[arg(long)]
    pub reason_prn: Option<String>,
}

impl MedicationFields {
    /// Overwrite the fields that were given
    pub fn apply_to(self, info: &mut MedicationInfo) {
        let targets = [
            (self.strength, &mut info.strength),
            (self.dosage, &mut info.dosage),
            (self.reason_prescribed, &mut info.reason_prescribed),
            (self.reason_prn, &mut info.reason_prn),
        ];
        for (value, target) in targets {
            if let Some(value) = value {
                *target = value;
            }
        }
    }
}

/// Card subcommands
#[derive(Subcommand, Debug)]
pub enum CardCommands {
    /// Create a medication card
    Add {
        /// Profile ID
        profile: String,
        /// Medicine name
        medicine: String,
        #[command(flatten)]
        fields: MedicationFields,
    },
    /// List a profile's medication cards
    List {
        /// Profile ID
        profile: String,
    },
    /// Show card details
    Show {
        /// Profile ID
        profile: String,
        /// Medicine name
        medicine: String,
    },
    /// Update card details (images are kept)
    Update {
        /// Profile ID
        profile: String,
        /// Medicine name
        medicine: String,
        #[command(flatten)]
        fields: MedicationFields,
    },
    /// Delete a card
    Delete {
        /// Profile ID
        profile: String,
        /// Medicine name
        medicine: String,
        /// Leave stored image files on disk
        #[arg(long)]
        keep_images: bool,
    },
    /// Attach an image to a card
    AddImage {
        /// Profile ID
        profile: String,
        /// Medicine name
        medicine: String,
        /// Image file to copy
        path: PathBuf,
    },
    /// Detach an image and delete the stored file
    RemoveImage {
        /// Profile ID
        profile: String,
        /// Medicine name
        medicine: String,
        /// Stored image filename
        filename: String,
    },
}

/// Handle a card command
pub fn handle_card_command(storage: &Storage, cmd: CardCommands) -> MedLogResult<()> {
    match cmd {
        CardCommands::Add {
            profile,
            medicine,
            fields,
        } => {
            storage.profiles.get_required(&profile)?;
            let mut info = MedicationInfo::new(medicine);
            fields.apply_to(&mut info);
            let card = storage.cards.create(&profile, info)?;
            println!("Created medication card: {}", card.medicine_name);
        }

        CardCommands::List { profile } => {
            let cards: Vec<_> = storage.cards.get_all(&profile)?.into_values().collect();
            println!("{}", format_card_list(&cards));
        }

        CardCommands::Show { profile, medicine } => {
            let card = storage
                .cards
                .get(&profile, &medicine)?
                .ok_or_else(|| MedLogError::card_not_found(&medicine))?;
            print!("{}", format_card_details(&card));
        }

        CardCommands::Update {
            profile,
            medicine,
            fields,
        } => {
            let card = storage
                .cards
                .get(&profile, &medicine)?
                .ok_or_else(|| MedLogError::card_not_found(&medicine))?;
            let mut info = card.info();
            fields.apply_to(&mut info);
            storage.cards.update(&profile, &medicine, &info)?;
            println!("Updated medication card: {}", medicine);
        }

        CardCommands::Delete {
            profile,
            medicine,
            keep_images,
        } => {
            let warnings = storage.cards.delete(&profile, &medicine, !keep_images)?;
            report_warnings(&warnings);
            println!("Deleted medication card: {}", medicine);
        }

        CardCommands::AddImage {
            profile,
            medicine,
            path,
        } => {
            let stored = storage.cards.add_image(&profile, &medicine, &path)?;
            println!("Attached image: {}", stored);
        }

        CardCommands::RemoveImage {
            profile,
            medicine,
            filename,
        } => {
            let warnings = storage.cards.remove_image(&profile, &medicine, &filename)?;
            report_warnings(&warnings);
            println!("Removed image: {}", filename);
        }
    }

    Ok(())
}

/// Print degraded best-effort steps to stderr
pub(crate) fn report_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
}
