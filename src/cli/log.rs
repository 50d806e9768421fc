//! Medication log CLI commands
//!
//! Entries are addressed by day and by their 0-based position among that
//! day's entries, as shown in the `#` column of `log show`.

use clap::{Args, Subcommand};

use super::card::MedicationFields;
use crate::display::{format_log_details, format_log_list, format_summary};
use crate::error::{MedLogError, MedLogResult};
use crate::models::{AdministrationEntry, MedicationInfo};
use crate::storage::Storage;

/// Identifies one log
#[derive(Args, Debug, Clone)]
pub struct LogKey {
    /// Profile ID
    pub profile: String,
    /// Medicine name
    pub medicine: String,
    /// Month label (e.g. "March 2025")
    pub month: String,
}

/// Values of one administration entry
#[derive(Args, Debug, Clone)]
pub struct EntryArgs {
    /// Time given (e.g. "8:00 PM")
    pub time: String,
    /// Initials of whoever gave it
    pub initials: String,
    /// Amount remaining afterwards
    #[arg(short, long, default_value = "")]
    pub amount: String,
}

/// Log subcommands
#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Create an empty log for a month
    Create {
        #[command(flatten)]
        key: LogKey,
        /// Copy medication details from the profile's card
        #[arg(long)]
        from_card: bool,
        #[command(flatten)]
        fields: MedicationFields,
    },
    /// Show a log and its entries
    Show {
        #[command(flatten)]
        key: LogKey,
    },
    /// List a profile's logs
    List {
        /// Profile ID
        profile: String,
    },
    /// Record an administration
    Add {
        #[command(flatten)]
        key: LogKey,
        /// Day of month (1-31)
        day: u32,
        #[command(flatten)]
        entry: EntryArgs,
    },
    /// Replace an administration
    Update {
        #[command(flatten)]
        key: LogKey,
        /// Day of month the entry is recorded on
        day: u32,
        /// Position among that day's entries (0-based)
        index: usize,
        /// New day of month
        #[arg(long)]
        new_day: Option<u32>,
        #[command(flatten)]
        entry: EntryArgs,
    },
    /// Remove one administration
    Remove {
        #[command(flatten)]
        key: LogKey,
        /// Day of month
        day: u32,
        /// Position among that day's entries (0-based)
        index: usize,
    },
    /// Remove every administration on a day
    ClearDay {
        #[command(flatten)]
        key: LogKey,
        /// Day of month
        day: u32,
    },
    /// Count administrations per day
    Summary {
        #[command(flatten)]
        key: LogKey,
    },
    /// Delete a log
    Delete {
        #[command(flatten)]
        key: LogKey,
    },
}

/// Handle a log command
pub fn handle_log_command(storage: &Storage, cmd: LogCommands) -> MedLogResult<()> {
    let logs = &storage.logs;

    match cmd {
        LogCommands::Create {
            key,
            from_card,
            fields,
        } => {
            storage.profiles.get_required(&key.profile)?;
            if logs.exists(&key.profile, &key.medicine, &key.month) {
                return Err(MedLogError::AlreadyExists {
                    entity_type: "Medication log",
                    identifier: format!("{} / {}", key.medicine, key.month),
                });
            }

            let mut info = if from_card {
                storage
                    .cards
                    .get(&key.profile, &key.medicine)?
                    .ok_or_else(|| MedLogError::card_not_found(&key.medicine))?
                    .info()
            } else {
                MedicationInfo::new(&key.medicine)
            };
            fields.apply_to(&mut info);

            let log = logs.create(&key.profile, &key.month, info)?;
            println!("Created log: {} - {}", log.medicine_name, log.month_year);
        }

        LogCommands::Show { key } => {
            let log = logs.get_required(&key.profile, &key.medicine, &key.month)?;
            print!("{}", format_log_details(&log));
        }

        LogCommands::List { profile } => {
            println!("{}", format_log_list(&logs.list_for_profile(&profile)?));
        }

        LogCommands::Add { key, day, entry } => {
            let entry = AdministrationEntry::new(day, entry.time, entry.initials, entry.amount);
            let log = logs.add_entry(&key.profile, &key.medicine, &key.month, entry)?;
            println!(
                "Recorded administration on day {} ({} on this day)",
                day,
                log.entries_for_day(day).len()
            );
        }

        LogCommands::Update {
            key,
            day,
            index,
            new_day,
            entry,
        } => {
            let entry = AdministrationEntry::new(
                new_day.unwrap_or(day),
                entry.time,
                entry.initials,
                entry.amount,
            );
            logs.update_entry(&key.profile, &key.medicine, &key.month, day, index, entry)?;
            println!("Updated administration {} on day {}", index, day);
        }

        LogCommands::Remove { key, day, index } => {
            logs.delete_entry(&key.profile, &key.medicine, &key.month, day, index)?;
            println!("Removed administration {} on day {}", index, day);
        }

        LogCommands::ClearDay { key, day } => {
            let removed = logs
                .entries_for_day(&key.profile, &key.medicine, &key.month, day)?
                .len();
            logs.delete_all_for_day(&key.profile, &key.medicine, &key.month, day)?;
            println!("Removed {} administrations on day {}", removed, day);
        }

        LogCommands::Summary { key } => {
            logs.get_required(&key.profile, &key.medicine, &key.month)?;
            let summary = logs.administration_summary(&key.profile, &key.medicine, &key.month)?;
            println!("{}", format_summary(&summary));
        }

        LogCommands::Delete { key } => {
            if !logs.delete(&key.profile, &key.medicine, &key.month)? {
                return Err(MedLogError::log_not_found(format!(
                    "{} / {}",
                    key.medicine, key.month
                )));
            }
            println!("Deleted log: {} - {}", key.medicine, key.month);
        }
    }

    Ok(())
}
