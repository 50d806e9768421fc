//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the storage and export layers.

pub mod card;
pub mod config;
pub mod export;
pub mod log;
pub mod profile;
pub mod template;

pub use card::{handle_card_command, CardCommands, MedicationFields};
pub use config::{handle_config_command, ConfigCommands};
pub use export::{handle_export_command, handle_export_csv_command, ExportArgs, StrategyArg};
pub use log::{handle_log_command, LogCommands, LogKey};
pub use profile::{handle_profile_command, ProfileCommands};
pub use template::{handle_template_command, TemplateCommands};
