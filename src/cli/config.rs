//! Configuration CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use super::export::StrategyArg;
use crate::config::{MedLogPaths, Settings};
use crate::document::TemplateDocument;
use crate::error::MedLogResult;

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show paths and settings
    Show,
    /// Set the default export folder
    SetExportFolder {
        /// Existing directory
        path: PathBuf,
    },
    /// Set the template used for exports
    SetTemplate {
        /// Template file
        path: PathBuf,
    },
    /// Go back to the built-in template
    ClearTemplate,
    /// Set the default overflow strategy
    SetStrategy {
        #[arg(value_enum)]
        strategy: StrategyArg,
    },
    /// Choose whether exports write a PDF by default
    SetPdf {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

/// Handle a config command
pub fn handle_config_command(
    paths: &MedLogPaths,
    settings: &mut Settings,
    cmd: ConfigCommands,
) -> MedLogResult<()> {
    match cmd {
        ConfigCommands::Show => {
            println!("medlog Configuration");
            println!("====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!(
                "  Export folder:    {}",
                settings
                    .default_export_folder
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(per-profile exports directory)".into())
            );
            println!(
                "  Template:         {}",
                settings
                    .template_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(built-in)".into())
            );
            println!("  Strategy:         {}", settings.default_strategy);
            println!("  Create PDF:       {}", settings.create_pdf);
            return Ok(());
        }

        ConfigCommands::SetExportFolder { path } => {
            settings.set_default_export_folder(path)?;
        }

        ConfigCommands::SetTemplate { path } => {
            TemplateDocument::load(&path)?;
            settings.template_path = Some(path);
        }

        ConfigCommands::ClearTemplate => {
            settings.template_path = None;
        }

        ConfigCommands::SetStrategy { strategy } => {
            settings.default_strategy = strategy.into();
        }

        ConfigCommands::SetPdf { enabled } => {
            settings.create_pdf = enabled;
        }
    }

    settings.save(paths)?;
    println!("Settings saved.");
    Ok(())
}
