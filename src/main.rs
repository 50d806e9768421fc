use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use medlog::cli::{
    handle_card_command, handle_config_command, handle_export_command, handle_export_csv_command,
    handle_log_command, handle_profile_command, handle_template_command, CardCommands,
    ConfigCommands, ExportArgs, LogCommands, LogKey, ProfileCommands, TemplateCommands,
};
use medlog::config::{MedLogPaths, Settings};
use medlog::storage::Storage;

/// Environment variable holding the log filter
const LOG_ENV: &str = "MEDLOG_LOG";

#[derive(Parser)]
#[command(
    name = "medlog",
    version,
    about = "Medication administration logs for foster care",
    long_about = "medlog records monthly medication administration logs per child, \
                  keeps medication cards with reference images, and exports logs \
                  as printable documents."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Patient profile commands
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Medication log commands
    #[command(subcommand)]
    Log(LogCommands),

    /// Medication card commands
    #[command(subcommand)]
    Card(CardCommands),

    /// Export a log as a document
    Export(ExportArgs),

    /// Export a log as a CSV spreadsheet only
    ExportCsv {
        #[command(flatten)]
        key: LogKey,
        /// Output file path
        output: PathBuf,
    },

    /// Template commands
    #[command(subcommand)]
    Template(TemplateCommands),

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("medlog=warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = MedLogPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;

    match cli.command {
        Some(Commands::Profile(cmd)) => handle_profile_command(&storage, cmd)?,
        Some(Commands::Log(cmd)) => handle_log_command(&storage, cmd)?,
        Some(Commands::Card(cmd)) => handle_card_command(&storage, cmd)?,
        Some(Commands::Export(args)) => handle_export_command(&storage, &settings, args)?,
        Some(Commands::ExportCsv { key, output }) => {
            handle_export_csv_command(&storage, key, output)?
        }
        Some(Commands::Template(cmd)) => handle_template_command(cmd)?,
        Some(Commands::Config { action }) => {
            handle_config_command(&paths, &mut settings, action.unwrap_or(ConfigCommands::Show))?
        }
        None => {
            println!("medlog - Medication administration logs");
            println!();
            println!("Run 'medlog --help' for usage information.");
        }
    }

    Ok(())
}
