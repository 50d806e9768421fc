//! CLI commands for exporting medication logs
//!
//! Produces the filled document and, on request, PDF and spreadsheet
//! artifacts next to it.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use super::card::report_warnings;
use super::log::LogKey;
use crate::config::Settings;
use crate::error::MedLogResult;
use crate::export::{ExportOptions, ExportService};
use crate::layout::LayoutStrategy;
use crate::storage::Storage;

/// Overflow strategy for days with more than three administrations
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Grow the administration table
    Extended,
    /// Add continuation pages
    Continuation,
}

impl From<StrategyArg> for LayoutStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Extended => LayoutStrategy::ExtendedTable,
            StrategyArg::Continuation => LayoutStrategy::ContinuationPages,
        }
    }
}

/// Arguments of `medlog export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub key: LogKey,

    /// Overflow strategy (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Also write a PDF
    #[arg(long, conflicts_with = "no_pdf")]
    pub pdf: bool,

    /// Skip the PDF even if enabled in settings
    #[arg(long)]
    pub no_pdf: bool,

    /// Also write a CSV spreadsheet
    #[arg(long)]
    pub spreadsheet: bool,

    /// Append the medication card's images
    #[arg(long)]
    pub images: bool,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Template document to fill instead of the configured one
    #[arg(short, long)]
    pub template: Option<PathBuf>,
}

impl ExportArgs {
    /// Combine with settings; explicit flags win
    pub fn to_options(&self, settings: &Settings) -> ExportOptions {
        let mut options = ExportOptions::from_settings(settings);
        if let Some(strategy) = self.strategy {
            options.strategy = strategy.into();
        }
        if self.pdf {
            options.create_pdf = true;
        }
        if self.no_pdf {
            options.create_pdf = false;
        }
        options.create_spreadsheet = self.spreadsheet;
        options.include_images = self.images;
        if let Some(output) = &self.output {
            options.output_dir = Some(output.clone());
        }
        if let Some(template) = &self.template {
            options.template_path = Some(template.clone());
        }
        options
    }
}

/// Handle `medlog export`
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    args: ExportArgs,
) -> MedLogResult<()> {
    let key = &args.key;
    let profile = storage.profiles.get_required(&key.profile)?;
    let log = storage
        .logs
        .get_required(&key.profile, &key.medicine, &key.month)?;
    let options = args.to_options(settings);

    let outcome = ExportService::new(storage).export(&profile, &log, &options)?;

    println!("Exported {} - {} ({})", log.medicine_name, log.month_year, options.strategy);
    println!("  Document:    {}", outcome.document.display());
    if let Some(pdf) = &outcome.pdf {
        println!("  PDF:         {}", pdf.display());
    }
    if let Some(spreadsheet) = &outcome.spreadsheet {
        println!("  Spreadsheet: {}", spreadsheet.display());
    }

    if outcome.is_partial() {
        report_warnings(&outcome.warnings);
        println!("Export completed with warnings.");
    }

    Ok(())
}

/// Handle `medlog export-csv`
pub fn handle_export_csv_command(storage: &Storage, key: LogKey, output: PathBuf) -> MedLogResult<()> {
    let log = storage
        .logs
        .get_required(&key.profile, &key.medicine, &key.month)?;
    ExportService::new(storage).export_spreadsheet(&log, &output)?;
    println!(
        "Exported {} administrations to: {}",
        log.administration_log.len(),
        output.display()
    );
    Ok(())
}
