//! Export orchestration
//!
//! Fills the template for one medication log, lays out its entries with
//! the chosen strategy and writes the document artifact. PDF and
//! spreadsheet outputs are best-effort: their failures come back as
//! warnings next to the artifacts that did succeed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::document::{
    DocumentConverter, PdfConverter, Replacements, TemplateDocument, TemplateSink,
    ADMIN_TABLE_INDEX,
};
use crate::error::{MedLogError, MedLogResult, Warning};
use crate::layout::{plan_layout, LayoutStrategy, Placement, BASE_SLOTS};
use crate::models::{MedicationLog, Profile};
use crate::storage::Storage;

use super::csv::write_log_csv;

/// Font size of filled-in administration cells
pub const DATA_FONT_SIZE: f32 = 8.0;

/// Maximum rendered image width, in inches
pub const IMAGE_MAX_WIDTH_IN: f32 = 6.0;

/// What an export should produce
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub strategy: LayoutStrategy,
    pub include_images: bool,
    pub create_pdf: bool,
    pub create_spreadsheet: bool,
    /// Falls back to the patient's exports directory
    pub output_dir: Option<PathBuf>,
    /// Falls back to the built-in template
    pub template_path: Option<PathBuf>,
}

impl ExportOptions {
    /// Options seeded from user settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            strategy: settings.default_strategy,
            create_pdf: settings.create_pdf,
            output_dir: settings.default_export_folder.clone(),
            template_path: settings.template_path.clone(),
            ..Self::default()
        }
    }
}

/// Artifacts written by an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub document: PathBuf,
    pub pdf: Option<PathBuf>,
    pub spreadsheet: Option<PathBuf>,
    pub warnings: Vec<Warning>,
}

impl ExportOutcome {
    /// True when some requested secondary artifact failed
    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Base filename for a log's artifacts: `Melatonin_March_2025`
pub fn export_basename(medicine_name: &str, month_year: &str) -> String {
    format!("{}_{}", medicine_name, month_year)
        .replace(' ', "_")
        .replace(|c: char| c == '/' || c == '\\', "_")
}

/// Service producing export artifacts for medication logs
pub struct ExportService<'a> {
    storage: &'a Storage,
    converter: Box<dyn DocumentConverter + 'a>,
}

impl<'a> ExportService<'a> {
    /// Create an export service rendering PDFs with printpdf
    pub fn new(storage: &'a Storage) -> Self {
        Self::with_converter(storage, Box::new(PdfConverter))
    }

    /// Create an export service with a custom PDF converter
    pub fn with_converter(storage: &'a Storage, converter: Box<dyn DocumentConverter + 'a>) -> Self {
        Self { storage, converter }
    }

    /// Build the filled document for a log without writing anything
    pub fn build_document(
        &self,
        profile: &Profile,
        log: &MedicationLog,
        options: &ExportOptions,
    ) -> MedLogResult<(TemplateDocument, Vec<Warning>)> {
        let mut template = TemplateDocument::load_or_builtin(options.template_path.as_deref())?;
        let replacements = Replacements::for_log(profile, log);
        template.replace_tokens(&replacements);

        let plan = plan_layout(&log.administration_log, options.strategy);

        if plan.extra_slot_groups > 0 {
            let admin = template.table_mut(ADMIN_TABLE_INDEX)?;
            for group in 0..plan.extra_slot_groups {
                admin.append_labeled_row(format!("Admin {}:", BASE_SLOTS + group + 1));
                admin.append_labeled_row("Time:");
                admin.append_labeled_row("Initials:");
                admin.append_labeled_row("Amount Remaining:");
            }
            debug!(groups = plan.extra_slot_groups, "extended administration table");
        }

        let mut continuation = replacements.clone();
        continuation.insert("{{DateMY}}", format!("{} (cont.)", log.month_year));

        for page in &plan.pages {
            let table = if page.number == 1 {
                ADMIN_TABLE_INDEX
            } else {
                let index = template.clone_table_section(format!(
                    "Medication Log - Continuation (Page {})",
                    page.number
                ));
                template.table_mut(index)?.apply(&continuation);
                index
            };

            for placement in &page.placements {
                place_entry(&mut template, table, placement)?;
            }
        }

        let mut warnings = Vec::new();
        if options.include_images {
            self.add_images(&mut template, profile, log, &mut warnings)?;
        }

        Ok((template, warnings))
    }

    /// Export a log, returning the paths written
    ///
    /// Fails only if the template is unusable or the document artifact
    /// cannot be written.
    pub fn export(
        &self,
        profile: &Profile,
        log: &MedicationLog,
        options: &ExportOptions,
    ) -> MedLogResult<ExportOutcome> {
        let (template, mut warnings) = self.build_document(profile, log, options)?;

        let output_dir = options
            .output_dir
            .clone()
            .unwrap_or_else(|| self.storage.paths().exports_dir(&profile.profile_id));
        fs::create_dir_all(&output_dir).map_err(|e| {
            MedLogError::Io(format!(
                "Failed to create directory {}: {}",
                output_dir.display(),
                e
            ))
        })?;

        let base = export_basename(&log.medicine_name, &log.month_year);
        let document = output_dir.join(format!("{}.doc.json", base));
        template.save(&document)?;
        info!(path = %document.display(), strategy = %options.strategy, "exported medication log");

        let pdf = if options.create_pdf {
            let path = output_dir.join(format!("{}.pdf", base));
            best_effort("pdf", &mut warnings, || {
                self.converter.convert(template.document(), &path)
            })
            .map(|_| path)
        } else {
            None
        };

        let spreadsheet = if options.create_spreadsheet {
            let path = output_dir.join(format!("{}.csv", base));
            best_effort("spreadsheet", &mut warnings, || write_log_csv(log, &path)).map(|_| path)
        } else {
            None
        };

        Ok(ExportOutcome {
            document,
            pdf,
            spreadsheet,
            warnings,
        })
    }

    /// Write only the spreadsheet artifact
    pub fn export_spreadsheet(&self, log: &MedicationLog, path: &Path) -> MedLogResult<()> {
        write_log_csv(log, path)?;
        info!(path = %path.display(), "exported spreadsheet");
        Ok(())
    }

    fn add_images(
        &self,
        template: &mut TemplateDocument,
        profile: &Profile,
        log: &MedicationLog,
        warnings: &mut Vec<Warning>,
    ) -> MedLogResult<()> {
        let Some(card) = self
            .storage
            .cards
            .get(&profile.profile_id, &log.medicine_name)?
        else {
            warnings.push(Warning::new(
                "images",
                format!("no medication card for {}", log.medicine_name),
            ));
            return Ok(());
        };

        let images: Vec<(&String, PathBuf)> = card
            .images
            .iter()
            .map(|name| {
                let path = self
                    .storage
                    .cards
                    .image_path(&profile.profile_id, &card.medicine_name, name);
                (name, path)
            })
            .filter(|(name, path)| {
                let exists = path.is_file();
                if !exists {
                    debug!(image = %name, "skipping missing image");
                }
                exists
            })
            .collect();

        if images.is_empty() {
            return Ok(());
        }

        template.add_page_break();
        template.add_heading("Medication Images", 2);
        for (i, (name, path)) in images.into_iter().enumerate() {
            template.add_image(path, format!("Image {}: {}", i + 1, name), IMAGE_MAX_WIDTH_IN);
        }
        Ok(())
    }
}

fn place_entry(
    template: &mut TemplateDocument,
    table: usize,
    placement: &Placement<'_>,
) -> MedLogResult<()> {
    let entry = placement.entry;
    let column = placement.column;
    let size = Some(DATA_FONT_SIZE);
    template.set_cell(table, placement.rows.time, column, entry.time.as_str(), size)?;
    template.set_cell(table, placement.rows.initials, column, entry.initials.as_str(), size)?;
    template.set_cell(table, placement.rows.amount, column, entry.amount_remaining.as_str(), size)
}

/// Run a secondary step, turning its failure into a warning
fn best_effort<F>(context: &'static str, warnings: &mut Vec<Warning>, step: F) -> Option<()>
where
    F: FnOnce() -> MedLogResult<()>,
{
    match step() {
        Ok(()) => Some(()),
        Err(e) => {
            warn!(step = context, error = %e, "secondary export step failed");
            warnings.push(Warning::new(context, e.to_string()));
            None
        }
    }
}
