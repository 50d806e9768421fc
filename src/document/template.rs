//! Template documents and placeholder substitution
//!
//! A template is a [`Document`] holding at least three tables: tables 0 and
//! 1 carry patient and medication header fields, table 2 is the
//! administration table laid out as described in [`crate::layout`].
//! Header fields are `{{Token}}` placeholders inside cell text.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{MedLogError, MedLogResult};
use crate::layout::{BASE_TABLE_ROWS, TABLE_COLUMNS};
use crate::models::{MedicationLog, Profile};
use crate::storage::write_json_atomic;

use super::model::{Block, Document, Table};

/// Index of the administration table among a template's tables
pub const ADMIN_TABLE_INDEX: usize = 2;

/// Tables a usable template must contain
pub const REQUIRED_TABLES: usize = 3;

/// Placeholder tokens recognized in templates
pub const TOKENS: [&str; 13] = [
    "{{ChildName}}",
    "{{FosterHome}}",
    "{{DateMY}}",
    "{{AllergyContras}}",
    "{{Prescriber}}",
    "{{PrescriberPhone}}",
    "{{Pharmacy}}",
    "{{PharmacyPhone}}",
    "{{MedicineName}}",
    "{{Strength}}",
    "{{Dosage}}",
    "{{ReasonPrescribed}}",
    "{{ReasonPRN}}",
];

/// Ordered token → value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacements {
    pairs: Vec<(String, String)>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header values for one patient's log
    pub fn for_log(profile: &Profile, log: &MedicationLog) -> Self {
        let info = &profile.info;
        let mut replacements = Self::new();
        replacements.insert("{{ChildName}}", &info.child_name);
        replacements.insert("{{FosterHome}}", &info.foster_home);
        replacements.insert("{{DateMY}}", &log.month_year);
        replacements.insert("{{AllergyContras}}", &info.allergies);
        replacements.insert("{{Prescriber}}", &info.prescriber_name);
        replacements.insert("{{PrescriberPhone}}", &info.prescriber_phone);
        replacements.insert("{{Pharmacy}}", &info.pharmacy);
        replacements.insert("{{PharmacyPhone}}", &info.pharmacy_phone);
        replacements.insert("{{MedicineName}}", &log.medicine_name);
        replacements.insert("{{Strength}}", &log.strength);
        replacements.insert("{{Dosage}}", &log.dosage);
        replacements.insert("{{ReasonPrescribed}}", &log.reason_prescribed);
        replacements.insert("{{ReasonPRN}}", &log.reason_prn);
        replacements
    }

    /// Set a token's value, replacing any earlier value
    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) {
        let token = token.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(t, _)| *t == token) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((token, value)),
        }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, v)| v.as_str())
    }

    /// Substitute every occurrence of every token; `None` if nothing matched
    pub fn substitute(&self, text: &str) -> Option<String> {
        if !self.pairs.iter().any(|(token, _)| text.contains(token.as_str())) {
            return None;
        }
        let mut result = text.to_string();
        for (token, value) in &self.pairs {
            if result.contains(token.as_str()) {
                result = result.replace(token.as_str(), value);
            }
        }
        Some(result)
    }
}

/// Something placeholder values can be written into
pub trait TemplateSink {
    /// Apply the replacements, returning how many cells changed
    fn apply(&mut self, replacements: &Replacements) -> usize;
}

impl TemplateSink for Table {
    fn apply(&mut self, replacements: &Replacements) -> usize {
        let mut changed = 0;
        for cell in self.cells_mut() {
            if let Some(text) = replacements.substitute(&cell.text) {
                cell.text = text;
                changed += 1;
            }
        }
        changed
    }
}

/// A loaded template being filled in for export
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDocument {
    document: Document,
    /// Administration table as loaded, before any filling
    pristine_admin: Table,
}

impl TemplateDocument {
    /// Wrap a document after checking the template contract
    pub fn from_document(document: Document) -> MedLogResult<Self> {
        let tables = document.tables();
        if tables.len() < REQUIRED_TABLES {
            return Err(MedLogError::InvalidTemplate(format!(
                "expected at least {} tables, found {}",
                REQUIRED_TABLES,
                tables.len()
            )));
        }

        let admin = tables[ADMIN_TABLE_INDEX];
        if admin.row_count() < BASE_TABLE_ROWS {
            return Err(MedLogError::InvalidTemplate(format!(
                "administration table needs {} rows, found {}",
                BASE_TABLE_ROWS,
                admin.row_count()
            )));
        }
        if let Some(short) = admin.rows.iter().position(|row| row.len() < TABLE_COLUMNS) {
            return Err(MedLogError::InvalidTemplate(format!(
                "administration table row {} has fewer than {} columns",
                short, TABLE_COLUMNS
            )));
        }

        let pristine_admin = admin.clone();
        Ok(Self {
            document,
            pristine_admin,
        })
    }

    /// Load a template from a JSON document file
    pub fn load(path: &Path) -> MedLogResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MedLogError::file_not_found(path.display().to_string())
            } else {
                MedLogError::Io(format!("Failed to read {}: {}", path.display(), e))
            }
        })?;
        let document: Document = serde_json::from_str(&contents).map_err(|e| {
            MedLogError::InvalidTemplate(format!("{}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "loaded template");
        Self::from_document(document)
    }

    /// The standard medication log template
    pub fn builtin() -> Self {
        let document = standard_template();
        let pristine_admin = document.tables()[ADMIN_TABLE_INDEX].clone();
        Self {
            document,
            pristine_admin,
        }
    }

    /// Load `path` if given, else use the built-in template
    pub fn load_or_builtin(path: Option<&Path>) -> MedLogResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn tables(&self) -> Vec<&Table> {
        self.document.tables()
    }

    pub fn table_mut(&mut self, index: usize) -> MedLogResult<&mut Table> {
        self.document
            .table_mut(index)
            .ok_or_else(|| MedLogError::InvalidTemplate(format!("no table at index {}", index)))
    }

    /// Replace tokens in every table of the document
    pub fn replace_tokens(&mut self, replacements: &Replacements) -> usize {
        self.apply(replacements)
    }

    /// Append a page break, a heading and a fresh copy of the administration table
    ///
    /// The copy is taken from the template as loaded, so it still carries
    /// its placeholders. Returns the new table's index.
    pub fn clone_table_section(&mut self, heading: impl Into<String>) -> usize {
        self.document.add_page_break();
        self.document.add_heading(heading, 2);
        self.document.add_table(self.pristine_admin.clone())
    }

    pub fn set_cell(
        &mut self,
        table: usize,
        row: usize,
        column: usize,
        text: impl Into<String>,
        font_size: Option<f32>,
    ) -> MedLogResult<()> {
        self.table_mut(table)?.set_cell(row, column, text, font_size)
    }

    /// Append a captioned image
    pub fn add_image(&mut self, path: PathBuf, caption: impl Into<String>, max_width_in: f32) {
        self.document.add_paragraph(caption, Some(10.0), true);
        self.document.push(Block::Image { path, max_width_in });
    }

    pub fn add_page_break(&mut self) {
        self.document.add_page_break();
    }

    pub fn add_heading(&mut self, text: impl Into<String>, level: u8) {
        self.document.add_heading(text, level);
    }

    /// Write the document as pretty JSON
    pub fn save(&self, path: &Path) -> MedLogResult<()> {
        write_json_atomic(path, &self.document)
    }
}

impl TemplateSink for TemplateDocument {
    fn apply(&mut self, replacements: &Replacements) -> usize {
        let mut changed = 0;
        for block in &mut self.document.blocks {
            match block {
                Block::Table(table) => changed += table.apply(replacements),
                Block::Heading { text, .. } | Block::Paragraph { text, .. } => {
                    if let Some(new_text) = replacements.substitute(text) {
                        *text = new_text;
                        changed += 1;
                    }
                }
                Block::PageBreak | Block::Image { .. } => {}
            }
        }
        changed
    }
}

fn standard_template() -> Document {
    let mut doc = Document {
        title: "Medication Administration Record".into(),
        blocks: Vec::new(),
    };

    doc.add_heading("Medication Administration Record", 1);
    doc.add_table(Table::from_rows(vec![
        vec!["Child Name:", "{{ChildName}}", "Foster Home:", "{{FosterHome}}"],
        vec!["Month/Year:", "{{DateMY}}", "Allergies:", "{{AllergyContras}}"],
    ]));
    doc.add_table(Table::from_rows(vec![
        vec!["Prescriber:", "{{Prescriber}}", "Phone:", "{{PrescriberPhone}}"],
        vec!["Pharmacy:", "{{Pharmacy}}", "Phone:", "{{PharmacyPhone}}"],
        vec!["Medication:", "{{MedicineName}}", "Strength:", "{{Strength}}"],
        vec!["Dosage:", "{{Dosage}}", "Reason Prescribed:", "{{ReasonPrescribed}}"],
        vec!["Reason PRN:", "{{ReasonPRN}}", "", ""],
    ]));
    doc.add_table(admin_table());
    doc
}

fn admin_table() -> Table {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(BASE_TABLE_ROWS);

    let mut header = vec!["{{DateMY}}".to_string()];
    header.extend((1..TABLE_COLUMNS).map(|day| day.to_string()));
    rows.push(header);

    for slot in 0..3 {
        if slot > 0 {
            rows.push(labeled_row(&format!("Admin {}:", slot + 1)));
        }
        for label in ["Time:", "Initials:", "Amount Remaining:"] {
            rows.push(labeled_row(label));
        }
    }

    Table::from_rows(rows)
}

fn labeled_row(label: &str) -> Vec<String> {
    let mut row = vec![String::new(); TABLE_COLUMNS];
    row[0] = label.to_string();
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MedicationInfo, ProfileInfo};
    use tempfile::TempDir;

    fn sample_replacements() -> Replacements {
        let mut info = ProfileInfo::new("Jane Doe");
        info.foster_home = "Maple House".into();
        let profile = Profile::new("jane_doe", info);
        let mut med = MedicationInfo::new("Melatonin");
        med.strength = "3 mg".into();
        let log = MedicationLog::new("jane_doe", "March 2025", med);
        Replacements::for_log(&profile, &log)
    }

    #[test]
    fn test_builtin_geometry() {
        let template = TemplateDocument::builtin();
        let tables = template.tables();
        assert_eq!(tables.len(), 3);

        let admin = tables[ADMIN_TABLE_INDEX];
        assert_eq!(admin.row_count(), BASE_TABLE_ROWS);
        assert!(admin.rows.iter().all(|row| row.len() == TABLE_COLUMNS));
        assert_eq!(admin.rows[0][31].text, "31");
        assert_eq!(admin.rows[1][0].text, "Time:");
        assert_eq!(admin.rows[4][0].text, "Admin 2:");
        assert_eq!(admin.rows[11][0].text, "Amount Remaining:");

        assert!(TemplateDocument::from_document(template.into_document()).is_ok());
    }

    #[test]
    fn test_every_token_in_builtin() {
        let json = serde_json::to_string(TemplateDocument::builtin().document()).unwrap();
        for token in TOKENS {
            assert!(json.contains(token), "missing {}", token);
        }
    }

    #[test]
    fn test_replacements_cover_all_tokens() {
        let replacements = sample_replacements();
        for token in TOKENS {
            assert!(replacements.get(token).is_some(), "missing {}", token);
        }
        assert_eq!(replacements.get("{{Strength}}"), Some("3 mg"));
    }

    #[test]
    fn test_substitute_all_occurrences() {
        let replacements = sample_replacements();
        assert_eq!(
            replacements.substitute("{{ChildName}} / {{ChildName}} @ {{FosterHome}}"),
            Some("Jane Doe / Jane Doe @ Maple House".to_string())
        );
        assert_eq!(replacements.substitute("no tokens"), None);
    }

    #[test]
    fn test_replace_tokens_fills_document() {
        let mut template = TemplateDocument::builtin();
        let changed = template.replace_tokens(&sample_replacements());
        assert!(changed >= TOKENS.len());

        let json = serde_json::to_string(template.document()).unwrap();
        assert!(!json.contains("{{"));
        assert!(json.contains("Jane Doe"));
        assert_eq!(template.tables()[ADMIN_TABLE_INDEX].rows[0][0].text, "March 2025");
    }

    #[test]
    fn test_clone_table_section_uses_pristine_copy() {
        let mut template = TemplateDocument::builtin();
        template.replace_tokens(&sample_replacements());
        template.set_cell(ADMIN_TABLE_INDEX, 1, 5, "8:00 AM", Some(8.0)).unwrap();

        let index = template.clone_table_section("Continuation");
        assert_eq!(index, 3);

        let copy = template.tables()[index];
        assert_eq!(copy.rows[0][0].text, "{{DateMY}}");
        assert_eq!(copy.rows[1][5].text, "");
        assert!(matches!(
            template.document().blocks[template.document().blocks.len() - 3],
            Block::PageBreak
        ));
    }

    #[test]
    fn test_set_cell_out_of_bounds() {
        let mut template = TemplateDocument::builtin();
        assert!(template.set_cell(ADMIN_TABLE_INDEX, 12, 1, "x", None).is_err());
        assert!(template.set_cell(9, 0, 0, "x", None).is_err());
    }

    #[test]
    fn test_rejects_short_templates() {
        let mut doc = Document::default();
        doc.add_table(Table::from_rows(vec![vec!["a"]]));
        doc.add_table(Table::from_rows(vec![vec!["b"]]));
        let err = TemplateDocument::from_document(doc.clone()).unwrap_err();
        assert!(matches!(err, MedLogError::InvalidTemplate(_)));

        doc.add_table(Table::from_rows(vec![vec!["too small"]]));
        let err = TemplateDocument::from_document(doc).unwrap_err();
        assert!(matches!(err, MedLogError::InvalidTemplate(_)));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("template.json");

        let template = TemplateDocument::builtin();
        template.save(&path).unwrap();
        let loaded = TemplateDocument::load(&path).unwrap();
        assert_eq!(loaded, template);

        assert!(TemplateDocument::load(&temp_dir.path().join("missing.json"))
            .unwrap_err()
            .is_not_found());

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            TemplateDocument::load(&path).unwrap_err(),
            MedLogError::InvalidTemplate(_)
        ));
    }
}
