//! Spreadsheet export
//!
//! Writes a medication log as CSV: a header block describing the
//! medication, a blank row, then one row per administration. This path
//! never touches the document template.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use ::csv::WriterBuilder;

use crate::error::{MedLogError, MedLogResult};
use crate::models::MedicationLog;

/// Column headings of the entry table
pub const ENTRY_HEADERS: [&str; 4] = ["Day", "Time", "Initials", "Amount Remaining"];

/// Write a log as CSV to any writer
pub fn export_log_csv<W: Write>(log: &MedicationLog, writer: W) -> MedLogResult<()> {
    let mut csv = WriterBuilder::new().flexible(true).from_writer(writer);
    let export_err = |e: ::csv::Error| MedLogError::Export(e.to_string());

    let header_block = [
        ("Medicine Name", log.medicine_name.as_str()),
        ("Strength", log.strength.as_str()),
        ("Dosage", log.dosage.as_str()),
        ("Month/Year", log.month_year.as_str()),
        ("Reason Prescribed", log.reason_prescribed.as_str()),
        ("Reason PRN", log.reason_prn.as_str()),
    ];
    for (label, value) in header_block {
        csv.write_record([label, value]).map_err(export_err)?;
    }

    csv.write_record([""]).map_err(export_err)?;
    csv.write_record(ENTRY_HEADERS).map_err(export_err)?;

    for entry in &log.administration_log {
        csv.write_record([
            entry.day.to_string().as_str(),
            entry.time.as_str(),
            entry.initials.as_str(),
            entry.amount_remaining.as_str(),
        ])
        .map_err(export_err)?;
    }

    csv.flush()
        .map_err(|e| MedLogError::Export(e.to_string()))
}

/// Write a log as CSV to `path`
pub fn write_log_csv(log: &MedicationLog, path: &Path) -> MedLogResult<()> {
    let file = File::create(path).map_err(|e| {
        MedLogError::Export(format!("Cannot create {}: {}", path.display(), e))
    })?;
    export_log_csv(log, file)
}
