//! Export module for medlog
//!
//! Turns a medication log into output artifacts:
//! - Document: the filled template, always written
//! - PDF: rendered from the document, best effort
//! - CSV: a flat spreadsheet built straight from the log

pub mod csv;
pub mod service;

pub use self::csv::{export_log_csv, write_log_csv, ENTRY_HEADERS};
pub use service::{
    export_basename, ExportOptions, ExportOutcome, ExportService, DATA_FONT_SIZE,
    IMAGE_MAX_WIDTH_IN,
};
