//! Document backend
//!
//! Templates and exported logs are [`Document`]s: JSON files of headings,
//! paragraphs, tables and images. [`TemplateDocument`] fills a template;
//! [`PdfConverter`] renders the result to PDF.

pub mod model;
pub mod pdf;
pub mod template;

pub use model::{Block, Cell, Document, Table};
pub use pdf::{render_pdf, DocumentConverter, PdfConverter};
pub use template::{
    Replacements, TemplateDocument, TemplateSink, ADMIN_TABLE_INDEX, REQUIRED_TABLES, TOKENS,
};
