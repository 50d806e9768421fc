//! medlog - Medication administration logs for foster care
//!
//! This library records monthly medication administration logs per
//! patient, keeps reusable medication cards with reference images, and
//! exports logs as filled template documents with optional PDF and
//! spreadsheet output.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types and best-effort warnings
//! - `models`: Profiles, medication logs, entries and cards
//! - `storage`: JSON file storage with atomic writes
//! - `layout`: Placement of entries on the administration table
//! - `document`: Template documents and PDF rendering
//! - `export`: Export orchestration and spreadsheet output
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use medlog::config::{MedLogPaths, Settings};
//! use medlog::storage::Storage;
//!
//! let paths = MedLogPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod document;
pub mod error;
pub mod export;
pub mod layout;
pub mod models;
pub mod storage;

pub use error::{MedLogError, MedLogResult, Warning};
