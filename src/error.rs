//! Custom error types for medlog
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions, plus the `Warning` value returned by
//! best-effort steps that must not abort the surrounding operation.

use std::fmt;

use thiserror::Error;

/// The main error type for medlog operations
#[derive(Error, Debug)]
pub enum MedLogError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization errors for in-memory values
    #[error("JSON error: {0}")]
    Json(String),

    /// A stored file exists but cannot be parsed
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// Validation errors for input data
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    AlreadyExists {
        entity_type: &'static str,
        identifier: String,
    },

    /// Template is missing required structure
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// Secondary format conversion failed
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl MedLogError {
    /// Create a "not found" error for medication logs
    pub fn log_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Medication log",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for administration entries
    pub fn entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Administration entry",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for medication cards
    pub fn card_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Medication card",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for profiles
    pub fn profile_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Profile",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for files on disk
    pub fn file_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "File",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for MedLogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MedLogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for medlog operations
pub type MedLogResult<T> = Result<T, MedLogError>;

/// A degraded best-effort step
///
/// Returned instead of an error when a side operation (PDF conversion,
/// spreadsheet output, image cleanup) fails but the primary operation
/// has already succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Which step degraded (e.g. "pdf", "spreadsheet", "images")
    pub context: &'static str,
    /// Human-readable reason
    pub message: String,
}

impl Warning {
    pub fn new(context: &'static str, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.message)
    }
}
