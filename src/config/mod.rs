//! Configuration module for medlog
//!
//! This module provides configuration management including:
//! - Path resolution for user data
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::MedLogPaths;
pub use settings::Settings;
