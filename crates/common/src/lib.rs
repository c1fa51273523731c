//! Common types and utilities for oasify
//!
//! This crate contains the shared error type, conversion options and the
//! logging collaborator used across the parser, generator, and CLI components.

pub mod log;
pub mod options;

pub use log::{ConversionLog, RecordingLog, SilentLog};
pub use options::{ConvertOptions, InfoOverride, DEFAULT_TAG};

use thiserror::Error;

/// Errors that can occur while converting a collection
#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for converter operations
pub type Result<T> = std::result::Result<T, ConverterError>;
