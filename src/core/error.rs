use std::io;
use thiserror::Error;

/// Host-side and contract failures. Data problems found while ingesting are
/// reported as [`crate::importer::ImportIssue`] values, never through this type.
#[derive(Error, Debug)]
pub enum CasebookError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Unsupported format: '{0}' (expected one of: csv, xlsx, json)")]
    UnsupportedFormat(String),
    #[error("Not found: {0}")]
    NotFound(String),
}
