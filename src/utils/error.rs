//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a trace from storage
///
/// A missing or empty log is not an error; ingestion yields no model instead.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File is not valid UTF-8: {0}")]
    InvalidEncoding(PathBuf),
}

/// A single annotation line that could not be parsed
///
/// Never aborts ingestion; collected as a warning in the diagnostics.
#[derive(Error, Debug)]
#[error("Malformed violation annotation on line {line}: {source}")]
pub struct AnnotationError {
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
