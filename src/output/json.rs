//! JSON trace output writer.
//!
//! Writes ingested traces to JSON files inside a versioned envelope.

use crate::ingest::IngestedTrace;
use crate::parser::TraceModel;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Exported trace file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceExport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Log file the trace was ingested from
    pub log_file: String,

    /// Timestamp when the export was generated
    pub generated_at: String,

    /// Unknown event kinds seen during ingestion
    #[serde(default)]
    pub unknown_events: BTreeMap<String, usize>,

    pub trace: TraceModel,
}

impl TraceExport {
    /// Wrap an ingested trace for export
    pub fn new(trace: &IngestedTrace, log_file: impl AsRef<Path>) -> Self {
        use chrono::Utc;

        Self {
            version: SCHEMA_VERSION.to_string(),
            log_file: log_file.as_ref().display().to_string(),
            generated_at: Utc::now().to_rfc3339(),
            unknown_events: trace.diagnostics.unknown_events.clone(),
            trace: trace.model.clone(),
        }
    }
}

/// Write a trace export to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_trace(export: &TraceExport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing trace to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, export).map_err(OutputError::SerializationFailed)?;

    info!(
        "Trace written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Serialize a trace export to a JSON string
pub fn trace_to_string(export: &TraceExport) -> Result<String, OutputError> {
    serde_json::to_string_pretty(export).map_err(OutputError::SerializationFailed)
}

/// Read a trace export from a JSON file
///
/// **Public** - used by `validate`
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_trace(input_path: impl AsRef<Path>) -> Result<TraceExport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading trace from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let export: TraceExport =
        serde_json::from_reader(BufReader::new(file)).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Trace loaded: version {}, log {}",
        export.version, export.log_file
    );

    Ok(export)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
