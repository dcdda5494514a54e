//! File-level ingestion.
//!
//! Reads a complete log and its optional violation annotations, runs the
//! single aggregation pass, and merges the conjectures into the model.
//! A missing or empty log yields no model at all.

use crate::aggregator::{build_trace_model, Diagnostics};
use crate::parser::{parse_conjectures, TraceModel};
use crate::utils::config::VIOLATIONS_SUFFIX;
use crate::utils::error::IngestError;
use log::{debug, info, warn};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Result of one ingestion call
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedTrace {
    pub model: TraceModel,
    pub diagnostics: Diagnostics,
}

/// Ingest log content held in memory
///
/// **Public** - pure and deterministic for the same input
///
/// # Arguments
/// * `log` - Complete log content
/// * `annotations` - Content of the violation annotation file, if any
///
/// # Returns
/// `None` if the log is empty
pub fn ingest_str(log: &str, annotations: Option<&str>) -> Option<IngestedTrace> {
    if log.trim().is_empty() {
        debug!("Log is empty, nothing to ingest");
        return None;
    }

    let (mut model, mut diagnostics) = build_trace_model(log.lines());

    if let Some(content) = annotations {
        merge_violations(&mut model, &mut diagnostics, content);
    }

    Some(IngestedTrace { model, diagnostics })
}

/// Ingest a log file and its sibling annotation file
///
/// **Public** - main entry point for callers holding a path
///
/// # Returns
/// * `Ok(None)` - the log does not exist or is empty
/// * `Ok(Some(trace))` - the ingested trace
///
/// # Errors
/// * `IngestError::Io` - the log exists but cannot be read
/// * `IngestError::InvalidEncoding` - the log is not UTF-8
///
/// Problems with the annotation file never fail ingestion.
pub fn ingest_file(path: impl AsRef<Path>) -> Result<Option<IngestedTrace>, IngestError> {
    let path = path.as_ref();
    info!("Ingesting log: {}", path.display());

    let Some(log) = read_optional(path)? else {
        warn!("Log file not found: {}", path.display());
        return Ok(None);
    };

    let annotation_path = violations_path(path);
    let (annotations, read_warning) = match read_optional(&annotation_path) {
        Ok(content) => (content, None),
        Err(e) => {
            warn!("Ignoring violation annotations: {}", e);
            (None, Some(e.to_string()))
        }
    };
    if annotations.is_some() {
        debug!("Found violation annotations: {}", annotation_path.display());
    }

    let mut trace = ingest_str(&log, annotations.as_deref());
    if let (Some(trace), Some(warning)) = (trace.as_mut(), read_warning) {
        trace.diagnostics.annotation_warnings.push(warning);
    }

    if let Some(trace) = &trace {
        info!(
            "Ingested {} events on {} processors ({} conjectures)",
            trace.model.events.len(),
            trace.model.timelines.len(),
            trace.model.conjectures.len()
        );
    }

    Ok(trace)
}

/// Path of the annotation file belonging to a log
pub fn violations_path(log_path: &Path) -> PathBuf {
    let mut name = OsString::from(log_path.as_os_str());
    name.push(VIOLATIONS_SUFFIX);
    PathBuf::from(name)
}

/// Attach the conjectures found in `content` to the model
///
/// **Private** - malformed lines become diagnostics warnings
fn merge_violations(model: &mut TraceModel, diagnostics: &mut Diagnostics, content: &str) {
    let (conjectures, errors) = parse_conjectures(content);
    debug!(
        "Merged {} conjectures ({} malformed lines)",
        conjectures.len(),
        errors.len()
    );

    model.conjectures = conjectures;
    diagnostics
        .annotation_warnings
        .extend(errors.into_iter().map(|e| e.to_string()));
}

/// Read a UTF-8 file, mapping "not found" to `None`
fn read_optional(path: &Path) -> Result<Option<String>, IngestError> {
    match std::fs::read(path) {
        Ok(bytes) => String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| IngestError::InvalidEncoding(path.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(IngestError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
