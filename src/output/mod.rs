//! Output writers for ingested traces.
//!
//! Traces are exported as pretty-printed JSON for the rendering layer.

pub mod json;

// Re-export main functions
pub use json::{read_trace, trace_to_string, write_trace, TraceExport};
