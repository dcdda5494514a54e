//! CLI command implementations.
//!
//! Commands orchestrate the library components to perform user tasks.

pub mod models;
pub mod parse;
pub mod utils;

// Re-export main command functions
pub use models::ParseArgs;
pub use parse::{execute_parse, format_summary, validate_args};
pub use utils::{discover_logs, display_schema, display_version, list_logs, validate_trace_file};
