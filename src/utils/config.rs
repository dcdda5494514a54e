//! Configuration and constants for the log format and the CLI.

/// Current export schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Separates the event kind tag from the field list on every event line
pub const FIELD_SEPARATOR: &str = "->";

/// Stands in for an extracted quoted string while the content is split on whitespace.
/// NUL never occurs in a text log line.
pub const STRING_PLACEHOLDER: char = '\u{0}';

/// Suffix appended to the log path to find its violation annotations
pub const VIOLATIONS_SUFFIX: &str = ".violations";

/// Extension of real-time log files
pub const LOG_FILE_EXTENSION: &str = "rtlog";

/// Default directory searched by `rtlog list`
pub const DEFAULT_LOG_DIR: &str = ".generated/rtlogs";

// Synthetic topology elements
pub const VIRTUAL_BUS_ID: i64 = 0;
pub const VIRTUAL_BUS_NAME: &str = "vBUS";
pub const VIRTUAL_CPU_ID: i64 = 0;
pub const VIRTUAL_CPU_NAME: &str = "vCPU";
