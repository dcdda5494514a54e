use std::path::PathBuf;

/// Arguments for the parse command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ParseArgs {
    /// Real-time log to ingest
    pub log_path: PathBuf,

    /// Output path for the JSON trace export
    pub output_json: PathBuf,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for ParseArgs {
    fn default() -> Self {
        Self {
            log_path: PathBuf::new(),
            output_json: PathBuf::from("trace.json"),
            print_summary: false,
        }
    }
}
