//! RT Log Studio CLI
//!
//! Ingests real-time execution logs and exports the reconstructed
//! per-processor trace as JSON for timing-diagram rendering.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use rtlog_studio::commands::{
    display_schema, display_version, execute_parse, list_logs, validate_args,
    validate_trace_file, ParseArgs,
};

/// RT Log Studio - trace ingestion for real-time distributed runtimes
#[derive(Parser, Debug)]
#[command(name = "rtlog")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest a log and export its trace
    Parse {
        /// Real-time log file (violations are read from <log>.violations)
        #[arg(short, long, env = "RTLOG_FILE")]
        log: PathBuf,

        /// Output path for the JSON trace
        #[arg(short, long, default_value = "trace.json")]
        output: PathBuf,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// List real-time log files
    List {
        /// Directory to search (defaults to .generated/rtlogs)
        #[arg(short, long, env = "RTLOG_DIR")]
        dir: Option<PathBuf>,
    },

    /// Validate a trace JSON file
    Validate {
        /// Path to trace JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Parse {
            log,
            output,
            summary,
        } => {
            let args = ParseArgs {
                log_path: log,
                output_json: output,
                print_summary: summary,
            };

            validate_args(&args)?;

            if !execute_parse(&args)? {
                println!("Nothing to display: {} is missing or empty", args.log_path.display());
            }
        }

        Commands::List { dir } => {
            list_logs(dir.as_deref())?;
        }

        Commands::Validate { file } => {
            validate_trace_file(&file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
