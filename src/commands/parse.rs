//! Parse command implementation.
//!
//! The parse command:
//! 1. Ingests the log and its violation annotations
//! 2. Reports diagnostics
//! 3. Writes the trace export
//! 4. Optionally prints a text summary

use super::models::ParseArgs;
use crate::ingest::{ingest_file, IngestedTrace};
use crate::output::{write_trace, TraceExport};
use crate::utils::config::LOG_FILE_EXTENSION;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the parse command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// `Ok(true)` if a trace was written, `Ok(false)` if the log was missing or
/// empty (nothing to display)
pub fn execute_parse(args: &ParseArgs) -> Result<bool> {
    let start_time = Instant::now();

    info!("Step 1/3: Ingesting {}...", args.log_path.display());
    let trace = ingest_file(&args.log_path)
        .with_context(|| format!("Failed to ingest {}", args.log_path.display()))?;

    let Some(trace) = trace else {
        warn!("Nothing to display: {} is missing or empty", args.log_path.display());
        return Ok(false);
    };

    info!("Step 2/3: Reviewing diagnostics...");
    report_diagnostics(&trace);

    info!("Step 3/3: Writing trace export...");
    let export = TraceExport::new(&trace, &args.log_path);
    write_trace(&export, &args.output_json).context("Failed to write trace JSON")?;
    info!("✓ Trace written to: {}", args.output_json.display());

    if args.print_summary {
        println!("{}", format_summary(&trace));
    }

    info!("Parse completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(true)
}

/// Validate parse arguments
///
/// **Public** - can be called before execute_parse for early validation
pub fn validate_args(args: &ParseArgs) -> Result<()> {
    if args.log_path.as_os_str().is_empty() {
        anyhow::bail!("Log path cannot be empty");
    }

    if args.log_path.is_dir() {
        anyhow::bail!("Log path is a directory: {}", args.log_path.display());
    }

    if args.output_json.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    if args.log_path.extension().and_then(|e| e.to_str()) != Some(LOG_FILE_EXTENSION) {
        debug!(
            "Log file does not have .{} extension: {}",
            LOG_FILE_EXTENSION,
            args.log_path.display()
        );
    }

    Ok(())
}

/// Log per-ingestion diagnostics
///
/// **Private** - unknown kinds are already reported by the aggregator
fn report_diagnostics(trace: &IngestedTrace) {
    let diagnostics = &trace.diagnostics;

    if diagnostics.orphaned_completions > 0 {
        warn!(
            "{} completions had no matching request",
            diagnostics.orphaned_completions
        );
    }
    if diagnostics.unfinished_calls > 0 {
        info!("{} calls were never completed", diagnostics.unfinished_calls);
    }
    for warning in &diagnostics.annotation_warnings {
        warn!("{}", warning);
    }
}

/// Render a text summary of an ingested trace
pub fn format_summary(trace: &IngestedTrace) -> String {
    let model = &trace.model;
    let rule = "=".repeat(60);
    let mut lines = vec![
        rule.clone(),
        "TRACE SUMMARY".to_string(),
        rule.clone(),
        format!("Events:      {}", model.events.len()),
        format!("Processors:  {}", model.processors.len()),
        format!("Buses:       {}", model.buses.len()),
        format!("Instants:    {}", model.timestamps.len()),
        format!("Conjectures: {}", model.conjectures.len()),
        String::new(),
    ];

    for timeline in &model.timelines {
        let name = if timeline.name.is_empty() {
            "<undeclared>"
        } else {
            timeline.name.as_str()
        };
        lines.push(format!(
            "  CPU {:>3} {:<16} {:>6} events",
            timeline.id,
            name,
            timeline.events.len()
        ));
    }

    let failed = model.conjectures.iter().filter(|c| !c.status).count();
    if failed > 0 {
        lines.push(String::new());
        lines.push(format!("Violated conjectures: {}", failed));
        for conjecture in model.conjectures.iter().filter(|c| !c.status) {
            lines.push(format!("  {}: {}", conjecture.name, conjecture.expression));
        }
    }

    lines.push(rule);
    lines.join("\n")
}
