//! RT Log Studio
//!
//! Ingestion and correlation engine for execution logs produced by a
//! real-time distributed runtime (processors, buses, threads, messages).
//!
//! A complete log is tokenized, classified, correlated and grouped into
//! per-processor timelines in one pass; violation annotations stored next
//! to the log are merged in afterwards.
//!
//! ## Getting Started
//!
//! ```no_run
//! use rtlog_studio::ingest::ingest_file;
//!
//! if let Some(trace) = ingest_file("run.rtlog")? {
//!     for timeline in &trace.model.timelines {
//!         println!("{} {}: {} events", timeline.id, timeline.name, timeline.events.len());
//!     }
//! }
//! # Ok::<(), rtlog_studio::utils::IngestError>(())
//! ```

pub mod aggregator;
pub mod commands;
pub mod ingest;
pub mod output;
pub mod parser;
pub mod utils;
