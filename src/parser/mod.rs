//! Log parsing and trace model definitions.
//!
//! This module handles:
//! - Tokenizing raw log lines into fields
//! - Coercing field values into typed values
//! - Classifying lines into typed events
//! - Parsing violation annotations
//! - Defining the trace model

pub mod conjecture;
pub mod event;
pub mod schema;
pub mod tokenizer;
pub mod value;

// Re-export main types
pub use conjecture::{parse_conjectures, ConjectureTarget, ValidationConjecture};
pub use event::{Classifier, EventKind, LogEvent};
pub use schema::{BusDecl, ProcessorDecl, ProcessorTimeline, TimestampSequence, TraceModel};
pub use tokenizer::{tokenize_line, RawField, TokenizedLine};
pub use value::{coerce_value, parse_topology, FieldValue};
