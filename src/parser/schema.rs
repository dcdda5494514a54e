//! Trace model definitions.
//!
//! This module defines the canonical in-memory trace handed to the rendering
//! layer. The model is built once per ingestion and never mutated afterwards.

use super::conjecture::ValidationConjecture;
use super::event::{EventKind, LogEvent};
use crate::utils::config::{VIRTUAL_BUS_ID, VIRTUAL_BUS_NAME, VIRTUAL_CPU_ID, VIRTUAL_CPU_NAME};
use serde::{Deserialize, Serialize};

/// Strictly increasing sequence of distinct event-bearing instants
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimestampSequence(Vec<u64>);

impl TimestampSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an instant; only values above the running maximum are appended
    pub fn observe(&mut self, time: u64) {
        if self.0.last().map_or(true, |last| time > *last) {
            self.0.push(time);
        }
    }

    pub fn last(&self) -> Option<u64> {
        self.0.last().copied()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A declared (or synthesized) processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorDecl {
    pub id: i64,
    pub name: String,

    /// Explicitly declared in the model (as opposed to the runtime default)
    #[serde(rename = "expl")]
    pub explicit: bool,

    /// System the processor belongs to
    #[serde(rename = "sys")]
    pub system: String,

    pub time: u64,

    /// Inferred by the engine, not present in the log
    #[serde(default)]
    pub synthetic: bool,
}

impl ProcessorDecl {
    /// Build a declaration from a `CPUdecl` event
    ///
    /// # Returns
    /// `None` if the event is not a processor declaration or lacks an id
    pub fn from_event(event: &LogEvent) -> Option<Self> {
        if event.kind != EventKind::ProcessorDeclared {
            return None;
        }

        Some(Self {
            id: event.id?,
            name: event.name.clone().unwrap_or_default(),
            explicit: event.expl.unwrap_or(false),
            system: event.sys.clone().unwrap_or_default(),
            time: event.time,
            synthetic: false,
        })
    }

    /// The default processor inferred when id 0 is used without a declaration
    pub fn virtual_cpu() -> Self {
        Self {
            id: VIRTUAL_CPU_ID,
            name: VIRTUAL_CPU_NAME.to_string(),
            explicit: false,
            system: String::new(),
            time: 0,
            synthetic: true,
        }
    }
}

/// A declared (or synthesized) bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusDecl {
    pub id: i64,
    pub name: String,

    /// Processor ids connected by this bus
    #[serde(rename = "topo")]
    pub topology: Vec<i64>,

    pub time: u64,

    #[serde(default)]
    pub synthetic: bool,
}

impl BusDecl {
    /// Build a declaration from a `BUSdecl` event
    pub fn from_event(event: &LogEvent) -> Option<Self> {
        if event.kind != EventKind::BusDeclared {
            return None;
        }

        Some(Self {
            id: event.id?,
            name: event.name.clone().unwrap_or_default(),
            topology: event.topo.clone().unwrap_or_default(),
            time: event.time,
            synthetic: false,
        })
    }

    /// The virtual bus carrying direct processor-to-processor messages
    pub fn virtual_bus(topology: Vec<i64>) -> Self {
        Self {
            id: VIRTUAL_BUS_ID,
            name: VIRTUAL_BUS_NAME.to_string(),
            topology,
            time: 0,
            synthetic: true,
        }
    }
}

/// Activity of a single processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorTimeline {
    pub id: i64,

    /// Display name, back-filled from the processor declaration (empty if undeclared)
    pub name: String,

    /// Events owned by this processor, in log order
    pub events: Vec<LogEvent>,

    /// Distinct instants at which this processor had activity
    pub timestamps: TimestampSequence,
}

impl ProcessorTimeline {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            name: String::new(),
            events: Vec::new(),
            timestamps: TimestampSequence::new(),
        }
    }

    /// Append an owned event and record its instant
    pub fn push(&mut self, event: LogEvent) {
        self.timestamps.observe(event.time);
        self.events.push(event);
    }
}

/// Root of the ingested trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceModel {
    /// Every classified event, in log order
    pub events: Vec<LogEvent>,

    /// Processor declarations sorted by id, synthesized ones included
    pub processors: Vec<ProcessorDecl>,

    /// Bus declarations sorted by id, the virtual bus included
    pub buses: Vec<BusDecl>,

    /// Per-processor timelines sorted by id
    pub timelines: Vec<ProcessorTimeline>,

    /// Global distinct timestamps
    pub timestamps: TimestampSequence,

    /// Correctness-violation annotations
    pub conjectures: Vec<ValidationConjecture>,
}

impl TraceModel {
    pub fn processor(&self, id: i64) -> Option<&ProcessorDecl> {
        self.processors.iter().find(|p| p.id == id)
    }

    pub fn bus(&self, id: i64) -> Option<&BusDecl> {
        self.buses.iter().find(|b| b.id == id)
    }

    pub fn timeline(&self, id: i64) -> Option<&ProcessorTimeline> {
        self.timelines.iter().find(|t| t.id == id)
    }

    /// Events of one kind, in log order
    pub fn events_of(&self, kind: EventKind) -> impl Iterator<Item = &LogEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }
}
