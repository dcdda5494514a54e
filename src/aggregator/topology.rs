//! Implicit topology inference.
//!
//! The log never declares the channel used for direct processor-to-processor
//! messages (bus id 0), nor the runtime's default processor (id 0). Both are
//! synthesized here when the log implies them.

use crate::parser::{BusDecl, LogEvent, ProcessorDecl};
use crate::utils::config::{VIRTUAL_BUS_ID, VIRTUAL_CPU_ID};
use log::debug;

/// Unordered pair of processors exchanging messages without a declared bus
#[derive(Debug, Clone, Copy)]
pub struct TopologyEdge {
    pub from: i64,
    pub to: i64,
}

impl TopologyEdge {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    /// Both endpoints, in the order they were observed
    pub fn endpoints(&self) -> [i64; 2] {
        [self.from, self.to]
    }
}

impl PartialEq for TopologyEdge {
    fn eq(&self, other: &Self) -> bool {
        (self.from == other.from && self.to == other.to)
            || (self.from == other.to && self.to == other.from)
    }
}

impl Eq for TopologyEdge {}

/// Collects evidence of implicit topology during the ingestion pass
#[derive(Debug, Default)]
pub struct TopologySynthesizer {
    edges: Vec<TopologyEdge>,
    default_cpu_used: bool,
}

impl TopologySynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect one classified event
    pub fn observe(&mut self, event: &LogEvent) {
        if event.cpunm == Some(VIRTUAL_CPU_ID) {
            self.default_cpu_used = true;
        }

        if !event.kind.opens_call() || event.busid != Some(VIRTUAL_BUS_ID) {
            return;
        }

        match (event.fromcpu, event.tocpu) {
            (Some(from), Some(to)) => {
                let edge = TopologyEdge::new(from, to);
                if !self.edges.contains(&edge) {
                    self.edges.push(edge);
                }
            }
            _ => debug!(
                "{} at {} on the virtual bus lacks fromcpu/tocpu",
                event.kind.tag(),
                event.time
            ),
        }
    }

    /// Recorded edges, deduplicated, in first-seen order
    pub fn edges(&self) -> &[TopologyEdge] {
        &self.edges
    }

    /// The synthetic bus, if any direct message was seen
    ///
    /// Its topology lists every processor in any edge, first-seen order, no repeats.
    pub fn virtual_bus(&self) -> Option<BusDecl> {
        if self.edges.is_empty() {
            return None;
        }

        let mut topology: Vec<i64> = Vec::new();
        for id in self.edges.iter().flat_map(TopologyEdge::endpoints) {
            if !topology.contains(&id) {
                topology.push(id);
            }
        }

        Some(BusDecl::virtual_bus(topology))
    }

    /// The default processor, if id 0 was referenced but never declared
    pub fn virtual_processor(&self, declared: &[ProcessorDecl]) -> Option<ProcessorDecl> {
        let declared_default = declared.iter().any(|decl| decl.id == VIRTUAL_CPU_ID);
        (self.default_cpu_used && !declared_default).then(ProcessorDecl::virtual_cpu)
    }
}
