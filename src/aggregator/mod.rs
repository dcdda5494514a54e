//! Aggregation of classified events into the trace model.
//!
//! A single pass over the log feeds every classified event to:
//! - the correlator (request/completion matching)
//! - the timeline builder (per-processor activity)
//! - the topology synthesizer (virtual bus and processor)
//!
//! The accumulators are owned by one `TraceBuilder` and never shared.

pub mod correlator;
pub mod timeline;
pub mod topology;

pub use correlator::{Correlator, Initiator, PendingCall};
pub use timeline::TimelineBuilder;
pub use topology::{TopologyEdge, TopologySynthesizer};

use crate::parser::{
    tokenize_line, BusDecl, Classifier, EventKind, LogEvent, ProcessorDecl, TraceModel,
};
use log::{debug, warn};
use std::collections::BTreeMap;

/// Per-ingestion diagnostics, intended for logging rather than rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Unknown event kind tag -> occurrence count
    pub unknown_events: BTreeMap<String, usize>,

    /// Completions with no matching request or reply
    pub orphaned_completions: usize,

    /// Calls opened but never completed
    pub unfinished_calls: usize,

    /// One message per malformed or unreadable annotation line
    pub annotation_warnings: Vec<String>,
}

/// Single-pass trace builder
#[derive(Debug, Default)]
pub struct TraceBuilder {
    classifier: Classifier,
    correlator: Correlator,
    timelines: TimelineBuilder,
    topology: TopologySynthesizer,
    events: Vec<LogEvent>,
    processors: Vec<ProcessorDecl>,
    buses: Vec<BusDecl>,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw log line
    ///
    /// **Public** - lines without the kind separator are skipped silently
    pub fn push_line(&mut self, line: &str) {
        let Some(tokens) = tokenize_line(line) else {
            return;
        };
        if let Some(event) = self.classifier.classify(tokens) {
            self.push_event(event);
        }
    }

    /// Feed one classified event
    ///
    /// Completions are enriched before ownership is resolved, so a completion
    /// lands on its destination processor.
    fn push_event(&mut self, mut event: LogEvent) {
        match event.kind {
            EventKind::ProcessorDeclared => match ProcessorDecl::from_event(&event) {
                Some(decl) => self.processors.push(decl),
                None => warn!("CPUdecl at {} has no id, ignoring declaration", event.time),
            },
            EventKind::BusDeclared => match BusDecl::from_event(&event) {
                Some(decl) => self.buses.push(decl),
                None => warn!("BUSdecl at {} has no id, ignoring declaration", event.time),
            },
            EventKind::MessageCompleted => {
                self.correlator.complete(&mut event);
            }
            _ => {}
        }

        if event.kind.is_timeline_event() {
            self.timelines.record(&event);
        }
        self.correlator.open(&event);
        self.topology.observe(&event);

        self.events.push(event);
    }

    /// Finish the pass and produce the model
    ///
    /// The model carries no conjectures yet; the violation merger adds them.
    pub fn finish(self) -> (TraceModel, Diagnostics) {
        let Self {
            classifier,
            correlator,
            timelines,
            topology,
            events,
            mut processors,
            mut buses,
        } = self;

        let (timestamps, unknown_events) = classifier.finish();
        for (kind, count) in &unknown_events {
            warn!("Encountered unknown log event '{}' {} times", kind, count);
        }

        if let Some(bus) = topology.virtual_bus() {
            debug!("Synthesized virtual bus with topology {:?}", bus.topology);
            buses.push(bus);
        }
        if let Some(cpu) = topology.virtual_processor(&processors) {
            debug!("Synthesized default processor {}", cpu.id);
            processors.push(cpu);
        }

        processors.sort_by_key(|p| p.id);
        buses.sort_by_key(|b| b.id);
        let timelines = timelines.finish(&processors);

        debug!(
            "Built trace: {} events, {} processors, {} buses, {} timelines, {} instants",
            events.len(),
            processors.len(),
            buses.len(),
            timelines.len(),
            timestamps.len()
        );

        let diagnostics = Diagnostics {
            unknown_events,
            orphaned_completions: correlator.orphaned(),
            unfinished_calls: correlator.pending(),
            annotation_warnings: Vec::new(),
        };

        let model = TraceModel {
            events,
            processors,
            buses,
            timelines,
            timestamps,
            conjectures: Vec::new(),
        };

        (model, diagnostics)
    }
}

/// Build the trace model from raw log lines
///
/// **Public** - main entry point for aggregation
///
/// # Arguments
/// * `lines` - Raw log lines in file order
///
/// # Returns
/// The trace model (without conjectures) and the pass diagnostics
pub fn build_trace_model<'a, I>(lines: I) -> (TraceModel, Diagnostics)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut builder = TraceBuilder::new();
    for line in lines {
        builder.push_line(line);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_owned_by_destination() {
        let (model, diagnostics) = build_trace_model([
            "MessageRequest -> msgid:1 busid:3 fromcpu:1 tocpu:2 callthr:4 opname:\"op\" objref:9 clnm:\"A\" time:1",
            "MessageActivate -> msgid:1 time:2",
            "MessageCompleted -> msgid:1 time:3",
        ]);

        assert_eq!(diagnostics.orphaned_completions, 0);
        assert_eq!(model.events.len(), 3);
        assert_eq!(model.timeline(1).unwrap().events.len(), 1);

        let dest = model.timeline(2).unwrap();
        assert_eq!(dest.events.len(), 1);
        assert_eq!(dest.events[0].kind, EventKind::MessageCompleted);
        assert_eq!(dest.timestamps.as_slice(), &[3]);
        assert!(model.buses.is_empty());
    }

    #[test]
    fn test_declarations_sorted_and_excluded_from_timelines() {
        let (model, _) = build_trace_model([
            "CPUdecl -> id:2 expl:true sys:\"S\" name:\"B\" time:0",
            "CPUdecl -> id:1 expl:true sys:\"S\" name:\"A\" time:0",
            "BUSdecl -> id:1 topo:{1,2} name:\"BUS1\" time:0",
            "DeployObj -> objref:1 clnm:\"C\" cpunm:1 time:0",
        ]);

        let ids: Vec<i64> = model.processors.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(model.bus(1).unwrap().topology, vec![1, 2]);
        assert!(model.timelines.iter().all(|t| t.events.is_empty()));
        assert_eq!(model.timeline(2).unwrap().name, "B");
        assert_eq!(model.events.len(), 4);
    }

    #[test]
    fn test_default_processor_synthesized() {
        let (model, _) = build_trace_model([
            "ThreadCreate -> id:1 period:false objref:1 clnm:\"C\" cpunm:0 time:0",
        ]);

        let cpu = model.processor(0).unwrap();
        assert_eq!(cpu.name, "vCPU");
        assert!(cpu.synthetic);
        assert_eq!(model.timeline(0).unwrap().name, "vCPU");
    }

    #[test]
    fn test_explicit_default_processor_not_duplicated() {
        let (model, _) = build_trace_model([
            "ThreadCreate -> id:1 cpunm:0 time:0",
            "CPUdecl -> id:0 expl:false sys:\"\" name:\"Host\" time:0",
        ]);

        assert_eq!(model.processors.len(), 1);
        assert_eq!(model.processors[0].name, "Host");
        assert!(!model.processors[0].synthetic);
    }

    #[test]
    fn test_global_timestamps_cover_every_event() {
        let (model, _) = build_trace_model([
            "CPUdecl -> id:1 expl:true sys:\"S\" name:\"A\" time:0",
            "ThreadCreate -> id:1 cpunm:1 time:1",
            "MessageRequest -> msgid:1 busid:0 fromcpu:1 tocpu:2 time:3",
            "MessageCompleted -> msgid:1 time:6",
        ]);

        for event in &model.events {
            assert!(model.timestamps.as_slice().contains(&event.time));
        }
        for timeline in &model.timelines {
            for time in timeline.timestamps.as_slice() {
                assert!(model.timestamps.as_slice().contains(time));
            }
        }
    }

    #[test]
    fn test_unfinished_calls_reported() {
        let (_, diagnostics) = build_trace_model([
            "MessageRequest -> msgid:1 busid:1 fromcpu:1 tocpu:2 time:1",
        ]);
        assert_eq!(diagnostics.unfinished_calls, 1);
    }
}
