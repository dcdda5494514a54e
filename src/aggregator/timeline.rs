//! Per-processor timeline construction.
//!
//! Scheduling events are grouped by the processor that owns them. Each
//! timeline keeps its own distinct-timestamp sequence, scoped to that processor.

use crate::parser::{LogEvent, ProcessorDecl, ProcessorTimeline};
use log::debug;
use std::collections::BTreeMap;

/// Accumulates timelines keyed by processor id
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    timelines: BTreeMap<i64, ProcessorTimeline>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a timeline event to its owner's timeline
    ///
    /// **Public** - creates the timeline on first reference, unnamed
    ///
    /// # Returns
    /// The owning processor id, or `None` if no owner field is present
    pub fn record(&mut self, event: &LogEvent) -> Option<i64> {
        let Some(owner) = event.owner() else {
            debug!("{} at {} has no owning processor", event.kind.tag(), event.time);
            return None;
        };

        self.timelines
            .entry(owner)
            .or_insert_with(|| ProcessorTimeline::new(owner))
            .push(event.clone());

        Some(owner)
    }

    /// Finish the timelines
    ///
    /// Names are back-filled from the declarations, and every declared
    /// processor gets a timeline even without activity.
    ///
    /// # Returns
    /// Timelines sorted by processor id
    pub fn finish(mut self, processors: &[ProcessorDecl]) -> Vec<ProcessorTimeline> {
        for decl in processors {
            self.timelines
                .entry(decl.id)
                .or_insert_with(|| ProcessorTimeline::new(decl.id))
                .name = decl.name.clone();
        }

        self.timelines.into_values().collect()
    }
}
