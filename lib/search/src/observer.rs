//! Optional progress hook for searches
//!
//! Searches never print. Progress is reported through `tracing` and, when a
//! caller asks for it, through a [`SearchObserver`] receiving [`SearchEvent`]s.

use serde::Serialize;
use viewx_core::{RowRange, View};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SearchEvent {
    /// One partition was scored and the pruning rule applied
    PartitionCompleted {
        partition: usize,
        range: RowRange,
        /// Confidence half-width, `None` for the first partition
        epsilon: Option<f64>,
        /// Normalized estimate of the current k-th best view
        kth_estimate: f64,
        survivors: Vec<View>,
        pruned: Vec<View>,
    },
    /// The partition phase stopped before the last partition
    StoppedEarly { partition: usize, survivors: usize },
    /// Final full-range ranking finished
    Finished {
        strategy: &'static str,
        candidates: usize,
        survivors: usize,
        returned: usize,
    },
}

pub trait SearchObserver {
    fn on_event(&mut self, event: &SearchEvent);
}

impl<F: FnMut(&SearchEvent)> SearchObserver for F {
    fn on_event(&mut self, event: &SearchEvent) {
        self(event)
    }
}

/// Observer discarding every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_event(&mut self, _event: &SearchEvent) {}
}

/// Observer keeping every event in order
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<SearchEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SearchEvent] {
        &self.events
    }

    /// Surviving views after each completed partition
    pub fn survivors_per_partition(&self) -> Vec<&[View]> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SearchEvent::PartitionCompleted { survivors, .. } => Some(survivors.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn total_pruned(&self) -> usize {
        self.events
            .iter()
            .map(|e| match e {
                SearchEvent::PartitionCompleted { pruned, .. } => pruned.len(),
                _ => 0,
            })
            .sum()
    }
}

impl SearchObserver for EventLog {
    fn on_event(&mut self, event: &SearchEvent) {
        self.events.push(event.clone());
    }
}
