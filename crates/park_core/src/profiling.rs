//! Event rate tracking for benchmarks and load tests.

use std::collections::BTreeMap;
use std::time::Instant;

use bevy_ecs::prelude::Resource;
use tracing::debug;

use crate::clock::EventKind;

/// How many events of each kind a run dispatched, and how fast.
#[derive(Debug, Default, Resource)]
pub struct EventMetrics {
    pub events_processed: u64,
    /// Wall time of the first dispatched event.
    pub first_event_at: Option<Instant>,
    by_kind: BTreeMap<EventKind, u64>,
}

impl EventMetrics {
    pub fn record_event(&mut self, kind: EventKind) {
        self.first_event_at.get_or_insert_with(Instant::now);
        self.events_processed += 1;
        *self.by_kind.entry(kind).or_default() += 1;
    }

    pub fn count(&self, kind: EventKind) -> u64 {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Dispatched kinds in declaration order, with their counts.
    pub fn kinds(&self) -> impl Iterator<Item = (EventKind, u64)> + '_ {
        self.by_kind.iter().map(|(kind, count)| (*kind, *count))
    }

    /// Events per second of wall time since the first event.
    pub fn events_per_second(&self) -> f64 {
        let Some(start) = self.first_event_at else {
            return 0.0;
        };
        let elapsed = start.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.events_processed as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        debug!(
            events = self.events_processed,
            rate = self.events_per_second(),
            "event dispatch summary"
        );
        for (kind, count) in self.kinds() {
            debug!(?kind, count, "events by kind");
        }
    }
}
