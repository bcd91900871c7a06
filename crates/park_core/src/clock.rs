use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

use crate::error::SimError;

pub const MS_PER_MINUTE: u64 = 60_000;
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Minute of the day at which simulation time zero sits (09:00).
pub const OPENING_MINUTE_OF_DAY: u32 = 9 * 60;

/// Converts a sampled duration in minutes to clock milliseconds.
/// Negative and non-finite samples clamp to zero.
pub fn minutes_to_ms(minutes: f64) -> u64 {
    if !minutes.is_finite() || minutes <= 0.0 {
        return 0;
    }
    (minutes * MS_PER_MINUTE as f64).round() as u64
}

pub fn ms_to_minutes(ms: u64) -> f64 {
    ms as f64 / MS_PER_MINUTE as f64
}

/// Simulation timestamp of a wall-clock time on the park day.
/// Times before opening map to zero.
pub fn clock_ms(hour: u32, minute: u32) -> u64 {
    let minute_of_day = hour * 60 + minute;
    u64::from(minute_of_day.saturating_sub(OPENING_MINUTE_OF_DAY)) * MS_PER_MINUTE
}

/// Simulation timestamp of a fractional hour of day (e.g. `16.5` is 16:30).
pub fn hour_of_day_ms(hour: f64) -> u64 {
    minutes_to_ms(hour * 60.0 - f64::from(OPENING_MINUTE_OF_DAY))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    SimulationStarted,
    VisitorArrival,
    FacilityArrival,
    ServiceComplete,
    Abandonment,
    VisitorDecision,
    MealEnd,
    FacilityRetry,
    InstructorReturn,
    ParkClosing,
}

/// What an event acts upon. Entity references are weak: the entity may be
/// gone by the time the event fires, in which case the event is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSubject {
    /// Index into the configured arrival streams.
    Stream(usize),
    Visitor(Entity),
    Visit { visitor: Entity, facility: Entity },
    Facility(Entity),
    Instructor { facility: Entity, slot: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    pub sequence: u64,
    pub kind: EventKind,
    pub subject: Option<EventSubject>,
}

impl Event {
    pub fn id(&self) -> EventId {
        EventId(self.sequence)
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap on (timestamp, sequence).
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event being dispatched in the current step.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

/// Simulation time plus the ordered schedule of future events.
///
/// Equal timestamps pop in scheduling order, so a fixed seed always replays
/// the same trace.
#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: u64,
    next_sequence: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedules an event at an absolute time. Fails if `at` is in the past.
    pub fn schedule_at(
        &mut self,
        at: u64,
        kind: EventKind,
        subject: Option<EventSubject>,
    ) -> Result<EventId, SimError> {
        if at < self.now {
            return Err(SimError::InvalidScheduling { at, now: self.now });
        }
        Ok(self.push(at, kind, subject))
    }

    /// Schedules an event `delay_ms` after now.
    pub fn schedule_in(
        &mut self,
        delay_ms: u64,
        kind: EventKind,
        subject: Option<EventSubject>,
    ) -> EventId {
        let at = self.now.saturating_add(delay_ms);
        self.push(at, kind, subject)
    }

    pub fn schedule_now(&mut self, kind: EventKind, subject: Option<EventSubject>) -> EventId {
        self.schedule_in(0, kind, subject)
    }

    fn push(&mut self, timestamp: u64, kind: EventKind, subject: Option<EventSubject>) -> EventId {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.events.push(Event {
            timestamp,
            sequence,
            kind,
            subject,
        });
        EventId(sequence)
    }

    /// Pops the earliest event and advances `now` to its timestamp.
    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        debug_assert!(event.timestamp >= self.now, "clock must not run backwards");
        self.now = event.timestamp;
        Some(event)
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|event| event.timestamp)
    }

    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pops_events_in_time_order() {
        let mut clock = SimulationClock::default();
        clock
            .schedule_at(10, EventKind::VisitorArrival, None)
            .expect("schedule");
        clock
            .schedule_at(5, EventKind::VisitorArrival, None)
            .expect("schedule");
        clock
            .schedule_at(20, EventKind::VisitorArrival, None)
            .expect("schedule");

        let first = clock.pop_next().expect("first event");
        assert_eq!(first.timestamp, 5);
        assert_eq!(clock.now(), 5);

        let second = clock.pop_next().expect("second event");
        assert_eq!(second.timestamp, 10);
        assert_eq!(clock.now(), 10);

        let third = clock.pop_next().expect("third event");
        assert_eq!(third.timestamp, 20);
        assert_eq!(clock.now(), 20);

        assert!(clock.pop_next().is_none());
        assert!(clock.is_empty());
    }

    #[test]
    fn equal_timestamps_pop_in_insertion_order() {
        let mut clock = SimulationClock::default();
        let kinds = [
            EventKind::ParkClosing,
            EventKind::VisitorArrival,
            EventKind::SimulationStarted,
            EventKind::MealEnd,
        ];
        let ids: Vec<EventId> = kinds
            .iter()
            .map(|kind| clock.schedule_at(7, *kind, None).expect("schedule"))
            .collect();

        let popped: Vec<Event> = std::iter::from_fn(|| clock.pop_next()).collect();
        assert_eq!(
            popped.iter().map(|e| e.kind).collect::<Vec<_>>(),
            kinds.to_vec()
        );
        assert_eq!(popped.iter().map(Event::id).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn scheduling_in_the_past_is_rejected() {
        let mut clock = SimulationClock::default();
        clock.schedule_in(100, EventKind::ParkClosing, None);
        clock.pop_next().expect("event");

        let err = clock
            .schedule_at(99, EventKind::VisitorArrival, None)
            .expect_err("past event");
        assert_eq!(err, SimError::InvalidScheduling { at: 99, now: 100 });
        assert!(clock.schedule_at(100, EventKind::VisitorArrival, None).is_ok());
    }

    #[test]
    fn peek_reports_next_time_without_advancing() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.next_event_time(), None);
        clock.schedule_in(30, EventKind::MealEnd, None);
        clock.schedule_in(15, EventKind::MealEnd, None);
        assert_eq!(clock.next_event_time(), Some(15));
        assert_eq!(clock.now(), 0);
        assert_eq!(clock.pending_event_count(), 2);
    }

    #[test]
    fn wall_clock_conversions() {
        assert_eq!(clock_ms(9, 0), 0);
        assert_eq!(clock_ms(13, 0), 4 * MS_PER_HOUR);
        assert_eq!(clock_ms(8, 0), 0);
        assert_eq!(hour_of_day_ms(16.5), clock_ms(16, 30));
        assert_eq!(minutes_to_ms(-3.0), 0);
        assert_eq!(minutes_to_ms(0.5), 30_000);
        assert!((ms_to_minutes(90_000) - 1.5).abs() < 1e-12);
    }
}
