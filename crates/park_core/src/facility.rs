//! Facilities: waiting lines, admission disciplines and the capacity invariant.
//!
//! Everything here is plain data plus pure transitions over it; the systems
//! in [crate::systems] own sampling and event scheduling.

use std::collections::VecDeque;

use bevy_ecs::prelude::{Component, Entity};
use serde::{Deserialize, Serialize};

use crate::distributions::Distribution;
use crate::error::SimError;

/// Position of a facility in the park configuration. Ties in visitor choice
/// resolve to the lower id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FacilityId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityKind {
    Reception,
    Slide,
    Pool,
    River,
    Tour,
    Restaurant,
}

impl FacilityKind {
    pub fn is_attraction(self) -> bool {
        !matches!(self, Self::Reception | Self::Restaurant)
    }
}

/// How waiting groups are let in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "discipline", rename_all = "snake_case")]
pub enum Admission {
    /// `capacity` servers, one group each.
    Servers,
    /// Each group takes `ceil(size / per_unit)` units; the first waiting group
    /// that fits is admitted, express line first.
    Headcount { per_unit: u32 },
    /// Starts only when idle, with a FIFO prefix of exactly `size` people.
    Batch { size: u32 },
    /// One group per lane, at most one entry per lane every `spacing_ms`.
    Lanes { lanes: u32, spacing_ms: u64 },
    /// Instructor-led tours of up to `tour_size` people.
    Tour {
        instructors: u32,
        tour_size: u32,
        break_ms: u64,
        lunch_start_ms: u64,
        lunch_end_ms: u64,
        blackout_start_ms: u64,
        blackout_end_ms: u64,
    },
}

impl Admission {
    /// Capacity units a group of `group_size` people occupies.
    pub fn units_for(&self, group_size: u32) -> u32 {
        match self {
            Self::Servers => 1,
            Self::Headcount { per_unit } => group_size.div_ceil((*per_unit).max(1)),
            Self::Batch { .. } | Self::Lanes { .. } | Self::Tour { .. } => group_size,
        }
    }

    /// Whether a group this size can ever be admitted.
    pub fn admits_group(&self, group_size: u32, capacity: u32) -> bool {
        let units = self.units_for(group_size);
        match self {
            Self::Batch { size } => group_size <= *size,
            Self::Tour { tour_size, .. } => group_size <= *tour_size && units <= capacity,
            _ => units <= capacity,
        }
    }
}

/// Static description of a facility.
#[derive(Debug, Clone, Component)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    pub kind: FacilityKind,
    pub capacity: u32,
    pub min_age: f64,
    /// The youngest member must be at most this old (kids-only pools).
    pub max_youngest: Option<f64>,
    pub adrenaline: u8,
    pub admission: Admission,
    /// Service time in minutes, one draw per stage, summed.
    pub duration: Vec<Distribution>,
}

impl Facility {
    /// Whether the group's youngest member meets this facility's age rules.
    pub fn age_eligible(&self, youngest_age: f64) -> bool {
        youngest_age >= self.min_age && self.max_youngest.map_or(true, |max| youngest_age <= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueEntry {
    pub visitor: Entity,
    pub group_size: u32,
    pub enqueued_at: u64,
    pub express: bool,
}

impl QueueEntry {
    pub fn wait_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.enqueued_at)
    }
}

/// Express and regular lines; express is always served first, FIFO within each.
#[derive(Debug, Clone, Default, Component)]
pub struct WaitingLine {
    pub express: VecDeque<QueueEntry>,
    pub regular: VecDeque<QueueEntry>,
}

impl WaitingLine {
    pub fn enqueue(&mut self, entry: QueueEntry) {
        if entry.express {
            self.express.push_back(entry);
        } else {
            self.regular.push_back(entry);
        }
    }

    /// Waiting groups across both lines.
    pub fn len(&self) -> usize {
        self.express.len() + self.regular.len()
    }

    pub fn is_empty(&self) -> bool {
        self.express.is_empty() && self.regular.is_empty()
    }

    pub fn people(&self) -> u32 {
        self.iter().map(|entry| entry.group_size).sum()
    }

    /// Entries in service order.
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.express.iter().chain(self.regular.iter())
    }

    pub fn contains(&self, visitor: Entity) -> bool {
        self.iter().any(|entry| entry.visitor == visitor)
    }

    pub fn remove(&mut self, visitor: Entity) -> Option<QueueEntry> {
        for line in [&mut self.express, &mut self.regular] {
            if let Some(pos) = line.iter().position(|entry| entry.visitor == visitor) {
                return line.remove(pos);
            }
        }
        None
    }

    fn pop_front(&mut self) -> Option<QueueEntry> {
        self.express.pop_front().or_else(|| self.regular.pop_front())
    }

    fn front(&self) -> Option<&QueueEntry> {
        self.express.front().or_else(|| self.regular.front())
    }

    /// Removes the first entry, in service order, matching `fits`.
    fn take_first(&mut self, mut fits: impl FnMut(&QueueEntry) -> bool) -> Option<QueueEntry> {
        for line in [&mut self.express, &mut self.regular] {
            if let Some(pos) = line.iter().position(&mut fits) {
                return line.remove(pos);
            }
        }
        None
    }

    /// Takes the head of each line while the running total stays within
    /// `limit`, express first. Stops a line at its first group that doesn't fit.
    fn take_prefix(&mut self, limit: u32) -> (Vec<QueueEntry>, u32) {
        let mut taken = Vec::new();
        let mut total = 0;
        for line in [&mut self.express, &mut self.regular] {
            while let Some(entry) = line.front() {
                if total + entry.group_size > limit {
                    break;
                }
                total += entry.group_size;
                if let Some(entry) = line.pop_front() {
                    taken.push(entry);
                }
                if total == limit {
                    return (taken, total);
                }
            }
        }
        (taken, total)
    }

    /// Puts entries taken by [Self::take_prefix] back at the heads of their lines.
    fn restore_prefix(&mut self, taken: Vec<QueueEntry>) {
        for entry in taken.into_iter().rev() {
            if entry.express {
                self.express.push_front(entry);
            } else {
                self.regular.push_front(entry);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instructor {
    Available,
    /// Leading a tour, then resting; returns via an `InstructorReturn` event.
    Away,
    AtLunch,
}

/// Occupancy and discipline-specific state.
#[derive(Debug, Clone, Default, Component)]
pub struct ServerState {
    pub busy: u32,
    pub in_service: Vec<Entity>,
    /// Last entry time per lane.
    pub lanes: Vec<Option<u64>>,
    pub instructors: Vec<Instructor>,
    /// Pending `FacilityRetry` time, so only one is outstanding.
    pub retry_at: Option<u64>,
}

impl ServerState {
    pub fn for_admission(admission: &Admission) -> Self {
        let mut state = Self::default();
        match admission {
            Admission::Lanes { lanes, .. } => state.lanes = vec![None; *lanes as usize],
            Admission::Tour { instructors, .. } => {
                state.instructors = vec![Instructor::Available; *instructors as usize]
            }
            _ => {}
        }
        state
    }

    pub fn is_idle(&self) -> bool {
        self.busy == 0
    }
}

/// Groups that start service together and share one sampled duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Cohort {
    pub entries: Vec<QueueEntry>,
    /// Instructor leading the cohort, for tours.
    pub instructor: Option<usize>,
}

impl Cohort {
    fn single(entry: QueueEntry) -> Self {
        Self {
            entries: vec![entry],
            instructor: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartOutcome {
    pub cohorts: Vec<Cohort>,
    /// Time at which admission should be retried even if nothing else changes.
    pub retry_at: Option<u64>,
}

impl StartOutcome {
    pub fn admitted(&self) -> impl Iterator<Item = &QueueEntry> {
        self.cohorts.iter().flat_map(|cohort| cohort.entries.iter())
    }
}

/// Enqueues a group at the tail of the express or regular line.
pub fn enqueue(line: &mut WaitingLine, entry: QueueEntry) {
    line.enqueue(entry);
}

/// Moves as many waiting groups into service as the facility's discipline
/// allows at `now`.
pub fn try_start_service(
    facility: &Facility,
    line: &mut WaitingLine,
    servers: &mut ServerState,
    now: u64,
) -> Result<StartOutcome, SimError> {
    let mut outcome = StartOutcome::default();
    let capacity = facility.capacity;
    let admission = &facility.admission;

    match admission {
        Admission::Servers => {
            while servers.busy < capacity {
                let Some(entry) = line.pop_front() else {
                    break;
                };
                occupy(facility, servers, &entry)?;
                outcome.cohorts.push(Cohort::single(entry));
            }
        }
        Admission::Headcount { .. } => loop {
            let free = capacity.saturating_sub(servers.busy);
            let Some(entry) = line.take_first(|e| admission.units_for(e.group_size) <= free) else {
                break;
            };
            occupy(facility, servers, &entry)?;
            outcome.cohorts.push(Cohort::single(entry));
        },
        Admission::Batch { size } => {
            if servers.is_idle() && line.people() >= *size {
                let (taken, total) = line.take_prefix(*size);
                if total == *size {
                    for entry in &taken {
                        occupy(facility, servers, entry)?;
                    }
                    outcome.cohorts.push(Cohort {
                        entries: taken,
                        instructor: None,
                    });
                } else {
                    line.restore_prefix(taken);
                }
            }
        }
        Admission::Lanes { spacing_ms, .. } => {
            for lane in 0..servers.lanes.len() {
                let Some(head) = line.front().copied() else {
                    break;
                };
                let ready = servers.lanes[lane].map_or(true, |last| now >= last + spacing_ms);
                if !ready {
                    continue;
                }
                if servers.busy + admission.units_for(head.group_size) > capacity {
                    break;
                }
                line.pop_front();
                occupy(facility, servers, &head)?;
                servers.lanes[lane] = Some(now);
                outcome.cohorts.push(Cohort::single(head));
            }
            if let Some(head) = line.front() {
                let fits = servers.busy + admission.units_for(head.group_size) <= capacity;
                if fits {
                    outcome.retry_at = servers
                        .lanes
                        .iter()
                        .flatten()
                        .map(|last| last + spacing_ms)
                        .filter(|at| *at > now)
                        .min();
                }
            }
        }
        Admission::Tour {
            tour_size,
            blackout_start_ms,
            blackout_end_ms,
            ..
        } => {
            if (*blackout_start_ms..*blackout_end_ms).contains(&now) {
                if !line.is_empty() {
                    outcome.retry_at = Some(*blackout_end_ms);
                }
                return Ok(outcome);
            }
            for slot in 0..servers.instructors.len() {
                if line.is_empty() {
                    break;
                }
                if servers.instructors[slot] != Instructor::Available {
                    continue;
                }
                let limit = (*tour_size).min(capacity.saturating_sub(servers.busy));
                let (taken, _) = line.take_prefix(limit);
                if taken.is_empty() {
                    break;
                }
                for entry in &taken {
                    occupy(facility, servers, entry)?;
                }
                servers.instructors[slot] = Instructor::Away;
                outcome.cohorts.push(Cohort {
                    entries: taken,
                    instructor: Some(slot),
                });
            }
        }
    }

    Ok(outcome)
}

fn occupy(facility: &Facility, servers: &mut ServerState, entry: &QueueEntry) -> Result<(), SimError> {
    let busy = servers.busy + facility.admission.units_for(entry.group_size);
    if busy > facility.capacity {
        return Err(SimError::CapacityViolation {
            facility: facility.name.clone(),
            busy,
            capacity: facility.capacity,
        });
    }
    servers.busy = busy;
    servers.in_service.push(entry.visitor);
    Ok(())
}

/// Frees the units a group held. Returns `false` if the group was not in service.
pub fn complete_service(
    facility: &Facility,
    servers: &mut ServerState,
    visitor: Entity,
    group_size: u32,
) -> bool {
    let Some(pos) = servers.in_service.iter().position(|v| *v == visitor) else {
        return false;
    };
    servers.in_service.swap_remove(pos);
    let units = facility.admission.units_for(group_size);
    debug_assert!(servers.busy >= units, "releasing more units than held");
    servers.busy = servers.busy.saturating_sub(units);
    true
}

/// Instructor state after returning from a tour and its break at `now`.
pub fn instructor_after_return(admission: &Admission, now: u64) -> (Instructor, Option<u64>) {
    match admission {
        Admission::Tour {
            lunch_start_ms,
            lunch_end_ms,
            ..
        } if (*lunch_start_ms..*lunch_end_ms).contains(&now) => {
            (Instructor::AtLunch, Some(*lunch_end_ms))
        }
        _ => (Instructor::Available, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{clock_ms, MS_PER_MINUTE};

    fn facility(capacity: u32, admission: Admission) -> Facility {
        Facility {
            id: FacilityId(0),
            name: "Test".to_string(),
            kind: FacilityKind::Slide,
            capacity,
            min_age: 0.0,
            max_youngest: None,
            adrenaline: 1,
            admission,
            duration: vec![Distribution::constant(1.0)],
        }
    }

    fn entry(raw: u32, size: u32, express: bool) -> QueueEntry {
        QueueEntry {
            visitor: Entity::from_raw(raw),
            group_size: size,
            enqueued_at: 0,
            express,
        }
    }

    fn admitted_ids(outcome: &StartOutcome) -> Vec<u32> {
        outcome.admitted().map(|e| e.visitor.index()).collect()
    }

    #[test]
    fn express_line_is_served_before_regular() {
        let fac = facility(1, Admission::Servers);
        let mut line = WaitingLine::default();
        let mut servers = ServerState::for_admission(&fac.admission);
        enqueue(&mut line, entry(1, 2, false));
        enqueue(&mut line, entry(2, 2, true));
        enqueue(&mut line, entry(3, 2, true));

        let outcome = try_start_service(&fac, &mut line, &mut servers, 0).expect("start");
        assert_eq!(admitted_ids(&outcome), vec![2]);
        assert!(complete_service(&fac, &mut servers, Entity::from_raw(2), 2));

        let outcome = try_start_service(&fac, &mut line, &mut servers, 0).expect("start");
        assert_eq!(admitted_ids(&outcome), vec![3]);
        assert!(complete_service(&fac, &mut servers, Entity::from_raw(3), 2));

        let outcome = try_start_service(&fac, &mut line, &mut servers, 0).expect("start");
        assert_eq!(admitted_ids(&outcome), vec![1]);
    }

    #[test]
    fn servers_never_exceed_capacity() {
        let fac = facility(3, Admission::Servers);
        let mut line = WaitingLine::default();
        let mut servers = ServerState::default();
        for raw in 0..5 {
            enqueue(&mut line, entry(raw, 4, false));
        }
        let outcome = try_start_service(&fac, &mut line, &mut servers, 0).expect("start");
        assert_eq!(outcome.cohorts.len(), 3);
        assert_eq!(servers.busy, 3);
        assert_eq!(line.len(), 2);
    }

    #[test]
    fn headcount_skips_groups_that_do_not_fit() {
        let fac = facility(10, Admission::Headcount { per_unit: 1 });
        let mut line = WaitingLine::default();
        let mut servers = ServerState::default();
        servers.busy = 5;
        enqueue(&mut line, entry(1, 6, false));
        enqueue(&mut line, entry(2, 3, false));
        enqueue(&mut line, entry(3, 2, false));

        let outcome = try_start_service(&fac, &mut line, &mut servers, 0).expect("start");
        assert_eq!(admitted_ids(&outcome), vec![2, 3]);
        assert_eq!(servers.busy, 10);
        assert_eq!(line.len(), 1);
    }

    #[test]
    fn tubes_hold_two_people_each() {
        let admission = Admission::Headcount { per_unit: 2 };
        assert_eq!(admission.units_for(1), 1);
        assert_eq!(admission.units_for(2), 1);
        assert_eq!(admission.units_for(5), 3);
    }

    #[test]
    fn batch_needs_an_exact_load() {
        let fac = facility(8, Admission::Batch { size: 8 });
        let mut line = WaitingLine::default();
        let mut servers = ServerState::default();
        enqueue(&mut line, entry(1, 3, false));
        enqueue(&mut line, entry(2, 4, false));
        enqueue(&mut line, entry(3, 5, false));

        let outcome = try_start_service(&fac, &mut line, &mut servers, 0).expect("start");
        assert!(outcome.cohorts.is_empty());
        assert_eq!(
            line.iter().map(|e| e.visitor.index()).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );

        enqueue(&mut line, entry(4, 1, true));
        let outcome = try_start_service(&fac, &mut line, &mut servers, 0).expect("start");
        assert_eq!(outcome.cohorts.len(), 1);
        assert_eq!(admitted_ids(&outcome), vec![4, 1, 2]);
        assert_eq!(servers.busy, 8);

        // Busy batch blocks the next load even if one is ready.
        enqueue(&mut line, entry(5, 3, false));
        let outcome = try_start_service(&fac, &mut line, &mut servers, 0).expect("start");
        assert!(outcome.cohorts.is_empty());
    }

    #[test]
    fn lanes_enforce_spacing_and_request_a_retry() {
        let spacing = 30_000;
        let fac = facility(
            6,
            Admission::Lanes {
                lanes: 2,
                spacing_ms: spacing,
            },
        );
        let mut line = WaitingLine::default();
        let mut servers = ServerState::for_admission(&fac.admission);
        for raw in 1..=3 {
            enqueue(&mut line, entry(raw, 1, false));
        }

        let outcome = try_start_service(&fac, &mut line, &mut servers, 0).expect("start");
        assert_eq!(admitted_ids(&outcome), vec![1, 2]);
        assert_eq!(outcome.retry_at, Some(spacing));

        let outcome = try_start_service(&fac, &mut line, &mut servers, 10_000).expect("start");
        assert!(outcome.cohorts.is_empty());
        assert_eq!(outcome.retry_at, Some(spacing));

        let outcome = try_start_service(&fac, &mut line, &mut servers, spacing).expect("start");
        assert_eq!(admitted_ids(&outcome), vec![3]);
        assert_eq!(outcome.retry_at, None);
    }

    fn snorkel() -> Facility {
        let mut fac = facility(
            60,
            Admission::Tour {
                instructors: 2,
                tour_size: 30,
                break_ms: 30 * MS_PER_MINUTE,
                lunch_start_ms: clock_ms(13, 0),
                lunch_end_ms: clock_ms(14, 0),
                blackout_start_ms: clock_ms(12, 20),
                blackout_end_ms: clock_ms(14, 0),
            },
        );
        fac.kind = FacilityKind::Tour;
        fac
    }

    #[test]
    fn tours_fill_up_to_tour_size_per_instructor() {
        let fac = snorkel();
        let mut line = WaitingLine::default();
        let mut servers = ServerState::for_admission(&fac.admission);
        for raw in 1..=8 {
            enqueue(&mut line, entry(raw, 6, false));
        }

        let outcome = try_start_service(&fac, &mut line, &mut servers, 0).expect("start");
        assert_eq!(outcome.cohorts.len(), 2);
        assert_eq!(outcome.cohorts[0].entries.len(), 5);
        assert_eq!(outcome.cohorts[0].instructor, Some(0));
        assert_eq!(outcome.cohorts[1].entries.len(), 3);
        assert_eq!(outcome.cohorts[1].instructor, Some(1));
        assert_eq!(servers.busy, 48);
        assert!(servers.instructors.iter().all(|i| *i == Instructor::Away));
    }

    #[test]
    fn tours_do_not_start_during_the_blackout() {
        let fac = snorkel();
        let mut line = WaitingLine::default();
        let mut servers = ServerState::for_admission(&fac.admission);
        enqueue(&mut line, entry(1, 2, false));

        let now = clock_ms(12, 30);
        let outcome = try_start_service(&fac, &mut line, &mut servers, now).expect("start");
        assert!(outcome.cohorts.is_empty());
        assert_eq!(outcome.retry_at, Some(clock_ms(14, 0)));
    }

    #[test]
    fn instructors_lunch_inside_the_window() {
        let fac = snorkel();
        assert_eq!(
            instructor_after_return(&fac.admission, clock_ms(13, 10)),
            (Instructor::AtLunch, Some(clock_ms(14, 0)))
        );
        assert_eq!(
            instructor_after_return(&fac.admission, clock_ms(15, 0)),
            (Instructor::Available, None)
        );
    }

    #[test]
    fn capacity_breach_is_reported() {
        let fac = facility(2, Admission::Servers);
        let mut servers = ServerState {
            busy: 2,
            ..Default::default()
        };
        let err = occupy(&fac, &mut servers, &entry(1, 1, false)).expect_err("breach");
        assert_eq!(
            err,
            SimError::CapacityViolation {
                facility: "Test".to_string(),
                busy: 3,
                capacity: 2,
            }
        );
    }

    #[test]
    fn abandoning_groups_leave_either_line() {
        let mut line = WaitingLine::default();
        enqueue(&mut line, entry(1, 2, false));
        enqueue(&mut line, entry(2, 3, true));
        assert_eq!(line.people(), 5);
        assert!(line.remove(Entity::from_raw(2)).is_some());
        assert!(!line.contains(Entity::from_raw(2)));
        assert!(line.remove(Entity::from_raw(2)).is_none());
        assert_eq!(line.len(), 1);
    }
}
