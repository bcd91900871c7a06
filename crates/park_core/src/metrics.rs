//! Run metrics: per-facility waits and queue lengths, revenue, ratings.
//!
//! [ParkMetrics] is mutated by systems during dispatch and read once the run
//! ends, when [ParkMetrics::summarize] turns it into a [RunSummary].

use std::collections::HashMap;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::clock::{ms_to_minutes, Event};
use crate::ecs::VisitorKind;
use crate::facility::{FacilityId, FacilityKind};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaitStats {
    pub total_ms: u64,
    pub count: u64,
    pub max_ms: u64,
}

impl WaitStats {
    pub fn record(&mut self, wait_ms: u64) {
        self.total_ms += wait_ms;
        self.count += 1;
        self.max_ms = self.max_ms.max(wait_ms);
    }

    pub fn average_minutes(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            ms_to_minutes(self.total_ms) / self.count as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacilityStats {
    pub name: String,
    pub kind: FacilityKind,
    pub regular_wait: WaitStats,
    pub express_wait: WaitStats,
    pub service_total_ms: u64,
    pub services_completed: u64,
    pub groups_served: u64,
    pub people_served: u64,
    pub abandonments: u64,
    pub max_busy: u32,
    pub max_queue: usize,
    /// Integral of waiting groups over time, in group-milliseconds.
    queue_area: f64,
    last_change_ms: u64,
    last_length: usize,
}

impl FacilityStats {
    pub fn new(name: impl Into<String>, kind: FacilityKind) -> Self {
        Self {
            name: name.into(),
            kind,
            regular_wait: WaitStats::default(),
            express_wait: WaitStats::default(),
            service_total_ms: 0,
            services_completed: 0,
            groups_served: 0,
            people_served: 0,
            abandonments: 0,
            max_busy: 0,
            max_queue: 0,
            queue_area: 0.0,
            last_change_ms: 0,
            last_length: 0,
        }
    }

    /// Records the queue length from `now` on.
    pub fn observe_queue(&mut self, now: u64, length: usize) {
        let elapsed = now.saturating_sub(self.last_change_ms);
        self.queue_area += self.last_length as f64 * elapsed as f64;
        self.last_change_ms = now.max(self.last_change_ms);
        self.last_length = length;
        self.max_queue = self.max_queue.max(length);
    }

    pub fn record_start(&mut self, wait_ms: u64, express: bool, group_size: u32, busy: u32) {
        if express {
            self.express_wait.record(wait_ms);
        } else {
            self.regular_wait.record(wait_ms);
        }
        self.groups_served += 1;
        self.people_served += u64::from(group_size);
        self.max_busy = self.max_busy.max(busy);
    }

    pub fn record_service(&mut self, service_ms: u64) {
        self.service_total_ms += service_ms;
        self.services_completed += 1;
    }

    /// Time-averaged number of waiting groups over `[0, end_ms]`.
    pub fn average_queue_length(&self, end_ms: u64) -> f64 {
        if end_ms == 0 {
            return 0.0;
        }
        let tail = end_ms.saturating_sub(self.last_change_ms) as f64 * self.last_length as f64;
        (self.queue_area + tail) / end_ms as f64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Revenue {
    pub tickets: f64,
    pub express: f64,
    pub food: f64,
    pub photos: f64,
}

impl Revenue {
    pub fn total(&self) -> f64 {
        self.tickets + self.express + self.food + self.photos
    }
}

/// One group leaving the park.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartureRecord {
    pub visitor_id: u64,
    pub kind: VisitorKind,
    pub group_size: u32,
    pub subgroup: bool,
    pub at_ms: u64,
    pub rating: f64,
    pub attractions_done: u32,
}

#[derive(Debug, Clone, Default, Resource)]
pub struct ParkMetrics {
    pub facilities: Vec<FacilityStats>,
    pub revenue: Revenue,
    pub arrived_groups: u64,
    pub arrived_people: u64,
    /// Groups through reception.
    pub entered_groups: u64,
    pub completed_groups: u64,
    pub completed_people: u64,
    /// Final ratings of completed visits.
    pub ratings: Vec<f64>,
    pub departures: Vec<DepartureRecord>,
    pub family_splits: u64,
    pub express_upgrades: u64,
}

impl ParkMetrics {
    pub fn with_facilities(facilities: Vec<FacilityStats>) -> Self {
        Self {
            facilities,
            ..Default::default()
        }
    }

    pub fn facility_mut(&mut self, id: FacilityId) -> Option<&mut FacilityStats> {
        self.facilities.get_mut(id.0)
    }

    pub fn facility(&self, id: FacilityId) -> Option<&FacilityStats> {
        self.facilities.get(id.0)
    }

    pub fn observe_queue(&mut self, id: FacilityId, now: u64, length: usize) {
        if let Some(stats) = self.facility_mut(id) {
            stats.observe_queue(now, length);
        }
    }

    pub fn record_completion(&mut self, group_size: u32, rating: f64) {
        self.completed_groups += 1;
        self.completed_people += u64::from(group_size);
        self.ratings.push(rating);
    }

    pub fn summarize(&self, input: SummaryInput) -> RunSummary {
        let facilities = self
            .facilities
            .iter()
            .map(|f| FacilitySummary {
                name: f.name.clone(),
                kind: f.kind,
                groups_served: f.groups_served,
                people_served: f.people_served,
                abandonments: f.abandonments,
                regular_waits: f.regular_wait.count,
                express_waits: f.express_wait.count,
                average_wait_minutes: f.regular_wait.average_minutes(),
                max_wait_minutes: ms_to_minutes(f.regular_wait.max_ms.max(f.express_wait.max_ms)),
                express_average_wait_minutes: f.express_wait.average_minutes(),
                average_queue_length: f.average_queue_length(input.final_clock_ms),
                max_queue_length: f.max_queue,
                average_service_minutes: if f.services_completed == 0 {
                    0.0
                } else {
                    ms_to_minutes(f.service_total_ms) / f.services_completed as f64
                },
                max_busy: f.max_busy,
            })
            .collect();

        let bins = input.rating_ceiling.max(0.0).ceil() as usize + 1;
        let mut rating_histogram = vec![0u64; bins];
        for rating in &self.ratings {
            let bin = (rating.max(0.0).floor() as usize).min(bins - 1);
            rating_histogram[bin] += 1;
        }
        let (average_rating, min_rating, max_rating) = if self.ratings.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let sum: f64 = self.ratings.iter().sum();
            let min = self.ratings.iter().copied().fold(f64::INFINITY, f64::min);
            let max = self.ratings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (sum / self.ratings.len() as f64, min, max)
        };

        RunSummary {
            seed: input.seed,
            events_processed: input.events_processed,
            final_clock_ms: input.final_clock_ms,
            facilities,
            revenue: self.revenue,
            total_revenue: self.revenue.total(),
            arrived_groups: self.arrived_groups,
            arrived_people: self.arrived_people,
            entered_groups: self.entered_groups,
            completed_groups: self.completed_groups,
            completed_people: self.completed_people,
            unresolved_groups: input.unresolved_groups,
            unresolved_people: input.unresolved_people,
            average_rating,
            min_rating,
            max_rating,
            rating_histogram,
            family_splits: self.family_splits,
            express_upgrades: self.express_upgrades,
        }
    }
}

/// Run facts that live outside [ParkMetrics].
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryInput {
    pub seed: u64,
    pub events_processed: u64,
    pub final_clock_ms: u64,
    pub unresolved_groups: u64,
    pub unresolved_people: u64,
    pub rating_ceiling: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilitySummary {
    pub name: String,
    pub kind: FacilityKind,
    pub groups_served: u64,
    pub people_served: u64,
    pub abandonments: u64,
    pub regular_waits: u64,
    pub express_waits: u64,
    pub average_wait_minutes: f64,
    pub max_wait_minutes: f64,
    pub express_average_wait_minutes: f64,
    pub average_queue_length: f64,
    pub max_queue_length: usize,
    pub average_service_minutes: f64,
    pub max_busy: u32,
}

/// Final results of one replication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub events_processed: u64,
    pub final_clock_ms: u64,
    pub facilities: Vec<FacilitySummary>,
    pub revenue: Revenue,
    pub total_revenue: f64,
    pub arrived_groups: u64,
    pub arrived_people: u64,
    pub entered_groups: u64,
    pub completed_groups: u64,
    pub completed_people: u64,
    /// Groups still in the park when the run stopped; excluded from ratings.
    pub unresolved_groups: u64,
    pub unresolved_people: u64,
    pub average_rating: f64,
    pub min_rating: f64,
    pub max_rating: f64,
    /// Completed visits per whole rating point, `[0, 1)`, `[1, 2)`, ...
    pub rating_histogram: Vec<u64>,
    pub family_splits: u64,
    pub express_upgrades: u64,
}

impl FacilitySummary {
    /// Mean wait of the queue counted in the park-wide figure: the regular
    /// line at attractions, every group elsewhere. `None` if nobody waited.
    pub fn queue_wait_minutes(&self) -> Option<f64> {
        if self.kind.is_attraction() {
            return (self.regular_waits > 0).then_some(self.average_wait_minutes);
        }
        let waits = self.regular_waits + self.express_waits;
        if waits == 0 {
            return None;
        }
        let total = self.average_wait_minutes * self.regular_waits as f64
            + self.express_average_wait_minutes * self.express_waits as f64;
        Some(total / waits as f64)
    }
}

impl RunSummary {
    /// Unweighted mean, in minutes, of the per-queue average waits over every
    /// queue that served someone.
    pub fn average_wait_minutes(&self) -> f64 {
        let means: Vec<f64> = self
            .facilities
            .iter()
            .filter_map(FacilitySummary::queue_wait_minutes)
            .collect();
        if means.is_empty() {
            0.0
        } else {
            means.iter().sum::<f64>() / means.len() as f64
        }
    }

    pub fn facility(&self, name: &str) -> Option<&FacilitySummary> {
        self.facilities.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FamilyTally {
    remaining: u32,
    people: u32,
    weighted_rating: f64,
}

/// A family whose sub-groups have all left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettledFamily {
    pub people: u32,
    /// Size-weighted mean of the sub-groups' final ratings.
    pub rating: f64,
}

/// Open split families, keyed by the whole family's visitor id.
#[derive(Debug, Clone, Default, Resource)]
pub struct FamilyLedger {
    open: HashMap<u64, FamilyTally>,
}

impl FamilyLedger {
    pub fn register(&mut self, family_id: u64, subgroups: u32) {
        self.open.insert(
            family_id,
            FamilyTally {
                remaining: subgroups,
                people: 0,
                weighted_rating: 0.0,
            },
        );
    }

    /// Books one sub-group's departure. Returns the family once its last
    /// sub-group has left.
    pub fn settle(&mut self, family_id: u64, group_size: u32, rating: f64) -> Option<SettledFamily> {
        let tally = self.open.get_mut(&family_id)?;
        tally.remaining = tally.remaining.saturating_sub(1);
        tally.people += group_size;
        tally.weighted_rating += rating * f64::from(group_size);
        if tally.remaining > 0 {
            return None;
        }
        let tally = self.open.remove(&family_id)?;
        let rating = if tally.people == 0 {
            0.0
        } else {
            tally.weighted_rating / f64::from(tally.people)
        };
        Some(SettledFamily {
            people: tally.people,
            rating,
        })
    }

    pub fn open_families(&self) -> usize {
        self.open.len()
    }
}

/// Every dispatched event, in order. Present only when a trace is requested.
#[derive(Debug, Clone, Default, PartialEq, Resource)]
pub struct EventTrace(pub Vec<Event>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MS_PER_MINUTE;

    #[test]
    fn queue_length_is_time_weighted() {
        let mut stats = FacilityStats::new("Wave Pool", FacilityKind::Pool);
        stats.observe_queue(0, 2);
        stats.observe_queue(10 * MS_PER_MINUTE, 0);
        stats.observe_queue(15 * MS_PER_MINUTE, 4);
        // 2 groups for 10 min, 0 for 5 min, 4 for 5 min over 20 minutes.
        let avg = stats.average_queue_length(20 * MS_PER_MINUTE);
        assert!((avg - 2.0).abs() < 1e-12, "avg {avg}");
        assert_eq!(stats.max_queue, 4);
    }

    #[test]
    fn waits_split_by_line() {
        let mut stats = FacilityStats::new("Reception", FacilityKind::Reception);
        stats.record_start(2 * MS_PER_MINUTE, false, 4, 1);
        stats.record_start(4 * MS_PER_MINUTE, false, 2, 2);
        stats.record_start(MS_PER_MINUTE, true, 3, 3);
        assert!((stats.regular_wait.average_minutes() - 3.0).abs() < 1e-12);
        assert!((stats.express_wait.average_minutes() - 1.0).abs() < 1e-12);
        assert_eq!(stats.people_served, 9);
        assert_eq!(stats.max_busy, 3);
    }

    #[test]
    fn family_settles_after_its_last_subgroup() {
        let mut ledger = FamilyLedger::default();
        ledger.register(7, 2);
        assert_eq!(ledger.settle(7, 3, 9.0), None);
        let settled = ledger.settle(7, 1, 5.0).expect("settled");
        assert_eq!(settled.people, 4);
        assert!((settled.rating - 8.0).abs() < 1e-12);
        assert_eq!(ledger.open_families(), 0);
        assert_eq!(ledger.settle(7, 1, 5.0), None);
    }

    #[test]
    fn summary_histogram_and_per_queue_wait() {
        let mut metrics = ParkMetrics::with_facilities(vec![
            FacilityStats::new("Reception", FacilityKind::Reception),
            FacilityStats::new("Lazy River", FacilityKind::River),
            FacilityStats::new("Pizza", FacilityKind::Restaurant),
        ]);
        metrics.facilities[0].record_start(MS_PER_MINUTE, false, 1, 1);
        metrics.facilities[0].record_start(3 * MS_PER_MINUTE, true, 1, 1);
        metrics.facilities[1].record_start(4 * MS_PER_MINUTE, false, 1, 1);
        metrics.facilities[1].record_start(4 * MS_PER_MINUTE, false, 1, 1);
        metrics.facilities[1].record_start(0, true, 1, 1);
        metrics.record_completion(2, 9.4);
        metrics.record_completion(1, 0.0);
        metrics.record_completion(3, 25.0);
        metrics.revenue.tickets = 300.0;
        metrics.revenue.photos = 20.0;

        let summary = metrics.summarize(SummaryInput {
            final_clock_ms: MS_PER_MINUTE,
            rating_ceiling: 20.0,
            ..Default::default()
        });
        assert_eq!(summary.rating_histogram.len(), 21);
        assert_eq!(summary.rating_histogram[0], 1);
        assert_eq!(summary.rating_histogram[9], 1);
        assert_eq!(summary.rating_histogram[20], 1);
        assert_eq!(summary.completed_people, 6);
        assert!((summary.total_revenue - 320.0).abs() < 1e-12);
        // Reception counts both lines (2 min), the river its regular line
        // (4 min), the idle restaurant not at all.
        assert_eq!(summary.facilities[2].queue_wait_minutes(), None);
        assert!((summary.average_wait_minutes() - 3.0).abs() < 1e-12);
    }
}
