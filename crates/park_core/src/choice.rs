//! Which attraction a visitor group heads to next.

use bevy_ecs::prelude::Entity;

use crate::ecs::{Visitor, VisitorKind};
use crate::facility::Facility;

/// Minimum adrenaline level teen groups look for.
pub const TEEN_ADRENALINE: u8 = 3;

/// Minimum age limit singles look for on their first ride.
pub const SINGLE_FIRST_MIN_AGE: f64 = 12.0;

/// An attraction as seen by a deciding visitor.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub entity: Entity,
    pub facility: &'a Facility,
    /// Groups waiting across both lines.
    pub waiting_groups: usize,
}

/// Whether the group may use this attraction at all.
pub fn is_eligible(visitor: &Visitor, facility: &Facility) -> bool {
    facility.kind.is_attraction()
        && !visitor.has_tried(facility.id)
        && facility.age_eligible(visitor.youngest_age)
        && facility
            .admission
            .admits_group(visitor.group_size, facility.capacity)
}

fn preferred(visitor: &Visitor, facility: &Facility, first_visit: bool) -> bool {
    match visitor.kind {
        VisitorKind::Family => !first_visit || facility.min_age <= 0.0,
        VisitorKind::TeenGroup => facility.adrenaline >= TEEN_ADRENALINE,
        VisitorKind::Single => !first_visit || facility.min_age >= SINGLE_FIRST_MIN_AGE,
    }
}

/// Picks the eligible attraction with the shortest waiting line, preferring
/// the ones that suit the group type. Ties go to the lowest facility id.
pub fn choose_attraction(visitor: &Visitor, candidates: &[Candidate<'_>]) -> Option<Entity> {
    let first_visit = visitor.attractions_done == 0;
    let eligible: Vec<&Candidate<'_>> = candidates
        .iter()
        .filter(|c| is_eligible(visitor, c.facility))
        .collect();

    let shortest = |pool: &[&Candidate<'_>]| {
        pool.iter()
            .min_by_key(|c| (c.waiting_groups, c.facility.id))
            .map(|c| c.entity)
    };

    let favourites: Vec<&Candidate<'_>> = eligible
        .iter()
        .copied()
        .filter(|c| preferred(visitor, c.facility, first_visit))
        .collect();

    shortest(&favourites).or_else(|| shortest(&eligible))
}

/// Index into `weights` drawn with probability proportional to each weight,
/// given a uniform draw `u` in `[0, 1)`.
pub fn weighted_index(weights: &[f64], u: f64) -> Option<usize> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= 0.0 {
        return None;
    }
    let target = u * total;
    let mut cumulative = 0.0;
    let mut last = None;
    for (i, weight) in weights.iter().enumerate() {
        if *weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last = Some(i);
        if target < cumulative {
            return Some(i);
        }
    }
    last
}
