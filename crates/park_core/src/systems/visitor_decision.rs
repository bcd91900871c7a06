//! What a group does after reception, a ride, a meal or an abandoned queue.
//!
//! In order: leave (park closed or the group's own departure time), split a
//! whole family, go for lunch, or head to the next attraction. A group with
//! nothing left to ride leaves.

use bevy_ecs::prelude::{Commands, Entity, Query, Res, ResMut};
use tracing::debug;

use crate::choice::{choose_attraction, weighted_index, Candidate};
use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::config::ParkConfig;
use crate::distributions::{sample_uniform, ParkRng};
use crate::ecs::{FamilyMembers, Satisfaction, Visitor, VisitorState, ADULT_AGE};
use crate::facility::{Facility, WaitingLine};
use crate::metrics::{FamilyLedger, ParkMetrics};
use crate::scenario::{ParkLayout, ParkStatus, VisitorIds};

use super::departure::depart;

/// Youngest child that still stays with the first parent.
pub const YOUNG_KID_AGE: f64 = 8.0;

/// Youngest child that goes off without a parent.
pub const TEEN_KID_AGE: f64 = 12.0;

/// Size and youngest age of one sub-group of a splitting family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubgroupPlan {
    pub size: u32,
    pub youngest_age: f64,
}

/// Splits two parents and their kids into two or three groups: one parent
/// with the kids under eight, the other parent with the kids aged eight to
/// eleven, and the older kids on their own. With two groups, or no older
/// kids, the older kids stay with the second parent.
pub fn plan_split(kids_ages: &[f64], three_way: bool) -> Vec<SubgroupPlan> {
    let young: Vec<f64> = kids_ages.iter().copied().filter(|a| *a < YOUNG_KID_AGE).collect();
    let middle: Vec<f64> = kids_ages
        .iter()
        .copied()
        .filter(|a| (YOUNG_KID_AGE..TEEN_KID_AGE).contains(a))
        .collect();
    let older: Vec<f64> = kids_ages.iter().copied().filter(|a| *a >= TEEN_KID_AGE).collect();

    let with_parent = |kids: &[f64]| SubgroupPlan {
        size: 1 + kids.len() as u32,
        youngest_age: kids.iter().copied().fold(ADULT_AGE, f64::min),
    };

    if three_way && !older.is_empty() {
        vec![
            with_parent(&young),
            with_parent(&middle),
            SubgroupPlan {
                size: older.len() as u32,
                youngest_age: older.iter().copied().fold(f64::INFINITY, f64::min),
            },
        ]
    } else {
        let second: Vec<f64> = middle.into_iter().chain(older).collect();
        vec![with_parent(&young), with_parent(&second)]
    }
}

#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn visitor_decision_system(
    mut commands: Commands,
    event: Res<CurrentEvent>,
    config: Res<ParkConfig>,
    layout: Res<ParkLayout>,
    status: Res<ParkStatus>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<ParkRng>,
    mut ids: ResMut<VisitorIds>,
    mut metrics: ResMut<ParkMetrics>,
    mut ledger: ResMut<FamilyLedger>,
    mut visitors: Query<(
        &mut Visitor,
        &mut VisitorState,
        &mut Satisfaction,
        Option<&FamilyMembers>,
    )>,
    facilities: Query<(&Facility, &WaitingLine)>,
) {
    if event.0.kind != EventKind::VisitorDecision {
        return;
    }
    let Some(EventSubject::Visitor(entity)) = event.0.subject else {
        return;
    };
    let Ok((mut visitor, mut state, mut satisfaction, family)) = visitors.get_mut(entity) else {
        return;
    };
    if *state != VisitorState::Deciding {
        return;
    }
    let now = clock.now();

    if status.closed || now >= visitor.departure_at {
        *state = VisitorState::Departed;
        depart(
            &mut commands,
            entity,
            &visitor,
            satisfaction.rating,
            now,
            &config.prices,
            &mut metrics,
            &mut ledger,
        );
        return;
    }

    if let Some(family) = family {
        if visitor.is_whole_family()
            && visitor.attractions_done >= 1
            && rng.bernoulli(config.families.split_probability)
        {
            let three_way = rng.bernoulli(config.families.three_way_split_probability);
            let plans = plan_split(&family.kids_ages, three_way);
            ledger.register(visitor.id, plans.len() as u32);
            metrics.family_splits += 1;
            debug!(family = visitor.id, groups = plans.len(), at = now, "family split");

            for plan in plans {
                let child = Visitor {
                    id: ids.next_id(),
                    group_size: plan.size,
                    youngest_age: plan.youngest_age,
                    lineage: Some(visitor.id),
                    ..visitor.clone()
                };
                let child = commands
                    .spawn((child, VisitorState::Deciding, *satisfaction))
                    .id();
                clock.schedule_now(EventKind::VisitorDecision, Some(EventSubject::Visitor(child)));
            }
            commands.entity(entity).despawn();
            return;
        }
    }

    let behaviour = &config.behaviour;
    let lunch_time = (behaviour.lunch_start_ms..behaviour.lunch_end_ms).contains(&now);
    if lunch_time && !visitor.has_eaten && rng.bernoulli(behaviour.lunch_probability) {
        let u = sample_uniform(rng.inner(), 0.0, 1.0);
        if let Some(slot) = weighted_index(&layout.restaurant_weights(), u)
            .and_then(|index| layout.restaurants.get(index))
        {
            visitor.has_eaten = true;
            clock.schedule_now(
                EventKind::FacilityArrival,
                Some(EventSubject::Visit {
                    visitor: entity,
                    facility: slot.entity,
                }),
            );
            return;
        }
    }

    let candidates: Vec<Candidate<'_>> = layout
        .attractions
        .iter()
        .filter_map(|attraction| {
            let (facility, line) = facilities.get(*attraction).ok()?;
            Some(Candidate {
                entity: *attraction,
                facility,
                waiting_groups: line.len(),
            })
        })
        .collect();

    match choose_attraction(&visitor, &candidates) {
        Some(next) => {
            clock.schedule_now(
                EventKind::FacilityArrival,
                Some(EventSubject::Visit {
                    visitor: entity,
                    facility: next,
                }),
            );
        }
        None => {
            if visitor.attractions_done == 0 && visitor.abandoned.is_empty() {
                satisfaction.adjust(-behaviour.no_attraction_penalty);
            }
            *state = VisitorState::Departed;
            depart(
                &mut commands,
                entity,
                &visitor,
                satisfaction.rating,
                now,
                &config.prices,
                &mut metrics,
                &mut ledger,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(plans: &[SubgroupPlan]) -> Vec<u32> {
        plans.iter().map(|p| p.size).collect()
    }

    #[test]
    fn three_way_split_sends_older_kids_off_alone() {
        let plans = plan_split(&[3.0, 9.0, 13.0, 15.0], true);
        assert_eq!(sizes(&plans), vec![2, 2, 2]);
        assert_eq!(plans[0].youngest_age, 3.0);
        assert_eq!(plans[1].youngest_age, 9.0);
        assert_eq!(plans[2].youngest_age, 13.0);
    }

    #[test]
    fn two_way_split_keeps_older_kids_with_the_second_parent() {
        let plans = plan_split(&[3.0, 9.0, 13.0], false);
        assert_eq!(sizes(&plans), vec![2, 3]);
        assert_eq!(plans[1].youngest_age, 9.0);
    }

    #[test]
    fn a_parent_may_go_alone() {
        let plans = plan_split(&[14.0, 16.0], true);
        assert_eq!(sizes(&plans), vec![1, 1, 2]);
        assert_eq!(plans[0].youngest_age, ADULT_AGE);

        let plans = plan_split(&[5.0], true);
        assert_eq!(sizes(&plans), vec![2, 1]);
    }

    #[test]
    fn split_sizes_always_cover_the_family() {
        let kids = [2.5, 4.0, 8.0, 11.9, 12.0];
        for three_way in [false, true] {
            let plans = plan_split(&kids, three_way);
            assert!(plans.len() >= 2);
            assert_eq!(plans.iter().map(|p| p.size).sum::<u32>(), 2 + kids.len() as u32);
        }
    }
}
