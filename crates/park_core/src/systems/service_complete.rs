use bevy_ecs::prelude::{Res, ResMut};
use tracing::trace;

use crate::clock::{minutes_to_ms, CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::config::ParkConfig;
use crate::distributions::ParkRng;
use crate::ecs::VisitorState;
use crate::error::SimFault;
use crate::facility::{complete_service, FacilityKind};
use crate::metrics::ParkMetrics;
use crate::scenario::ParkLayout;

use super::service::{admit_waiting, FacilityQuery, ServiceContext, VisitorQuery};

/// Rating gained from a good ride: bigger groups and wilder rides score more.
pub fn good_experience_bonus(group_size: u32, adrenaline: u8) -> f64 {
    (f64::from(group_size) - 1.0) / 5.0 * 0.3 + (f64::from(adrenaline) - 1.0) / 4.0 * 0.7
}

/// Frees the group's units and applies the facility's outcome: tickets at
/// reception, the bill and a meal at restaurants, a rating change at
/// attractions. The freed capacity is offered to the line straight away.
#[allow(clippy::too_many_arguments)]
pub fn service_complete_system(
    event: Res<CurrentEvent>,
    config: Res<ParkConfig>,
    layout: Res<ParkLayout>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<ParkRng>,
    mut metrics: ResMut<ParkMetrics>,
    mut fault: ResMut<SimFault>,
    mut facilities: FacilityQuery,
    mut visitors: VisitorQuery,
) {
    if event.0.kind != EventKind::ServiceComplete {
        return;
    }
    let Some(EventSubject::Visit {
        visitor: visitor_entity,
        facility: facility_entity,
    }) = event.0.subject
    else {
        return;
    };

    {
        let Ok((facility, _, mut servers)) = facilities.get_mut(facility_entity) else {
            return;
        };
        let Ok((mut visitor, mut state, mut satisfaction)) = visitors.get_mut(visitor_entity)
        else {
            return;
        };
        if !complete_service(facility, &mut servers, visitor_entity, visitor.group_size) {
            return;
        }

        let now = clock.now();
        if let VisitorState::Served { since, .. } = *state {
            if let Some(stats) = metrics.facility_mut(facility.id) {
                stats.record_service(now.saturating_sub(since));
            }
        }

        match facility.kind {
            FacilityKind::Reception => {
                let prices = &config.prices;
                metrics.revenue.tickets += prices.tickets(visitor.kind, visitor.group_size);
                if visitor.express_pass {
                    metrics.revenue.express += prices.express(visitor.group_size);
                }
                metrics.entered_groups += 1;
                *state = VisitorState::Deciding;
                clock.schedule_now(
                    EventKind::VisitorDecision,
                    Some(EventSubject::Visitor(visitor_entity)),
                );
            }
            FacilityKind::Restaurant => {
                let bill = layout
                    .restaurant(facility_entity)
                    .map_or(0.0, |slot| slot.price.bill(visitor.group_size));
                metrics.revenue.food += bill;
                visitor.spend(bill);
                let behaviour = &config.behaviour;
                if rng.bernoulli(behaviour.bad_meal_probability) {
                    satisfaction.adjust(-behaviour.bad_meal_penalty);
                }
                let meal_ms = minutes_to_ms(rng.sample(&behaviour.meal_duration));
                clock.schedule_in(
                    meal_ms,
                    EventKind::MealEnd,
                    Some(EventSubject::Visitor(visitor_entity)),
                );
            }
            _ => {
                let behaviour = &config.behaviour;
                visitor.visited.push(facility.id);
                visitor.attractions_done += 1;
                if rng.bernoulli(behaviour.good_experience_probability) {
                    satisfaction.adjust(good_experience_bonus(visitor.group_size, facility.adrenaline));
                } else {
                    satisfaction.adjust(-behaviour.bad_experience_penalty);
                }
                *state = VisitorState::Deciding;
                clock.schedule_now(
                    EventKind::VisitorDecision,
                    Some(EventSubject::Visitor(visitor_entity)),
                );
            }
        }
        trace!(
            visitor = visitor.id,
            facility = %facility.name,
            at = now,
            "service complete"
        );
    }

    let mut ctx = ServiceContext {
        clock: &mut clock,
        rng: &mut rng,
        metrics: &mut metrics,
        fault: &mut fault,
        behaviour: &config.behaviour,
    };
    admit_waiting(facility_entity, &mut facilities, &mut visitors, &mut ctx);
}
