use bevy_ecs::prelude::{Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::config::ParkConfig;
use crate::distributions::ParkRng;
use crate::ecs::{VisitorKind, VisitorState};
use crate::error::SimFault;
use crate::metrics::ParkMetrics;

use super::service::{admit_waiting, FacilityQuery, ServiceContext, VisitorQuery};

/// A group runs out of patience. Teen groups may buy an express pass and
/// rejoin the same facility; everyone else moves on to their next decision.
#[allow(clippy::too_many_arguments)]
pub fn abandonment_system(
    event: Res<CurrentEvent>,
    config: Res<ParkConfig>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<ParkRng>,
    mut metrics: ResMut<ParkMetrics>,
    mut fault: ResMut<SimFault>,
    mut facilities: FacilityQuery,
    mut visitors: VisitorQuery,
) {
    if event.0.kind != EventKind::Abandonment {
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
        let now = clock.now();
        let Ok((facility, mut line, _)) = facilities.get_mut(facility_entity) else {
            return;
        };
        let Ok((mut visitor, mut state, mut satisfaction)) = visitors.get_mut(visitor_entity)
        else {
            return;
        };
        // Served, or requeued with a later deadline: stale event.
        let due = matches!(
            *state,
            VisitorState::Queueing { facility: queued_at, abandon_at: Some(at), .. }
                if queued_at == facility_entity && at == now
        );
        if !due || line.remove(visitor_entity).is_none() {
            return;
        }

        satisfaction.adjust(-config.behaviour.abandonment_penalty);
        visitor.abandoned.push(facility.id);
        if let Some(stats) = metrics.facility_mut(facility.id) {
            stats.abandonments += 1;
        }
        metrics.observe_queue(facility.id, now, line.len());

        let teens = &config.teens;
        let price = config.prices.express(visitor.group_size);
        let buys_express = visitor.kind == VisitorKind::TeenGroup
            && !visitor.express_pass
            && rng.bernoulli(teens.express_after_abandon)
            && visitor.can_afford(price)
            && line.len() >= teens.express_min_queue;

        if buys_express {
            visitor.spend(price);
            visitor.express_pass = true;
            visitor.abandoned.retain(|id| *id != facility.id);
            metrics.revenue.express += price;
            metrics.express_upgrades += 1;
            debug!(visitor = visitor.id, facility = %facility.name, "express pass after abandoning");
            clock.schedule_now(EventKind::FacilityArrival, event.0.subject);
        } else {
            debug!(visitor = visitor.id, facility = %facility.name, "abandoned queue");
            *state = VisitorState::Deciding;
            clock.schedule_now(
                EventKind::VisitorDecision,
                Some(EventSubject::Visitor(visitor_entity)),
            );
        }
    }

    // The departing group may have been blocking a headcount or batch start.
    let mut ctx = ServiceContext {
        clock: &mut clock,
        rng: &mut rng,
        metrics: &mut metrics,
        fault: &mut fault,
        behaviour: &config.behaviour,
    };
    admit_waiting(facility_entity, &mut facilities, &mut visitors, &mut ctx);
}
