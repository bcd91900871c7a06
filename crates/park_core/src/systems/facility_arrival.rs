use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{minutes_to_ms, CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::config::ParkConfig;
use crate::distributions::ParkRng;
use crate::ecs::VisitorState;
use crate::error::SimFault;
use crate::facility::{enqueue, QueueEntry};
use crate::metrics::ParkMetrics;

use super::service::{admit_waiting, FacilityQuery, ServiceContext, VisitorQuery};

/// Puts the group in line and starts service if the facility has room.
/// Only attractions run an express line; elsewhere every group joins the
/// regular line. Regular-line groups at attractions get an abandonment deadline.
#[allow(clippy::too_many_arguments)]
pub fn facility_arrival_system(
    event: Res<CurrentEvent>,
    config: Res<ParkConfig>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<ParkRng>,
    mut metrics: ResMut<ParkMetrics>,
    mut fault: ResMut<SimFault>,
    mut facilities: FacilityQuery,
    mut visitors: VisitorQuery,
) {
    if event.0.kind != EventKind::FacilityArrival {
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
        let Ok((facility, mut line, _)) = facilities.get_mut(facility_entity) else {
            return;
        };
        let Ok((visitor, mut state, _)) = visitors.get_mut(visitor_entity) else {
            return;
        };

        let now = clock.now();
        let abandon_at = (facility.kind.is_attraction() && !visitor.express_pass).then(|| {
            let patience = config.behaviour.patience.for_kind(visitor.kind);
            now + minutes_to_ms(rng.sample(patience))
        });

        enqueue(
            &mut line,
            QueueEntry {
                visitor: visitor_entity,
                group_size: visitor.group_size,
                enqueued_at: now,
                express: visitor.express_pass && facility.kind.is_attraction(),
            },
        );
        *state = VisitorState::Queueing {
            facility: facility_entity,
            since: now,
            abandon_at,
        };
        metrics.observe_queue(facility.id, now, line.len());

        if let Some(at) = abandon_at {
            if let Err(error) = clock.schedule_at(at, EventKind::Abandonment, event.0.subject) {
                fault.raise(error);
            }
        }
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
