use bevy_ecs::prelude::{Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::config::ParkConfig;
use crate::distributions::ParkRng;
use crate::error::SimFault;
use crate::facility::{instructor_after_return, Instructor};
use crate::metrics::ParkMetrics;

use super::service::{admit_waiting, FacilityQuery, ServiceContext, VisitorQuery};

/// An instructor is back from a tour and its break, or from lunch.
#[allow(clippy::too_many_arguments)]
pub fn instructor_return_system(
    event: Res<CurrentEvent>,
    config: Res<ParkConfig>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<ParkRng>,
    mut metrics: ResMut<ParkMetrics>,
    mut fault: ResMut<SimFault>,
    mut facilities: FacilityQuery,
    mut visitors: VisitorQuery,
) {
    if event.0.kind != EventKind::InstructorReturn {
        return;
    }
    let Some(EventSubject::Instructor {
        facility: facility_entity,
        slot,
    }) = event.0.subject
    else {
        return;
    };

    {
        let now = clock.now();
        let Ok((facility, _, mut servers)) = facilities.get_mut(facility_entity) else {
            return;
        };
        let Some(current) = servers.instructors.get(slot).copied() else {
            return;
        };
        // Back from lunch.
        let (next, lunch_until) = if current == Instructor::AtLunch {
            (Instructor::Available, None)
        } else {
            instructor_after_return(&facility.admission, now)
        };
        servers.instructors[slot] = next;

        if let Some(until) = lunch_until {
            debug!(facility = %facility.name, slot, until, "instructor at lunch");
            if let Err(error) = clock.schedule_at(until, EventKind::InstructorReturn, event.0.subject) {
                fault.raise(error);
            }
            return;
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
