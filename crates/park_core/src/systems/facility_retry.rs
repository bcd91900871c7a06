use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::config::ParkConfig;
use crate::distributions::ParkRng;
use crate::error::SimFault;
use crate::metrics::ParkMetrics;

use super::service::{admit_waiting, FacilityQuery, ServiceContext, VisitorQuery};

/// A lane spacing or tour blackout has run out; try the line again.
#[allow(clippy::too_many_arguments)]
pub fn facility_retry_system(
    event: Res<CurrentEvent>,
    config: Res<ParkConfig>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<ParkRng>,
    mut metrics: ResMut<ParkMetrics>,
    mut fault: ResMut<SimFault>,
    mut facilities: FacilityQuery,
    mut visitors: VisitorQuery,
) {
    if event.0.kind != EventKind::FacilityRetry {
        return;
    }
    let Some(EventSubject::Facility(facility_entity)) = event.0.subject else {
        return;
    };
    {
        let Ok((_, _, mut servers)) = facilities.get_mut(facility_entity) else {
            return;
        };
        if servers.retry_at == Some(clock.now()) {
            servers.retry_at = None;
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
