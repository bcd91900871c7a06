use bevy_ecs::prelude::{Res, ResMut};
use tracing::info;

use crate::clock::{minutes_to_ms, CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::config::ParkConfig;
use crate::distributions::ParkRng;
use crate::error::SimFault;

/// Seeds the first arrival of every stream and the park closing.
pub fn simulation_started_system(
    event: Res<CurrentEvent>,
    config: Res<ParkConfig>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<ParkRng>,
    mut fault: ResMut<SimFault>,
) {
    if event.0.kind != EventKind::SimulationStarted {
        return;
    }

    for (index, stream) in config.arrivals.iter().enumerate() {
        let first = stream.start_ms + minutes_to_ms(rng.sample(&stream.inter_arrival));
        if first >= stream.end_ms {
            continue;
        }
        if let Err(error) = clock.schedule_at(
            first,
            EventKind::VisitorArrival,
            Some(EventSubject::Stream(index)),
        ) {
            fault.raise(error);
        }
    }

    if let Err(error) = clock.schedule_at(config.closing_ms, EventKind::ParkClosing, None) {
        fault.raise(error);
    }

    info!(
        streams = config.arrivals.len(),
        closing_ms = config.closing_ms,
        horizon_ms = config.horizon_ms,
        "park opened"
    );
}
