use bevy_ecs::prelude::{Res, ResMut};
use tracing::info;

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::scenario::ParkStatus;

/// Stops arrivals; deciding groups leave from now on. Groups already in a
/// line or in service finish.
pub fn park_closing_system(
    event: Res<CurrentEvent>,
    clock: Res<SimulationClock>,
    mut status: ResMut<ParkStatus>,
) {
    if event.0.kind != EventKind::ParkClosing {
        return;
    }
    status.closed = true;
    info!(at = clock.now(), pending = clock.pending_event_count(), "park closing");
}
