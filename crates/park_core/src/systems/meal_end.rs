use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::ecs::VisitorState;

/// Lunch is over; the group decides what to do next.
pub fn meal_end_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut visitors: Query<&mut VisitorState>,
) {
    if event.0.kind != EventKind::MealEnd {
        return;
    }
    let Some(EventSubject::Visitor(entity)) = event.0.subject else {
        return;
    };
    let Ok(mut state) = visitors.get_mut(entity) else {
        return;
    };
    if !matches!(*state, VisitorState::Served { .. }) {
        return;
    }
    *state = VisitorState::Deciding;
    clock.schedule_now(EventKind::VisitorDecision, Some(EventSubject::Visitor(entity)));
}
