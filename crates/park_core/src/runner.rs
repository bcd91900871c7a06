//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each step
//! pops the next event from [SimulationClock], inserts it as [CurrentEvent],
//! then runs the schedule. A fault raised by a system ends the run with that
//! error once the step has finished.

use bevy_ecs::prelude::Res;
use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::{apply_deferred, IntoSystemConfigs};

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::error::{SimError, SimFault};
use crate::metrics::EventTrace;
use crate::profiling::EventMetrics;
use crate::scenario::HorizonMs;
use crate::systems::{
    abandonment::abandonment_system, facility_arrival::facility_arrival_system,
    facility_retry::facility_retry_system, instructor_return::instructor_return_system,
    meal_end::meal_end_system, park_closing::park_closing_system,
    service_complete::service_complete_system, simulation_started::simulation_started_system,
    visitor_arrival::visitor_arrival_system, visitor_decision::visitor_decision_system,
};

fn current_kind(event: &Option<Res<CurrentEvent>>) -> Option<EventKind> {
    event.as_ref().map(|e| e.0.kind)
}

fn is_simulation_started(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind(&event) == Some(EventKind::SimulationStarted)
}

fn is_visitor_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind(&event) == Some(EventKind::VisitorArrival)
}

fn is_facility_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind(&event) == Some(EventKind::FacilityArrival)
}

fn is_service_complete(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind(&event) == Some(EventKind::ServiceComplete)
}

fn is_abandonment(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind(&event) == Some(EventKind::Abandonment)
}

fn is_visitor_decision(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind(&event) == Some(EventKind::VisitorDecision)
}

fn is_meal_end(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind(&event) == Some(EventKind::MealEnd)
}

fn is_facility_retry(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind(&event) == Some(EventKind::FacilityRetry)
}

fn is_instructor_return(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind(&event) == Some(EventKind::InstructorReturn)
}

fn is_park_closing(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind(&event) == Some(EventKind::ParkClosing)
}

/// Runs one simulation step: pops the next event, inserts it as [CurrentEvent], then runs the schedule.
/// Returns `Ok(true)` if an event was processed and `Ok(false)` if the clock was empty or the next
/// event lies past [HorizonMs] (when that resource is present). Events past the horizon stay queued.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> Result<bool, SimError> {
    run_next_event_with_hook(world, schedule, |_, _| {})
}

/// Runs one simulation step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    mut hook: F,
) -> Result<bool, SimError>
where
    F: FnMut(&World, &Event),
{
    let horizon = world.get_resource::<HorizonMs>().map(|h| h.0);
    let next_ts = world
        .get_resource::<SimulationClock>()
        .and_then(|c| c.next_event_time());
    if let (Some(end_ms), Some(ts)) = (horizon, next_ts) {
        if ts > end_ms {
            return Ok(false);
        }
    }

    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(e) => e,
        None => return Ok(false),
    };
    world.insert_resource(CurrentEvent(event));

    if let Some(mut metrics) = world.get_resource_mut::<EventMetrics>() {
        metrics.record_event(event.kind);
    }
    if let Some(mut trace) = world.get_resource_mut::<EventTrace>() {
        trace.0.push(event);
    }

    schedule.run(world);

    if let Some(error) = world
        .get_resource_mut::<SimFault>()
        .and_then(|mut fault| fault.take())
    {
        return Err(error);
    }
    hook(world, &event);
    Ok(true)
}

/// Runs simulation steps until the event queue is empty, the horizon is reached or `max_steps`
/// is hit. Returns the number of steps executed.
pub fn run_until_empty(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
) -> Result<usize, SimError> {
    run_until_empty_with_hook(world, schedule, max_steps, |_, _| {})
}

/// Runs simulation steps until empty and invokes `hook` after each step.
pub fn run_until_empty_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    mut hook: F,
) -> Result<usize, SimError>
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while steps < max_steps && run_next_event_with_hook(world, schedule, &mut hook)? {
        steps += 1;
    }
    Ok(steps)
}

/// Builds the park schedule: one system per event kind, gated on the current
/// event, plus [apply_deferred] so spawned and despawned visitors are applied
/// before the next step.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.add_systems((
        simulation_started_system.run_if(is_simulation_started),
        visitor_arrival_system.run_if(is_visitor_arrival),
        facility_arrival_system.run_if(is_facility_arrival),
        service_complete_system.run_if(is_service_complete),
        abandonment_system.run_if(is_abandonment),
        visitor_decision_system.run_if(is_visitor_decision),
        meal_end_system.run_if(is_meal_end),
        facility_retry_system.run_if(is_facility_retry),
        instructor_return_system.run_if(is_instructor_return),
        park_closing_system.run_if(is_park_closing),
        apply_deferred,
    ));

    schedule
}

/// Schedules `SimulationStarted` at time 0. Call this after [crate::scenario::build_park]
/// and before running events.
pub fn initialize_simulation(world: &mut World) {
    world
        .resource_mut::<SimulationClock>()
        .schedule_now(EventKind::SimulationStarted, None);
}
