//! One replication, from configuration to summary.

use bevy_ecs::prelude::World;
use tracing::{info, warn};

use crate::clock::SimulationClock;
use crate::config::ParkConfig;
use crate::ecs::Visitor;
use crate::error::SimResult;
use crate::metrics::{EventTrace, FamilyLedger, ParkMetrics, RunSummary, SummaryInput};
use crate::profiling::EventMetrics;
use crate::runner::{initialize_simulation, run_until_empty, simulation_schedule};
use crate::scenario::build_park;

/// Upper bound on dispatched events per replication; a baseline day needs a
/// few tens of thousands.
pub const MAX_STEPS: usize = 5_000_000;

/// Builds the park, runs it to the horizon (or until no events remain) and
/// summarises the day.
pub fn run(config: &ParkConfig) -> SimResult<RunSummary> {
    let mut world = prepare(config, false)?;
    drive(&mut world)?;
    Ok(summarize(&mut world, config))
}

/// Like [run], also returning every dispatched event in order.
pub fn run_with_trace(config: &ParkConfig) -> SimResult<(RunSummary, EventTrace)> {
    let mut world = prepare(config, true)?;
    drive(&mut world)?;
    let summary = summarize(&mut world, config);
    let trace = world.remove_resource::<EventTrace>().unwrap_or_default();
    Ok((summary, trace))
}

fn prepare(config: &ParkConfig, trace: bool) -> SimResult<World> {
    let mut world = World::new();
    build_park(&mut world, config)?;
    if trace {
        world.insert_resource(EventTrace::default());
    }
    initialize_simulation(&mut world);
    Ok(world)
}

fn drive(world: &mut World) -> SimResult<usize> {
    let mut schedule = simulation_schedule();
    let steps = run_until_empty(world, &mut schedule, MAX_STEPS)?;
    if steps == MAX_STEPS {
        warn!(steps, "step limit reached before the event queue drained");
    }
    Ok(steps)
}

/// Reads the final state of a finished world into a [RunSummary]. Visitors
/// still in the park are reported as unresolved and left out of ratings.
pub fn summarize(world: &mut World, config: &ParkConfig) -> RunSummary {
    let (unresolved_groups, unresolved_people) = world
        .query::<&Visitor>()
        .iter(world)
        .fold((0u64, 0u64), |(groups, people), visitor| {
            (groups + 1, people + u64::from(visitor.group_size))
        });
    let final_clock_ms = world.resource::<SimulationClock>().now();
    let events_processed = match world.get_resource::<EventMetrics>() {
        Some(metrics) => {
            metrics.log_summary();
            metrics.events_processed
        }
        None => 0,
    };
    let open_families = world
        .get_resource::<FamilyLedger>()
        .map_or(0, FamilyLedger::open_families);

    let summary = world.resource::<ParkMetrics>().summarize(SummaryInput {
        seed: config.seed,
        events_processed,
        final_clock_ms,
        unresolved_groups,
        unresolved_people,
        rating_ceiling: config.behaviour.rating_ceiling,
    });

    info!(
        seed = config.seed,
        events = events_processed,
        completed = summary.completed_groups,
        unresolved = unresolved_groups,
        open_families,
        average_wait = summary.average_wait_minutes(),
        average_rating = summary.average_rating,
        revenue = summary.total_revenue,
        "replication finished"
    );
    summary
}
