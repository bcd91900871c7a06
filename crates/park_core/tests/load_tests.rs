//! Load tests for park_core: a full day at the baseline park and at a busier one.

use bevy_ecs::prelude::World;
use park_core::config::ParkConfig;
use park_core::distributions::Distribution;
use park_core::runner::{initialize_simulation, run_until_empty, simulation_schedule};
use park_core::scenario::build_park;
use park_core::simulation::MAX_STEPS;
use std::time::Instant;

fn timed_day(config: &ParkConfig) -> (usize, f64) {
    let mut world = World::new();
    build_park(&mut world, config).expect("valid park");

    let start = Instant::now();
    initialize_simulation(&mut world);
    let mut schedule = simulation_schedule();
    let events = run_until_empty(&mut world, &mut schedule, MAX_STEPS).expect("run");
    (events, start.elapsed().as_secs_f64())
}

#[test]
#[ignore] // Only run explicitly: cargo test --package park_core --test load_tests -- --ignored
fn test_baseline_day() {
    let (events, secs) = timed_day(&ParkConfig::default());
    let events_per_sec = events as f64 / secs;
    println!(
        "Baseline day: {} events in {:.2}s ({:.0} events/sec)",
        events, secs, events_per_sec
    );

    assert!(
        events_per_sec > 1000.0,
        "Should process >1000 events/sec, got {:.0}",
        events_per_sec
    );
}

#[test]
#[ignore]
fn test_crowded_day() {
    // Arrivals twice as often as the baseline.
    let mut config = ParkConfig::default();
    for stream in &mut config.arrivals {
        if let Some(mean) = stream.inter_arrival.mean() {
            stream.inter_arrival = Distribution::exponential(2.0 / mean);
        }
    }
    let (events, secs) = timed_day(&config);
    let events_per_sec = events as f64 / secs;
    println!(
        "Crowded day: {} events in {:.2}s ({:.0} events/sec)",
        events, secs, events_per_sec
    );

    assert!(events < MAX_STEPS, "step limit reached");
    assert!(
        events_per_sec > 500.0,
        "Should process >500 events/sec under a crowded day, got {:.0}",
        events_per_sec
    );
}
