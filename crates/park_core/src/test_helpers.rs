//! Test helpers for common test setup and utilities.
//!
//! Small parks with deterministic timings, so tests can assert exact
//! timestamps. For the full baseline park use [ParkConfig::default].

use bevy_ecs::prelude::World;

use crate::config::{ArrivalStream, FacilityConfig, ParkConfig};
use crate::distributions::Distribution;
use crate::ecs::VisitorKind;
use crate::error::SimResult;
use crate::facility::{Admission, FacilityKind};
use crate::runner::initialize_simulation;
use crate::scenario::build_park;

/// A plain attraction with `capacity` servers and a constant ride time.
pub fn single_attraction(capacity: u32, minutes: f64) -> FacilityConfig {
    FacilityConfig {
        name: "Test Slide".to_string(),
        kind: FacilityKind::Slide,
        capacity,
        min_age: 0.0,
        max_youngest: None,
        adrenaline: 3,
        admission: Admission::Servers,
        duration: vec![Distribution::constant(minutes)],
    }
}

/// Reception with one clerk and a one-minute constant service.
pub fn quick_reception() -> FacilityConfig {
    FacilityConfig {
        name: "Reception".to_string(),
        kind: FacilityKind::Reception,
        capacity: 1,
        min_age: 0.0,
        max_youngest: None,
        adrenaline: 1,
        admission: Admission::Servers,
        duration: vec![Distribution::constant(1.0)],
    }
}

/// Arrivals every `every_minutes` from opening until `end_ms`.
pub fn stream(kind: VisitorKind, every_minutes: f64, end_ms: u64) -> ArrivalStream {
    ArrivalStream {
        kind,
        start_ms: 0,
        end_ms,
        inter_arrival: Distribution::constant(every_minutes),
    }
}

pub fn single_stream(every_minutes: f64, end_ms: u64) -> ArrivalStream {
    stream(VisitorKind::Single, every_minutes, end_ms)
}

/// A park with one attraction, a quick reception, no restaurants and no
/// arrivals. Nobody buys an express pass on entry.
pub fn solo_park(attraction: FacilityConfig) -> ParkConfig {
    let mut config = ParkConfig::default()
        .with_arrivals(Vec::new())
        .with_attractions(vec![attraction])
        .with_restaurants(Vec::new());
    config.reception = quick_reception();
    config.behaviour.express_on_entry = 0.0;
    config.behaviour.lunch_probability = 0.0;
    config
}

/// A built and initialised world, ready for the runner.
pub fn create_test_world(config: &ParkConfig) -> SimResult<World> {
    let mut world = World::new();
    build_park(&mut world, config)?;
    initialize_simulation(&mut world);
    Ok(world)
}
