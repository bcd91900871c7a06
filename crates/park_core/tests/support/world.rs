#![allow(dead_code)]

use bevy_ecs::prelude::World;
use park_core::config::{ArrivalStream, FacilityConfig, ParkConfig};
use park_core::ecs::VisitorKind;
use park_core::test_helpers::{create_test_world, single_attraction, solo_park, stream};

/// Helper that builds a small park world from a handful of knobs.
#[derive(Debug, Clone)]
pub struct TestWorldBuilder {
    config: ParkConfig,
}

impl Default for TestWorldBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorldBuilder {
    /// One five-minute attraction with two servers and no arrivals.
    pub fn new() -> Self {
        Self {
            config: solo_park(single_attraction(2, 5.0)),
        }
    }

    /// Starts from an arbitrary configuration, e.g. the full baseline park.
    pub fn from_config(config: ParkConfig) -> Self {
        Self { config }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_attraction(mut self, attraction: FacilityConfig) -> Self {
        self.config.attractions = vec![attraction];
        self
    }

    pub fn with_attractions(mut self, attractions: Vec<FacilityConfig>) -> Self {
        self.config.attractions = attractions;
        self
    }

    pub fn with_stream(mut self, stream: ArrivalStream) -> Self {
        self.config.arrivals.push(stream);
        self
    }

    /// One group of `kind` arriving `at_minute` minutes after opening.
    pub fn with_one_arrival(self, kind: VisitorKind, at_minute: f64) -> Self {
        let end_ms = park_core::clock::minutes_to_ms(at_minute) + 1;
        self.with_stream(stream(kind, at_minute, end_ms))
    }

    pub fn configure(mut self, f: impl FnOnce(&mut ParkConfig)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn config(&self) -> &ParkConfig {
        &self.config
    }

    pub fn build(self) -> (World, ParkConfig) {
        let world = create_test_world(&self.config).expect("valid test park");
        (world, self.config)
    }
}
