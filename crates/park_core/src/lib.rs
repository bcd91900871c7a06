//! Discrete-event simulation kernel for visitor flow through a water park.
//!
//! Visitors and facilities are ECS entities; every state change is driven by
//! an event popped from [clock::SimulationClock] and routed to one system by
//! [runner::simulation_schedule]. [simulation::run] drives one replication
//! from a [config::ParkConfig] to a [metrics::RunSummary].

pub mod choice;
pub mod clock;
pub mod config;
pub mod distributions;
pub mod ecs;
pub mod error;
pub mod facility;
pub mod metrics;
pub mod profiling;
pub mod runner;
pub mod scenario;
pub mod simulation;
pub mod systems;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;
