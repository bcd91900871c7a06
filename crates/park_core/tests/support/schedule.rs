#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use park_core::clock::Event;
use park_core::runner::{
    run_next_event, run_until_empty, run_until_empty_with_hook, simulation_schedule,
};

/// Helper that owns a reusable `Schedule` so tests can step or drain the event queue.
pub struct ScheduleRunner {
    schedule: Schedule,
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRunner {
    /// Create a runner with the park schedule.
    pub fn new() -> Self {
        Self {
            schedule: simulation_schedule(),
        }
    }

    /// Run a single event (returns `true` if an event was processed).
    pub fn run_one(&mut self, world: &mut World) -> bool {
        run_next_event(world, &mut self.schedule).expect("step")
    }

    /// Run multiple events up to `max_steps`, returning the number of steps executed.
    pub fn run_until_empty(&mut self, world: &mut World, max_steps: usize) -> usize {
        run_until_empty(world, &mut self.schedule, max_steps).expect("run")
    }

    /// Drive the simulation until the event queue is empty or the horizon is reached.
    pub fn run_full(&mut self, world: &mut World) -> usize {
        self.run_until_empty(world, usize::MAX)
    }

    /// Like [Self::run_full], calling `hook` after every event.
    pub fn run_full_with_hook<F>(&mut self, world: &mut World, hook: F) -> usize
    where
        F: FnMut(&World, &Event),
    {
        run_until_empty_with_hook(world, &mut self.schedule, usize::MAX, hook).expect("run")
    }
}
