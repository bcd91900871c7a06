//! Fatal simulation errors.
//!
//! Anything recoverable inside the model (a full queue, a blocked lane, a
//! tour blackout) is a state transition, never an error.

use bevy_ecs::prelude::Resource;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("event scheduled at {at} ms but the clock is already at {now} ms")]
    InvalidScheduling { at: u64, now: u64 },

    #[error("facility {facility} would hold {busy} units with capacity {capacity}")]
    CapacityViolation {
        facility: String,
        busy: u32,
        capacity: u32,
    },

    #[error("invalid park configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type SimResult<T> = Result<T, SimError>;

/// First fatal error raised by a system during the current step.
///
/// Systems cannot return errors to the schedule, so they park the fault here
/// and [crate::runner::run_next_event] aborts the run once the step finishes.
#[derive(Debug, Default, Resource)]
pub struct SimFault(Option<SimError>);

impl SimFault {
    pub fn raise(&mut self, error: SimError) {
        if self.0.is_none() {
            tracing::error!(%error, "simulation fault");
            self.0 = Some(error);
        }
    }

    pub fn take(&mut self) -> Option<SimError> {
        self.0.take()
    }

    pub fn is_raised(&self) -> bool {
        self.0.is_some()
    }
}
