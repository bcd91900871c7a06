//! Park setup: spawns facilities and inserts the resources a run needs.

mod build;
mod layout;

pub use build::{build_park, spawn_facility};
pub use layout::{HorizonMs, ParkLayout, ParkStatus, RestaurantSlot, VisitorIds};
