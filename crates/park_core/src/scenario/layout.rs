use bevy_ecs::prelude::{Entity, Resource};

use crate::config::MealPrice;

/// Last timestamp the runner processes; later events stay in the clock.
#[derive(Debug, Clone, Copy, Resource)]
pub struct HorizonMs(pub u64);

/// Set once `ParkClosing` fires.
#[derive(Debug, Clone, Copy, Default, Resource)]
pub struct ParkStatus {
    pub closed: bool,
}

/// Hands out visitor ids in arrival order, sub-groups included.
#[derive(Debug, Clone, Copy, Default, Resource)]
pub struct VisitorIds {
    next: u64,
}

impl VisitorIds {
    pub fn next_id(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestaurantSlot {
    pub entity: Entity,
    pub weight: f64,
    pub price: MealPrice,
}

/// Facility entities by role, in facility-id order.
#[derive(Debug, Clone, Resource)]
pub struct ParkLayout {
    pub reception: Entity,
    pub attractions: Vec<Entity>,
    pub restaurants: Vec<RestaurantSlot>,
}

impl ParkLayout {
    pub fn restaurant_weights(&self) -> Vec<f64> {
        self.restaurants.iter().map(|r| r.weight).collect()
    }

    pub fn restaurant(&self, entity: Entity) -> Option<&RestaurantSlot> {
        self.restaurants.iter().find(|r| r.entity == entity)
    }
}
