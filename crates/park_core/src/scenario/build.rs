use bevy_ecs::prelude::{Entity, World};
use tracing::debug;

use crate::clock::SimulationClock;
use crate::config::{FacilityConfig, ParkConfig};
use crate::distributions::ParkRng;
use crate::error::{SimFault, SimResult};
use crate::facility::{FacilityId, ServerState, WaitingLine};
use crate::metrics::{FacilityStats, FamilyLedger, ParkMetrics};
use crate::profiling::EventMetrics;

use super::layout::{HorizonMs, ParkLayout, ParkStatus, RestaurantSlot, VisitorIds};

/// Spawns one facility entity with an empty line and idle servers.
pub fn spawn_facility(world: &mut World, config: &FacilityConfig, id: FacilityId) -> Entity {
    let facility = config.build(id);
    let servers = ServerState::for_admission(&facility.admission);
    world.spawn((facility, WaitingLine::default(), servers)).id()
}

/// Validates `config` and populates `world` with the park: reception gets
/// facility id 0, attractions follow in configuration order, then restaurants.
pub fn build_park(world: &mut World, config: &ParkConfig) -> SimResult<()> {
    config.validate()?;

    let mut stats = Vec::with_capacity(1 + config.attractions.len() + config.restaurants.len());
    let mut next_id = 0;
    let mut spawn = |world: &mut World, facility: &FacilityConfig| {
        let id = FacilityId(next_id);
        next_id += 1;
        stats.push(FacilityStats::new(facility.name.clone(), facility.kind));
        spawn_facility(world, facility, id)
    };

    let reception = spawn(world, &config.reception);
    let attractions = config
        .attractions
        .iter()
        .map(|attraction| spawn(world, attraction))
        .collect::<Vec<_>>();
    let restaurants = config
        .restaurants
        .iter()
        .map(|restaurant| RestaurantSlot {
            entity: spawn(world, &restaurant.facility()),
            weight: restaurant.weight,
            price: restaurant.price,
        })
        .collect::<Vec<_>>();

    debug!(
        attractions = attractions.len(),
        restaurants = restaurants.len(),
        seed = config.seed,
        "park built"
    );

    world.insert_resource(ParkLayout {
        reception,
        attractions,
        restaurants,
    });
    world.insert_resource(ParkMetrics::with_facilities(stats));
    world.insert_resource(SimulationClock::default());
    world.insert_resource(ParkRng::seeded(config.seed));
    world.insert_resource(FamilyLedger::default());
    world.insert_resource(ParkStatus::default());
    world.insert_resource(VisitorIds::default());
    world.insert_resource(SimFault::default());
    world.insert_resource(EventMetrics::default());
    world.insert_resource(HorizonMs(config.horizon_ms));
    world.insert_resource(config.clone());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::error::SimError;
    use crate::facility::{Facility, FacilityKind};

    #[test]
    fn facilities_get_ids_in_configuration_order() {
        let mut world = World::new();
        let config = ParkConfig::default();
        build_park(&mut world, &config).expect("build");

        let layout = world.resource::<ParkLayout>().clone();
        let reception = world.get::<Facility>(layout.reception).expect("reception");
        assert_eq!(reception.id, FacilityId(0));
        assert_eq!(reception.kind, FacilityKind::Reception);

        for (i, entity) in layout.attractions.iter().enumerate() {
            let facility = world.get::<Facility>(*entity).expect("attraction");
            assert_eq!(facility.id, FacilityId(i + 1));
            assert_eq!(facility.name, config.attractions[i].name);
        }
        let first_restaurant = world
            .get::<Facility>(layout.restaurants[0].entity)
            .expect("restaurant");
        assert_eq!(first_restaurant.id, FacilityId(1 + config.attractions.len()));

        let metrics = world.resource::<ParkMetrics>();
        assert_eq!(metrics.facilities.len(), 1 + 7 + 3);
        assert_eq!(metrics.facilities[5].name, config.attractions[4].name);
    }

    #[test]
    fn invalid_config_is_rejected_before_anything_is_spawned() {
        let mut world = World::new();
        let config = ParkConfig::default().with_attractions(vec![]);
        let err = build_park(&mut world, &config).expect_err("no attractions");
        assert_eq!(err, SimError::Config(ConfigError::NoAttractions));
        assert!(world.get_resource::<ParkLayout>().is_none());
        assert_eq!(world.entities().len(), 0);
    }
}
