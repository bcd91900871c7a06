mod support;

use park_core::clock::minutes_to_ms;
use park_core::config::ParkConfig;
use park_core::ecs::VisitorKind;
use park_core::facility::{Admission, Facility, ServerState};
use park_core::scenario::ParkLayout;
use park_core::simulation::{run, run_with_trace};
use park_core::test_helpers::{single_attraction, solo_park, stream};
use support::schedule::ScheduleRunner;
use support::world::TestWorldBuilder;

#[test]
fn same_seed_replays_the_same_day() {
    let config = ParkConfig::default().with_seed(7);
    let (first, first_trace) = run_with_trace(&config).expect("first run");
    let (second, second_trace) = run_with_trace(&config).expect("second run");

    assert_eq!(first_trace.0, second_trace.0);
    assert_eq!(first, second);
    assert_eq!(first.events_processed as usize, first_trace.0.len());
}

#[test]
fn facilities_never_exceed_capacity_during_a_day() {
    let (mut world, config) =
        TestWorldBuilder::from_config(ParkConfig::default().with_seed(11)).build();
    let facilities: Vec<_> = {
        let layout = world.resource::<ParkLayout>();
        std::iter::once(layout.reception)
            .chain(layout.attractions.iter().copied())
            .chain(layout.restaurants.iter().map(|slot| slot.entity))
            .collect()
    };
    assert_eq!(
        facilities.len(),
        1 + config.attractions.len() + config.restaurants.len()
    );

    let mut worst = 0u32;
    let mut runner = ScheduleRunner::new();
    let steps = runner.run_full_with_hook(&mut world, |world, _event| {
        for entity in &facilities {
            let facility = world.get::<Facility>(*entity).expect("facility");
            let servers = world.get::<ServerState>(*entity).expect("servers");
            assert!(
                servers.busy <= facility.capacity,
                "{} holds {} of {}",
                facility.name,
                servers.busy,
                facility.capacity
            );
            assert_eq!(
                servers.in_service.is_empty(),
                servers.busy == 0,
                "{} occupancy out of sync",
                facility.name
            );
            worst = worst.max(servers.busy);
        }
    });

    assert!(steps > 0);
    assert!(worst > 0, "nobody was ever served");
}

#[test]
fn a_lone_express_single_waits_for_a_batch_that_never_fills() {
    let mut pipes = single_attraction(3, 2.0);
    pipes.admission = Admission::Batch { size: 3 };
    let mut config = solo_park(pipes).with_arrivals(vec![stream(
        VisitorKind::Single,
        5.0,
        minutes_to_ms(6.0),
    )]);
    config.behaviour.express_on_entry = 1.0;

    let summary = run(&config).expect("run");
    assert_eq!(summary.arrived_groups, 1);
    assert_eq!(summary.completed_groups, 0);
    assert_eq!(summary.unresolved_groups, 1);
    assert_eq!(summary.unresolved_people, 1);
    assert!(summary.revenue.express > 0.0);
    assert_eq!(summary.facility("Test Slide").map(|f| f.groups_served), Some(0));
    assert!(summary.rating_histogram.iter().all(|count| *count == 0));
}

#[test]
fn summary_serializes_to_json() {
    let config = solo_park(single_attraction(2, 5.0)).with_arrivals(vec![stream(
        VisitorKind::Single,
        15.0,
        minutes_to_ms(60.0),
    )]);
    let summary = run(&config).expect("run");
    let json = serde_json::to_value(&summary).expect("json");

    assert_eq!(json["seed"], 42);
    assert_eq!(json["completed_groups"], summary.completed_groups);
    let facilities = json["facilities"].as_array().expect("facility list");
    assert_eq!(facilities.len(), 2);
    assert_eq!(facilities[1]["name"], "Test Slide");
}
