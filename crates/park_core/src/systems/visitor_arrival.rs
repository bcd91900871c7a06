use bevy_ecs::prelude::{Commands, Res, ResMut};
use tracing::trace;

use crate::clock::{
    hour_of_day_ms, minutes_to_ms, CurrentEvent, EventKind, EventSubject, SimulationClock,
};
use crate::config::{ArrivalStream, ParkConfig};
use crate::distributions::{Distribution, ParkRng};
use crate::ecs::{FamilyMembers, Satisfaction, Visitor, VisitorKind, VisitorState};
use crate::metrics::ParkMetrics;
use crate::scenario::{ParkLayout, ParkStatus, VisitorIds};

fn draw_count(rng: &mut ParkRng, distribution: &Distribution) -> u32 {
    rng.sample(distribution).round().max(0.0) as u32
}

/// Spawns the arriving group, sends it to reception and books the stream's
/// next arrival.
#[allow(clippy::too_many_arguments)]
pub fn visitor_arrival_system(
    mut commands: Commands,
    event: Res<CurrentEvent>,
    config: Res<ParkConfig>,
    layout: Res<ParkLayout>,
    status: Res<ParkStatus>,
    mut clock: ResMut<SimulationClock>,
    mut rng: ResMut<ParkRng>,
    mut ids: ResMut<VisitorIds>,
    mut metrics: ResMut<ParkMetrics>,
) {
    if event.0.kind != EventKind::VisitorArrival {
        return;
    }
    let Some(EventSubject::Stream(index)) = event.0.subject else {
        return;
    };
    let Some(stream) = config.arrivals.get(index) else {
        return;
    };
    if status.closed {
        return;
    }

    let now = clock.now();
    let mut visitor = Visitor {
        id: ids.next_id(),
        kind: stream.kind,
        group_size: 1,
        arrival_time: now,
        youngest_age: 0.0,
        express_pass: false,
        departure_at: config.closing_ms,
        budget: None,
        lineage: None,
        has_eaten: false,
        attractions_done: 0,
        visited: Vec::new(),
        abandoned: Vec::new(),
    };

    let mut family = None;
    match stream.kind {
        VisitorKind::Family => {
            let kids = draw_count(&mut rng, &config.families.kids);
            let members = FamilyMembers {
                kids_ages: (0..kids)
                    .map(|_| rng.sample(&config.families.kid_age))
                    .collect(),
            };
            visitor.group_size = 2 + kids;
            visitor.youngest_age = members.youngest();
            visitor.departure_at = hour_of_day_ms(rng.sample(&config.families.departure_hour));
            family = Some(members);
        }
        VisitorKind::TeenGroup => {
            let teens = &config.teens;
            visitor.group_size = draw_count(&mut rng, &teens.size).max(1);
            visitor.youngest_age = teens.age;
            visitor.budget = teens
                .budget_per_person
                .as_ref()
                .map(|budget| rng.sample(budget) * f64::from(visitor.group_size));
        }
        VisitorKind::Single => {
            visitor.youngest_age = rng.sample(&config.singles.age);
        }
    }
    visitor.express_pass = rng.bernoulli(config.behaviour.express_on_entry);

    metrics.arrived_groups += 1;
    metrics.arrived_people += u64::from(visitor.group_size);
    trace!(
        visitor = visitor.id,
        kind = ?visitor.kind,
        size = visitor.group_size,
        express = visitor.express_pass,
        at = now,
        "visitor arrived"
    );

    let satisfaction = Satisfaction::new(
        config.behaviour.initial_rating,
        config.behaviour.rating_ceiling,
    );
    let mut spawned = commands.spawn((visitor, VisitorState::Arriving, satisfaction));
    if let Some(members) = family {
        spawned.insert(members);
    }
    let entity = spawned.id();

    clock.schedule_now(
        EventKind::FacilityArrival,
        Some(EventSubject::Visit {
            visitor: entity,
            facility: layout.reception,
        }),
    );
    schedule_next_arrival(&mut clock, &mut rng, stream, index);
}

fn schedule_next_arrival(
    clock: &mut SimulationClock,
    rng: &mut ParkRng,
    stream: &ArrivalStream,
    index: usize,
) {
    let next = clock.now() + minutes_to_ms(rng.sample(&stream.inter_arrival));
    if next < stream.end_ms {
        clock.schedule_in(
            next - clock.now(),
            EventKind::VisitorArrival,
            Some(EventSubject::Stream(index)),
        );
    }
}
