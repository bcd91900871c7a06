use bevy_ecs::prelude::{Commands, Entity};
use tracing::trace;

use crate::config::PriceList;
use crate::ecs::Visitor;
use crate::metrics::{DepartureRecord, FamilyLedger, ParkMetrics};

/// Takes the group out of the park. Photos are sold on the way out; a split
/// family buys them once, when its last sub-group leaves, on the family's
/// size-weighted rating.
#[allow(clippy::too_many_arguments)]
pub fn depart(
    commands: &mut Commands,
    entity: Entity,
    visitor: &Visitor,
    rating: f64,
    now: u64,
    prices: &PriceList,
    metrics: &mut ParkMetrics,
    ledger: &mut FamilyLedger,
) {
    metrics.departures.push(DepartureRecord {
        visitor_id: visitor.id,
        kind: visitor.kind,
        group_size: visitor.group_size,
        subgroup: visitor.is_subgroup(),
        at_ms: now,
        rating,
        attractions_done: visitor.attractions_done,
    });

    match visitor.lineage {
        Some(family_id) => {
            if let Some(family) = ledger.settle(family_id, visitor.group_size, rating) {
                metrics.revenue.photos += prices.photo_price(family.rating);
                metrics.record_completion(family.people, family.rating);
            }
        }
        None => {
            metrics.revenue.photos += prices.photo_price(rating);
            metrics.record_completion(visitor.group_size, rating);
        }
    }

    trace!(visitor = visitor.id, rating, at = now, "visitor departed");
    commands.entity(entity).despawn();
}
