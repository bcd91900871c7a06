use bevy_ecs::prelude::{Component, Entity};
use serde::{Deserialize, Serialize};

use crate::facility::FacilityId;

/// Age assumed for an adult when a group has no children with it.
pub const ADULT_AGE: f64 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VisitorKind {
    Single,
    Family,
    TeenGroup,
}

/// A visitor group: one single, a whole family, a family sub-group or a teen group.
#[derive(Debug, Clone, Component)]
pub struct Visitor {
    pub id: u64,
    pub kind: VisitorKind,
    pub group_size: u32,
    pub arrival_time: u64,
    /// Age of the youngest member, used for facility age limits.
    pub youngest_age: f64,
    pub express_pass: bool,
    pub departure_at: u64,
    /// Cash left for extras; `None` means the group never runs out.
    pub budget: Option<f64>,
    /// Id of the whole family this sub-group split from.
    pub lineage: Option<u64>,
    pub has_eaten: bool,
    pub attractions_done: u32,
    pub visited: Vec<FacilityId>,
    pub abandoned: Vec<FacilityId>,
}

impl Visitor {
    pub fn is_subgroup(&self) -> bool {
        self.lineage.is_some()
    }

    /// A whole family that has not split yet.
    pub fn is_whole_family(&self) -> bool {
        self.kind == VisitorKind::Family && self.lineage.is_none()
    }

    pub fn can_afford(&self, amount: f64) -> bool {
        self.budget.map_or(true, |budget| budget >= amount)
    }

    pub fn spend(&mut self, amount: f64) {
        if let Some(budget) = self.budget.as_mut() {
            *budget -= amount;
        }
    }

    pub fn has_tried(&self, facility: FacilityId) -> bool {
        self.visited.contains(&facility) || self.abandoned.contains(&facility)
    }
}

/// Lifecycle of a visitor group.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub enum VisitorState {
    Arriving,
    Queueing {
        facility: Entity,
        since: u64,
        abandon_at: Option<u64>,
    },
    /// In service since `since`, or eating after a restaurant service.
    Served { facility: Entity, since: u64 },
    Deciding,
    Departed,
}

/// Satisfaction rating, kept inside `[0, ceiling]`.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Satisfaction {
    pub rating: f64,
    pub ceiling: f64,
}

impl Satisfaction {
    pub fn new(rating: f64, ceiling: f64) -> Self {
        Self {
            rating: rating.clamp(0.0, ceiling),
            ceiling,
        }
    }

    pub fn adjust(&mut self, delta: f64) {
        self.rating = (self.rating + delta).clamp(0.0, self.ceiling);
    }
}

/// Children of a whole family; removed when the family splits.
#[derive(Debug, Clone, PartialEq, Component)]
pub struct FamilyMembers {
    pub kids_ages: Vec<f64>,
}

impl FamilyMembers {
    pub fn youngest(&self) -> f64 {
        self.kids_ages.iter().copied().fold(ADULT_AGE, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn satisfaction_stays_within_bounds() {
        let mut rating = Satisfaction::new(10.0, 12.0);
        rating.adjust(-0.8);
        assert!((rating.rating - 9.2).abs() < 1e-12);
        rating.adjust(5.0);
        assert_eq!(rating.rating, 12.0);
        rating.adjust(-100.0);
        assert_eq!(rating.rating, 0.0);
    }

    #[test]
    fn youngest_member_defaults_to_an_adult() {
        let family = FamilyMembers {
            kids_ages: vec![9.5, 4.2, 14.0],
        };
        assert_eq!(family.youngest(), 4.2);
        assert_eq!(FamilyMembers { kids_ages: vec![] }.youngest(), ADULT_AGE);
    }
}
