//! Park configuration: arrival streams, visitor behaviour, prices and facilities.
//!
//! `ParkConfig::default()` is the baseline park. Every duration distribution
//! is in minutes; every time of day is a simulation timestamp (see
//! [crate::clock::clock_ms]).

use std::collections::HashSet;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::{clock_ms, MS_PER_HOUR, MS_PER_MINUTE};
use crate::distributions::{DensityPiece, Distribution, DistributionError, Segment};
use crate::ecs::VisitorKind;
use crate::facility::{Admission, Facility, FacilityId, FacilityKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field}: {source}")]
    Distribution {
        field: String,
        source: DistributionError,
    },

    #[error("facility {0} has no service stages")]
    EmptyFacility(String),

    #[error("facility {0} has zero capacity")]
    ZeroCapacity(String),

    #[error("facility {name}: a load of {load} exceeds capacity {capacity}")]
    BatchExceedsCapacity {
        name: String,
        load: u32,
        capacity: u32,
    },

    #[error("horizon {horizon_ms} ms ends before closing time {closing_ms} ms")]
    HorizonBeforeClosing { closing_ms: u64, horizon_ms: u64 },

    #[error("{field} = {value} is not a probability")]
    Probability { field: String, value: f64 },

    #[error("facility name {0} is used more than once")]
    DuplicateFacility(String),

    #[error("the park has no attractions")]
    NoAttractions,

    #[error("lunch is enabled but no restaurant has a positive weight")]
    MissingRestaurant,

    #[error("{0}")]
    Invalid(String),
}

/// Poisson-style arrival stream for one visitor type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalStream {
    pub kind: VisitorKind,
    /// First arrival is one inter-arrival draw after this time.
    pub start_ms: u64,
    /// No arrivals at or after this time.
    pub end_ms: u64,
    pub inter_arrival: Distribution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyProfile {
    pub kids: Distribution,
    pub kid_age: Distribution,
    /// Hour of day (e.g. 17.5) at which the family wants to leave.
    pub departure_hour: Distribution,
    pub split_probability: f64,
    /// Chance a splitting family aims for three groups instead of two.
    pub three_way_split_probability: f64,
}

impl Default for FamilyProfile {
    fn default() -> Self {
        Self {
            kids: Distribution::discrete(&[
                (1.0, 0.2),
                (2.0, 0.2),
                (3.0, 0.2),
                (4.0, 0.2),
                (5.0, 0.2),
            ]),
            kid_age: Distribution::uniform(2.0, 18.0),
            departure_hour: Distribution::piecewise(vec![Segment::rising(1.0, 16.0, 19.0)]),
            split_probability: 0.6,
            three_way_split_probability: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeenProfile {
    pub size: Distribution,
    pub age: f64,
    /// Chance of buying an express pass after abandoning a queue.
    pub express_after_abandon: f64,
    /// Groups still waiting in the abandoned queue for a purchase to be worth it.
    pub express_min_queue: usize,
    /// Spending money per person; unlimited when absent.
    pub budget_per_person: Option<Distribution>,
}

impl Default for TeenProfile {
    fn default() -> Self {
        Self {
            size: Distribution::discrete(&[
                (2.0, 0.2),
                (3.0, 0.2),
                (4.0, 0.25),
                (5.0, 0.25),
                (6.0, 0.1),
            ]),
            age: 14.0,
            express_after_abandon: 0.6,
            express_min_queue: 0,
            budget_per_person: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleProfile {
    pub age: Distribution,
}

impl Default for SingleProfile {
    fn default() -> Self {
        Self {
            age: Distribution::uniform(18.0, 70.0),
        }
    }
}

/// Minutes a non-express group waits in an attraction queue before leaving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patience {
    pub family: Distribution,
    pub teen: Distribution,
    pub single: Distribution,
}

impl Patience {
    pub fn for_kind(&self, kind: VisitorKind) -> &Distribution {
        match kind {
            VisitorKind::Family => &self.family,
            VisitorKind::TeenGroup => &self.teen,
            VisitorKind::Single => &self.single,
        }
    }
}

impl Default for Patience {
    fn default() -> Self {
        Self {
            family: Distribution::constant(15.0),
            teen: Distribution::constant(20.0),
            single: Distribution::constant(30.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Behaviour {
    pub express_on_entry: f64,
    pub initial_rating: f64,
    pub rating_ceiling: f64,
    pub good_experience_probability: f64,
    pub bad_experience_penalty: f64,
    pub abandonment_penalty: f64,
    /// Applied when reception finds no attraction for a group.
    pub no_attraction_penalty: f64,
    /// Rating lost per minute waited beyond `wait_tolerance_minutes`.
    pub wait_penalty_per_minute: f64,
    pub wait_tolerance_minutes: f64,
    pub patience: Patience,
    pub lunch_start_ms: u64,
    pub lunch_end_ms: u64,
    pub lunch_probability: f64,
    pub meal_duration: Distribution,
    pub bad_meal_probability: f64,
    pub bad_meal_penalty: f64,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            express_on_entry: 0.25,
            initial_rating: 10.0,
            rating_ceiling: 20.0,
            good_experience_probability: 0.5,
            bad_experience_penalty: 0.1,
            abandonment_penalty: 0.8,
            no_attraction_penalty: 0.5,
            wait_penalty_per_minute: 0.0,
            wait_tolerance_minutes: 0.0,
            patience: Patience::default(),
            lunch_start_ms: clock_ms(13, 0),
            lunch_end_ms: clock_ms(15, 0),
            lunch_probability: 0.7,
            meal_duration: Distribution::uniform(15.0, 35.0),
            bad_meal_probability: 0.1,
            bad_meal_penalty: 0.8,
        }
    }
}

/// Photo package bought on the way out when the final rating reaches `min_rating`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhotoTier {
    pub min_rating: f64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceList {
    pub adult_ticket: f64,
    pub child_ticket: f64,
    pub express_per_person: f64,
    /// Sorted by `min_rating`, ascending.
    pub photo_tiers: Vec<PhotoTier>,
}

impl PriceList {
    pub fn photo_price(&self, rating: f64) -> f64 {
        self.photo_tiers
            .iter()
            .rev()
            .find(|tier| rating >= tier.min_rating)
            .map_or(0.0, |tier| tier.price)
    }

    /// Entry tickets for a group: families pay two adults plus children.
    pub fn tickets(&self, kind: VisitorKind, group_size: u32) -> f64 {
        match kind {
            VisitorKind::Family => {
                let kids = group_size.saturating_sub(2);
                2.0 * self.adult_ticket + f64::from(kids) * self.child_ticket
            }
            _ => f64::from(group_size) * self.adult_ticket,
        }
    }

    pub fn express(&self, group_size: u32) -> f64 {
        f64::from(group_size) * self.express_per_person
    }
}

impl Default for PriceList {
    fn default() -> Self {
        Self {
            adult_ticket: 150.0,
            child_ticket: 75.0,
            express_per_person: 50.0,
            photo_tiers: vec![
                PhotoTier {
                    min_rating: 6.0,
                    price: 20.0,
                },
                PhotoTier {
                    min_rating: 7.5,
                    price: 100.0,
                },
                PhotoTier {
                    min_rating: 8.5,
                    price: 120.0,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityConfig {
    pub name: String,
    pub kind: FacilityKind,
    pub capacity: u32,
    #[serde(default)]
    pub min_age: f64,
    #[serde(default)]
    pub max_youngest: Option<f64>,
    pub adrenaline: u8,
    pub admission: Admission,
    /// Service stages in minutes, summed.
    pub duration: Vec<Distribution>,
}

impl FacilityConfig {
    pub fn build(&self, id: FacilityId) -> Facility {
        Facility {
            id,
            name: self.name.clone(),
            kind: self.kind,
            capacity: self.capacity,
            min_age: self.min_age,
            max_youngest: self.max_youngest,
            adrenaline: self.adrenaline,
            admission: self.admission.clone(),
            duration: self.duration.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pricing", rename_all = "snake_case")]
pub enum MealPrice {
    PerPerson { price: f64 },
    /// One price for a lone diner, a flat tray price for any group.
    SingleOrTray { single: f64, tray: f64 },
}

impl MealPrice {
    pub fn bill(&self, group_size: u32) -> f64 {
        match *self {
            Self::PerPerson { price } => price * f64::from(group_size),
            Self::SingleOrTray { single, tray } => {
                if group_size <= 1 {
                    single
                } else {
                    tray
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantConfig {
    pub name: String,
    /// Relative chance of being picked for lunch.
    pub weight: f64,
    pub stations: u32,
    pub preparation: Distribution,
    pub service: Distribution,
    pub price: MealPrice,
}

impl RestaurantConfig {
    pub fn facility(&self) -> FacilityConfig {
        FacilityConfig {
            name: self.name.clone(),
            kind: FacilityKind::Restaurant,
            capacity: self.stations,
            min_age: 0.0,
            max_youngest: None,
            adrenaline: 1,
            admission: Admission::Servers,
            duration: vec![self.preparation.clone(), self.service.clone()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct ParkConfig {
    pub seed: u64,
    /// Arrivals stop and deciding visitors leave from here on.
    pub closing_ms: u64,
    /// No event after this time is processed.
    pub horizon_ms: u64,
    pub arrivals: Vec<ArrivalStream>,
    pub families: FamilyProfile,
    pub teens: TeenProfile,
    pub singles: SingleProfile,
    pub behaviour: Behaviour,
    pub prices: PriceList,
    pub reception: FacilityConfig,
    pub attractions: Vec<FacilityConfig>,
    pub restaurants: Vec<RestaurantConfig>,
}

impl Default for ParkConfig {
    fn default() -> Self {
        let closing_ms = clock_ms(19, 0);
        Self {
            seed: 42,
            closing_ms,
            horizon_ms: closing_ms + 2 * MS_PER_HOUR,
            arrivals: default_arrivals(),
            families: FamilyProfile::default(),
            teens: TeenProfile::default(),
            singles: SingleProfile::default(),
            behaviour: Behaviour::default(),
            prices: PriceList::default(),
            reception: default_reception(),
            attractions: default_attractions(),
            restaurants: default_restaurants(),
        }
    }
}

impl ParkConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_closing_ms(mut self, closing_ms: u64) -> Self {
        self.closing_ms = closing_ms;
        self
    }

    pub fn with_horizon_ms(mut self, horizon_ms: u64) -> Self {
        self.horizon_ms = horizon_ms;
        self
    }

    pub fn with_arrivals(mut self, arrivals: Vec<ArrivalStream>) -> Self {
        self.arrivals = arrivals;
        self
    }

    pub fn with_attractions(mut self, attractions: Vec<FacilityConfig>) -> Self {
        self.attractions = attractions;
        self
    }

    pub fn with_restaurants(mut self, restaurants: Vec<RestaurantConfig>) -> Self {
        self.restaurants = restaurants;
        self
    }

    pub fn attraction_mut(&mut self, name: &str) -> Option<&mut FacilityConfig> {
        self.attractions.iter_mut().find(|a| a.name == name)
    }

    /// Checks every distribution and structural rule. Called before any run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon_ms < self.closing_ms {
            return Err(ConfigError::HorizonBeforeClosing {
                closing_ms: self.closing_ms,
                horizon_ms: self.horizon_ms,
            });
        }

        for (i, stream) in self.arrivals.iter().enumerate() {
            check_distribution(&format!("arrivals[{i}].inter_arrival"), &stream.inter_arrival)?;
            if stream.start_ms > stream.end_ms {
                return Err(ConfigError::Invalid(format!(
                    "arrivals[{i}] starts after it ends"
                )));
            }
        }

        check_distribution("families.kids", &self.families.kids)?;
        check_distribution("families.kid_age", &self.families.kid_age)?;
        check_distribution("families.departure_hour", &self.families.departure_hour)?;
        check_probability("families.split_probability", self.families.split_probability)?;
        check_probability(
            "families.three_way_split_probability",
            self.families.three_way_split_probability,
        )?;
        check_distribution("teens.size", &self.teens.size)?;
        check_probability("teens.express_after_abandon", self.teens.express_after_abandon)?;
        if let Some(budget) = &self.teens.budget_per_person {
            check_distribution("teens.budget_per_person", budget)?;
        }
        check_distribution("singles.age", &self.singles.age)?;

        let b = &self.behaviour;
        check_probability("behaviour.express_on_entry", b.express_on_entry)?;
        check_probability(
            "behaviour.good_experience_probability",
            b.good_experience_probability,
        )?;
        check_probability("behaviour.lunch_probability", b.lunch_probability)?;
        check_probability("behaviour.bad_meal_probability", b.bad_meal_probability)?;
        check_distribution("behaviour.patience.family", &b.patience.family)?;
        check_distribution("behaviour.patience.teen", &b.patience.teen)?;
        check_distribution("behaviour.patience.single", &b.patience.single)?;
        check_distribution("behaviour.meal_duration", &b.meal_duration)?;
        if b.rating_ceiling.is_nan() || b.rating_ceiling <= 0.0 {
            return Err(ConfigError::Invalid(
                "behaviour.rating_ceiling must be positive".to_string(),
            ));
        }

        if self.reception.kind != FacilityKind::Reception {
            return Err(ConfigError::Invalid(format!(
                "reception {} must have kind reception",
                self.reception.name
            )));
        }
        validate_facility(&self.reception)?;

        if self.attractions.is_empty() {
            return Err(ConfigError::NoAttractions);
        }
        for attraction in &self.attractions {
            if !attraction.kind.is_attraction() {
                return Err(ConfigError::Invalid(format!(
                    "{} is listed as an attraction but has kind {:?}",
                    attraction.name, attraction.kind
                )));
            }
            validate_facility(attraction)?;
        }

        for restaurant in &self.restaurants {
            if restaurant.weight.is_nan() || restaurant.weight < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "restaurant {} has a negative weight",
                    restaurant.name
                )));
            }
            validate_facility(&restaurant.facility())?;
        }
        let total_weight: f64 = self.restaurants.iter().map(|r| r.weight).sum();
        if b.lunch_probability > 0.0 && total_weight <= 0.0 {
            return Err(ConfigError::MissingRestaurant);
        }

        let mut names = HashSet::new();
        let all_names = std::iter::once(&self.reception.name)
            .chain(self.attractions.iter().map(|a| &a.name))
            .chain(self.restaurants.iter().map(|r| &r.name));
        for name in all_names {
            if !names.insert(name.as_str()) {
                return Err(ConfigError::DuplicateFacility(name.clone()));
            }
        }

        Ok(())
    }
}

fn check_distribution(field: &str, distribution: &Distribution) -> Result<(), ConfigError> {
    distribution
        .validate()
        .map_err(|source| ConfigError::Distribution {
            field: field.to_string(),
            source,
        })
}

fn check_probability(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability {
            field: field.to_string(),
            value,
        })
    }
}

fn validate_facility(facility: &FacilityConfig) -> Result<(), ConfigError> {
    let name = &facility.name;
    if facility.capacity == 0 {
        return Err(ConfigError::ZeroCapacity(name.clone()));
    }
    if facility.duration.is_empty() {
        return Err(ConfigError::EmptyFacility(name.clone()));
    }
    for (i, stage) in facility.duration.iter().enumerate() {
        check_distribution(&format!("{name}.duration[{i}]"), stage)?;
    }

    match &facility.admission {
        Admission::Servers => {}
        Admission::Headcount { per_unit } => {
            if *per_unit == 0 {
                return Err(ConfigError::Invalid(format!("{name}: per_unit must be positive")));
            }
        }
        Admission::Batch { size } => {
            if *size == 0 {
                return Err(ConfigError::Invalid(format!("{name}: batch size must be positive")));
            }
            if *size > facility.capacity {
                return Err(ConfigError::BatchExceedsCapacity {
                    name: name.clone(),
                    load: *size,
                    capacity: facility.capacity,
                });
            }
        }
        Admission::Lanes { lanes, .. } => {
            if *lanes == 0 {
                return Err(ConfigError::Invalid(format!("{name}: needs at least one lane")));
            }
        }
        Admission::Tour {
            instructors,
            tour_size,
            ..
        } => {
            if *instructors == 0 || *tour_size == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{name}: tours need instructors and a positive tour size"
                )));
            }
            if *tour_size > facility.capacity {
                return Err(ConfigError::BatchExceedsCapacity {
                    name: name.clone(),
                    load: *tour_size,
                    capacity: facility.capacity,
                });
            }
        }
    }
    Ok(())
}

fn default_arrivals() -> Vec<ArrivalStream> {
    vec![
        ArrivalStream {
            kind: VisitorKind::Family,
            start_ms: clock_ms(9, 0),
            end_ms: clock_ms(12, 0),
            inter_arrival: Distribution::exponential(40.0 / 60.0),
        },
        ArrivalStream {
            kind: VisitorKind::TeenGroup,
            start_ms: clock_ms(10, 0),
            end_ms: clock_ms(16, 0),
            inter_arrival: Distribution::exponential(500.0 / 360.0),
        },
        ArrivalStream {
            kind: VisitorKind::Single,
            start_ms: clock_ms(9, 0),
            end_ms: clock_ms(18, 30),
            inter_arrival: Distribution::exponential(40.0 / 60.0),
        },
    ]
}

fn default_reception() -> FacilityConfig {
    FacilityConfig {
        name: "Reception".to_string(),
        kind: FacilityKind::Reception,
        capacity: 3,
        min_age: 0.0,
        max_youngest: None,
        adrenaline: 1,
        admission: Admission::Servers,
        duration: vec![
            Distribution::uniform(0.5, 2.0),
            Distribution::exponential(0.5),
        ],
    }
}

pub const LAZY_RIVER: &str = "Lazy River";
pub const SINGLE_SLIDE: &str = "Single Slide";
pub const BIG_PIPES_SLIDE: &str = "Big Pipes Slide";
pub const SMALL_PIPES_SLIDE: &str = "Small Pipes Slide";
pub const WAVE_POOL: &str = "Wave Pool";
pub const KIDS_POOL: &str = "Kids Pool";
pub const SNORKEL_TOUR: &str = "Snorkel Tour";

/// Wave pool session length in minutes: nothing between 10 and 30 minutes,
/// most of the mass between 30 and 50.
pub fn wave_pool_duration() -> Distribution {
    Distribution::AcceptanceRejection {
        lo: 0.0,
        hi: 60.0,
        density: vec![
            DensityPiece {
                from: 0.0,
                to: 10.0,
                at_from: 0.0,
                at_to: 10.0 / 2700.0,
            },
            DensityPiece {
                from: 30.0,
                to: 50.0,
                at_from: 2.0 / 45.0,
                at_to: 1.0 / 27.0,
            },
            DensityPiece {
                from: 50.0,
                to: 60.0,
                at_from: 1.0 / 270.0,
                at_to: 0.0,
            },
        ],
        bound: 2.0 / 45.0,
    }
}

/// Kids pool stay in minutes: a trapezoid between one and two hours.
pub fn kids_pool_duration() -> Distribution {
    Distribution::piecewise(vec![
        Segment::rising(1.0 / 6.0, 60.0, 75.0),
        Segment::flat(4.0 / 6.0, 75.0, 105.0),
        Segment::falling(1.0 / 6.0, 105.0, 120.0),
    ])
}

pub fn default_attractions() -> Vec<FacilityConfig> {
    vec![
        FacilityConfig {
            name: LAZY_RIVER.to_string(),
            kind: FacilityKind::River,
            capacity: 60,
            min_age: 0.0,
            max_youngest: None,
            adrenaline: 1,
            admission: Admission::Headcount { per_unit: 2 },
            duration: vec![Distribution::uniform(20.0, 30.0)],
        },
        FacilityConfig {
            name: SINGLE_SLIDE.to_string(),
            kind: FacilityKind::Slide,
            capacity: 6,
            min_age: 14.0,
            max_youngest: None,
            adrenaline: 5,
            admission: Admission::Lanes {
                lanes: 2,
                spacing_ms: MS_PER_MINUTE / 2,
            },
            duration: vec![Distribution::constant(3.0)],
        },
        FacilityConfig {
            name: BIG_PIPES_SLIDE.to_string(),
            kind: FacilityKind::Slide,
            capacity: 8,
            min_age: 0.0,
            max_youngest: None,
            adrenaline: 2,
            admission: Admission::Batch { size: 8 },
            duration: vec![Distribution::normal(4.8, 1.8322)],
        },
        FacilityConfig {
            name: SMALL_PIPES_SLIDE.to_string(),
            kind: FacilityKind::Slide,
            capacity: 3,
            min_age: 12.0,
            max_youngest: None,
            adrenaline: 4,
            admission: Admission::Batch { size: 3 },
            duration: vec![Distribution::exponential(2.10706)],
        },
        FacilityConfig {
            name: WAVE_POOL.to_string(),
            kind: FacilityKind::Pool,
            capacity: 80,
            min_age: 12.0,
            max_youngest: None,
            adrenaline: 3,
            admission: Admission::Headcount { per_unit: 1 },
            duration: vec![wave_pool_duration()],
        },
        FacilityConfig {
            name: KIDS_POOL.to_string(),
            kind: FacilityKind::Pool,
            capacity: 30,
            min_age: 0.0,
            max_youngest: Some(4.0),
            adrenaline: 1,
            admission: Admission::Headcount { per_unit: 1 },
            duration: vec![kids_pool_duration()],
        },
        FacilityConfig {
            name: SNORKEL_TOUR.to_string(),
            kind: FacilityKind::Tour,
            capacity: 60,
            min_age: 6.0,
            max_youngest: None,
            adrenaline: 3,
            admission: Admission::Tour {
                instructors: 2,
                tour_size: 30,
                break_ms: 30 * MS_PER_MINUTE,
                lunch_start_ms: clock_ms(13, 0),
                lunch_end_ms: clock_ms(14, 0),
                blackout_start_ms: clock_ms(12, 20),
                blackout_end_ms: clock_ms(14, 0),
            },
            duration: vec![Distribution::normal(30.0, 10.0)],
        },
    ]
}

pub fn default_restaurants() -> Vec<RestaurantConfig> {
    let service = Distribution::normal(5.0, 1.5);
    vec![
        RestaurantConfig {
            name: "Burger".to_string(),
            weight: 3.0 / 8.0,
            stations: 1,
            preparation: Distribution::uniform(3.0, 4.0),
            service: service.clone(),
            price: MealPrice::PerPerson { price: 100.0 },
        },
        RestaurantConfig {
            name: "Pizza".to_string(),
            weight: 1.0 / 4.0,
            stations: 1,
            preparation: Distribution::uniform(4.0, 6.0),
            service: service.clone(),
            price: MealPrice::SingleOrTray {
                single: 40.0,
                tray: 100.0,
            },
        },
        RestaurantConfig {
            name: "Salad".to_string(),
            weight: 3.0 / 8.0,
            stations: 1,
            preparation: Distribution::uniform(3.0, 7.0),
            service,
            price: MealPrice::PerPerson { price: 65.0 },
        },
    ]
}
