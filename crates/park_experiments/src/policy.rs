//! Operating policies compared against the baseline park.

use park_core::config::{ParkConfig, BIG_PIPES_SLIDE, WAVE_POOL};
use park_core::distributions::Distribution;
use park_core::facility::Admission;
use serde::{Deserialize, Serialize};

/// Wave pool capacity once the pool is enlarged.
pub const ENLARGED_WAVE_POOL: u32 = 120;
/// Riders per launch on the big pipes with the larger tubes.
pub const BIGGER_TUBE_SIZE: u32 = 10;
/// Initial rating of visitors who bought their tickets online.
pub const ONLINE_INITIAL_RATING: f64 = 11.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    Baseline,
    /// Tickets are bought online: reception only hands out wristbands,
    /// visitors start happier and the wave pool is enlarged.
    OnlineTickets,
    /// Ten-person tubes on the big pipes and an enlarged wave pool.
    BiggerTubes,
}

impl Policy {
    pub const ALL: [Policy; 3] = [Self::Baseline, Self::OnlineTickets, Self::BiggerTubes];

    pub fn name(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::OnlineTickets => "online_tickets",
            Self::BiggerTubes => "bigger_tubes",
        }
    }

    /// Returns `config` with this policy's changes applied. Facilities the
    /// config does not contain are left alone.
    pub fn apply(self, mut config: ParkConfig) -> ParkConfig {
        match self {
            Self::Baseline => {}
            Self::OnlineTickets => {
                let wristband = config
                    .reception
                    .duration
                    .last()
                    .cloned()
                    .unwrap_or_else(|| Distribution::exponential(0.5));
                config.reception.duration = vec![wristband];
                config.behaviour.initial_rating = ONLINE_INITIAL_RATING;
                enlarge_wave_pool(&mut config);
            }
            Self::BiggerTubes => {
                if let Some(pipes) = config.attraction_mut(BIG_PIPES_SLIDE) {
                    pipes.capacity = BIGGER_TUBE_SIZE;
                    pipes.admission = Admission::Batch {
                        size: BIGGER_TUBE_SIZE,
                    };
                }
                enlarge_wave_pool(&mut config);
            }
        }
        config
    }
}

fn enlarge_wave_pool(config: &mut ParkConfig) {
    if let Some(pool) = config.attraction_mut(WAVE_POOL) {
        pool.capacity = ENLARGED_WAVE_POOL;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_changes_nothing() {
        let config = ParkConfig::default();
        assert_eq!(Policy::Baseline.apply(config.clone()), config);
    }

    #[test]
    fn online_tickets_keep_only_the_wristband_stage() {
        let config = Policy::OnlineTickets.apply(ParkConfig::default());
        assert_eq!(
            config.reception.duration,
            vec![Distribution::exponential(0.5)]
        );
        assert_eq!(config.behaviour.initial_rating, 11.0);
        let pool = config
            .attractions
            .iter()
            .find(|a| a.name == WAVE_POOL)
            .expect("wave pool");
        assert_eq!(pool.capacity, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bigger_tubes_launch_ten_riders() {
        let config = Policy::BiggerTubes.apply(ParkConfig::default());
        let pipes = config
            .attractions
            .iter()
            .find(|a| a.name == BIG_PIPES_SLIDE)
            .expect("big pipes");
        assert_eq!(pipes.admission, Admission::Batch { size: 10 });
        assert_eq!(pipes.capacity, 10);
        assert!(config.validate().is_ok());
    }
}
