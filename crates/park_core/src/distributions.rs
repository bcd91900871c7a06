//! Random variates for every stochastic timing and decision in the park.
//!
//! All samplers draw from a caller-supplied generator; the run-scoped
//! [ParkRng] is the only entropy source during a simulation, so a fixed seed
//! reproduces the whole event trace.

use std::f64::consts::TAU;

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Masses of a piecewise table must sum to one within this tolerance.
const MASS_TOLERANCE: f64 = 1e-9;

/// Rejection rounds after which a sampler logs a warning.
const SLOW_ACCEPTANCE_ROUNDS: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    #[error("rate must be positive and finite, got {0}")]
    NonPositiveRate(f64),

    #[error("lower bound {lo} exceeds upper bound {hi}")]
    InvertedBounds { lo: f64, hi: f64 },

    #[error("standard deviation must be non-negative, got {0}")]
    NegativeStdDev(f64),

    #[error("distribution table is empty")]
    EmptyTable,

    #[error("probability mass {0} is negative")]
    NegativeMass(f64),

    #[error("probability masses sum to {0}, expected 1")]
    MassSum(f64),

    #[error("density has no positive area over [{lo}, {hi}]")]
    DegenerateDensity { lo: f64, hi: f64 },

    #[error("density piece [{from}, {to}] lies outside the support [{lo}, {hi}]")]
    PieceOutOfSupport { from: f64, to: f64, lo: f64, hi: f64 },

    #[error("envelope bound {bound} is below the density maximum {max}")]
    BoundTooSmall { bound: f64, max: f64 },

    #[error("distribution parameter is not finite")]
    NonFinite,
}

/// Run-scoped generator, seeded once per replication.
#[derive(Debug, Resource)]
pub struct ParkRng(StdRng);

impl ParkRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut StdRng {
        &mut self.0
    }

    pub fn sample(&mut self, distribution: &Distribution) -> f64 {
        distribution.sample(&mut self.0)
    }

    pub fn bernoulli(&mut self, p: f64) -> bool {
        bernoulli(&mut self.0, p)
    }
}

/// One uniform draw on `[0, 1)`.
#[inline]
fn unit<R: Rng>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

pub fn sample_uniform<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + unit(rng) * (hi - lo)
}

pub fn sample_exponential<R: Rng>(rng: &mut R, rate: f64) -> f64 {
    -(1.0 - unit(rng)).ln() / rate
}

/// Box-Muller, cosine branch. `u1` lies in `(0, 1]` so `ln(u1)` is finite.
pub fn sample_standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1 = 1.0 - unit(rng);
    let u2 = unit(rng);
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

pub fn sample_normal<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    mean + std_dev * sample_standard_normal(rng)
}

pub fn bernoulli<R: Rng>(rng: &mut R, p: f64) -> bool {
    unit(rng) < p
}

/// Sum of one draw from each stage (e.g. ticket purchase then wristband).
pub fn sample_stages<R: Rng>(stages: &[Distribution], rng: &mut R) -> f64 {
    stages.iter().map(|stage| stage.sample(rng)).sum()
}

/// Density shape of a piecewise segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentShape {
    Flat,
    /// Density rises linearly from zero at `lo`.
    Rising,
    /// Density falls linearly to zero at `hi`.
    Falling,
}

/// One slice of a piecewise distribution. `lo == hi` is a point mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub mass: f64,
    pub lo: f64,
    pub hi: f64,
    pub shape: SegmentShape,
}

impl Segment {
    pub fn flat(mass: f64, lo: f64, hi: f64) -> Self {
        Self {
            mass,
            lo,
            hi,
            shape: SegmentShape::Flat,
        }
    }

    pub fn point(mass: f64, value: f64) -> Self {
        Self::flat(mass, value, value)
    }

    pub fn rising(mass: f64, lo: f64, hi: f64) -> Self {
        Self {
            mass,
            lo,
            hi,
            shape: SegmentShape::Rising,
        }
    }

    pub fn falling(mass: f64, lo: f64, hi: f64) -> Self {
        Self {
            mass,
            lo,
            hi,
            shape: SegmentShape::Falling,
        }
    }

    /// Inverse CDF of the segment's conditional distribution at `v` in `[0, 1]`.
    fn invert(&self, v: f64) -> f64 {
        let width = self.hi - self.lo;
        match self.shape {
            SegmentShape::Flat => self.lo + v * width,
            SegmentShape::Rising => self.lo + width * v.sqrt(),
            SegmentShape::Falling => self.hi - width * (1.0 - v).sqrt(),
        }
    }

    fn mean(&self) -> f64 {
        let width = self.hi - self.lo;
        match self.shape {
            SegmentShape::Flat => self.lo + width / 2.0,
            SegmentShape::Rising => self.lo + 2.0 * width / 3.0,
            SegmentShape::Falling => self.lo + width / 3.0,
        }
    }

    fn variance(&self) -> f64 {
        let width = self.hi - self.lo;
        match self.shape {
            SegmentShape::Flat => width * width / 12.0,
            SegmentShape::Rising | SegmentShape::Falling => width * width / 18.0,
        }
    }
}

/// Linear piece of a target density: `f` runs from `at_from` to `at_to`
/// across `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPiece {
    pub from: f64,
    pub to: f64,
    pub at_from: f64,
    pub at_to: f64,
}

impl DensityPiece {
    fn contains(&self, x: f64) -> bool {
        self.from <= x && x <= self.to
    }

    fn value(&self, x: f64) -> f64 {
        let width = self.to - self.from;
        if width <= 0.0 {
            return self.at_from;
        }
        self.at_from + (x - self.from) / width * (self.at_to - self.at_from)
    }

    fn area(&self) -> f64 {
        (self.to - self.from) * (self.at_from + self.at_to) / 2.0
    }
}

/// Configured distribution of one scalar, in the caller's unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Distribution {
    Constant {
        value: f64,
    },
    Uniform {
        lo: f64,
        hi: f64,
    },
    Exponential {
        rate: f64,
    },
    Normal {
        mean: f64,
        std_dev: f64,
    },
    Piecewise {
        segments: Vec<Segment>,
    },
    /// Proposes `x ~ U(lo, hi)` and accepts with probability `f(x) / bound`.
    /// `f` is zero wherever no piece covers `x`; the first covering piece wins.
    AcceptanceRejection {
        lo: f64,
        hi: f64,
        density: Vec<DensityPiece>,
        bound: f64,
    },
}

impl Distribution {
    pub fn constant(value: f64) -> Self {
        Self::Constant { value }
    }

    pub fn uniform(lo: f64, hi: f64) -> Self {
        Self::Uniform { lo, hi }
    }

    pub fn exponential(rate: f64) -> Self {
        Self::Exponential { rate }
    }

    pub fn normal(mean: f64, std_dev: f64) -> Self {
        Self::Normal { mean, std_dev }
    }

    pub fn piecewise(segments: Vec<Segment>) -> Self {
        Self::Piecewise { segments }
    }

    /// Discrete table of `(value, mass)` pairs.
    pub fn discrete(table: &[(f64, f64)]) -> Self {
        Self::Piecewise {
            segments: table
                .iter()
                .map(|&(value, mass)| Segment::point(mass, value))
                .collect(),
        }
    }

    /// Checks parameters once, before any run samples from this distribution.
    pub fn validate(&self) -> Result<(), DistributionError> {
        match self {
            Self::Constant { value } => finite(&[*value]),
            Self::Uniform { lo, hi } => {
                finite(&[*lo, *hi])?;
                ordered(*lo, *hi)
            }
            Self::Exponential { rate } => {
                if rate.is_finite() && *rate > 0.0 {
                    Ok(())
                } else {
                    Err(DistributionError::NonPositiveRate(*rate))
                }
            }
            Self::Normal { mean, std_dev } => {
                finite(&[*mean, *std_dev])?;
                if *std_dev < 0.0 {
                    return Err(DistributionError::NegativeStdDev(*std_dev));
                }
                Ok(())
            }
            Self::Piecewise { segments } => validate_segments(segments),
            Self::AcceptanceRejection {
                lo,
                hi,
                density,
                bound,
            } => validate_density(*lo, *hi, density, *bound),
        }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match self {
            Self::Constant { value } => *value,
            Self::Uniform { lo, hi } => sample_uniform(rng, *lo, *hi),
            Self::Exponential { rate } => sample_exponential(rng, *rate),
            Self::Normal { mean, std_dev } => sample_normal(rng, *mean, *std_dev),
            Self::Piecewise { segments } => sample_piecewise(rng, segments),
            Self::AcceptanceRejection {
                lo,
                hi,
                density,
                bound,
            } => sample_acceptance_rejection(rng, *lo, *hi, density, *bound),
        }
    }

    /// Theoretical mean, where it has a closed form.
    pub fn mean(&self) -> Option<f64> {
        match self {
            Self::Constant { value } => Some(*value),
            Self::Uniform { lo, hi } => Some((lo + hi) / 2.0),
            Self::Exponential { rate } => Some(1.0 / rate),
            Self::Normal { mean, .. } => Some(*mean),
            Self::Piecewise { segments } => {
                Some(segments.iter().map(|s| s.mass * s.mean()).sum())
            }
            Self::AcceptanceRejection { .. } => None,
        }
    }

    /// Theoretical variance, where it has a closed form.
    pub fn variance(&self) -> Option<f64> {
        match self {
            Self::Constant { .. } => Some(0.0),
            Self::Uniform { lo, hi } => Some((hi - lo).powi(2) / 12.0),
            Self::Exponential { rate } => Some(1.0 / (rate * rate)),
            Self::Normal { std_dev, .. } => Some(std_dev * std_dev),
            Self::Piecewise { segments } => {
                let mean: f64 = segments.iter().map(|s| s.mass * s.mean()).sum();
                let second: f64 = segments
                    .iter()
                    .map(|s| s.mass * (s.variance() + s.mean().powi(2)))
                    .sum();
                Some(second - mean * mean)
            }
            Self::AcceptanceRejection { .. } => None,
        }
    }
}

fn finite(values: &[f64]) -> Result<(), DistributionError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(DistributionError::NonFinite)
    }
}

fn ordered(lo: f64, hi: f64) -> Result<(), DistributionError> {
    if lo <= hi {
        Ok(())
    } else {
        Err(DistributionError::InvertedBounds { lo, hi })
    }
}

fn validate_segments(segments: &[Segment]) -> Result<(), DistributionError> {
    if segments.is_empty() {
        return Err(DistributionError::EmptyTable);
    }
    let mut total = 0.0;
    for segment in segments {
        finite(&[segment.mass, segment.lo, segment.hi])?;
        if segment.mass < 0.0 {
            return Err(DistributionError::NegativeMass(segment.mass));
        }
        ordered(segment.lo, segment.hi)?;
        total += segment.mass;
    }
    if (total - 1.0).abs() > MASS_TOLERANCE {
        return Err(DistributionError::MassSum(total));
    }
    Ok(())
}

fn validate_density(
    lo: f64,
    hi: f64,
    density: &[DensityPiece],
    bound: f64,
) -> Result<(), DistributionError> {
    finite(&[lo, hi, bound])?;
    ordered(lo, hi)?;
    if density.is_empty() {
        return Err(DistributionError::EmptyTable);
    }

    let mut max: f64 = 0.0;
    let mut area = 0.0;
    for piece in density {
        finite(&[piece.from, piece.to, piece.at_from, piece.at_to])?;
        ordered(piece.from, piece.to)?;
        if piece.from < lo || piece.to > hi {
            return Err(DistributionError::PieceOutOfSupport {
                from: piece.from,
                to: piece.to,
                lo,
                hi,
            });
        }
        if piece.at_from < 0.0 || piece.at_to < 0.0 {
            return Err(DistributionError::NegativeMass(piece.at_from.min(piece.at_to)));
        }
        // Linear pieces peak at an endpoint.
        max = max.max(piece.at_from).max(piece.at_to);
        area += piece.area();
    }

    if area <= 0.0 {
        return Err(DistributionError::DegenerateDensity { lo, hi });
    }
    if bound < max {
        return Err(DistributionError::BoundTooSmall { bound, max });
    }
    Ok(())
}

fn sample_piecewise<R: Rng>(rng: &mut R, segments: &[Segment]) -> f64 {
    let u = unit(rng);
    let mut cumulative = 0.0;
    let upper: Vec<f64> = segments
        .iter()
        .map(|segment| {
            cumulative += segment.mass.max(0.0);
            cumulative
        })
        .collect();
    // Zero-mass segments share their predecessor's bound and are never picked.
    let index = upper.partition_point(|bound| *bound <= u);
    match segments.get(index) {
        Some(segment) => {
            let lower = index.checked_sub(1).map_or(0.0, |prev| upper[prev]);
            let v = ((u - lower) / segment.mass).clamp(0.0, 1.0);
            segment.invert(v)
        }
        // Rounding left `u` just past the last boundary.
        None => segments
            .iter()
            .rev()
            .find(|segment| segment.mass > 0.0)
            .map(|segment| segment.invert(1.0))
            .unwrap_or(0.0),
    }
}

fn density_at(density: &[DensityPiece], x: f64) -> f64 {
    density
        .iter()
        .find(|piece| piece.contains(x))
        .map(|piece| piece.value(x))
        .unwrap_or(0.0)
}

fn sample_acceptance_rejection<R: Rng>(
    rng: &mut R,
    lo: f64,
    hi: f64,
    density: &[DensityPiece],
    bound: f64,
) -> f64 {
    let mut rounds = 0u32;
    loop {
        let x = sample_uniform(rng, lo, hi);
        let u = unit(rng);
        if u * bound <= density_at(density, x) {
            return x;
        }
        rounds += 1;
        if rounds == SLOW_ACCEPTANCE_ROUNDS {
            tracing::warn!(lo, hi, bound, rounds, "acceptance-rejection is accepting slowly");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAWS: usize = 50_000;

    fn moments(dist: &Distribution, seed: u64) -> (f64, f64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let samples: Vec<f64> = (0..DRAWS).map(|_| dist.sample(&mut rng)).collect();
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        (mean, var)
    }

    fn assert_mean_within_tolerance(dist: &Distribution, seed: u64) {
        let expected_mean = dist.mean().expect("closed-form mean");
        let expected_var = dist.variance().expect("closed-form variance");
        let (mean, var) = moments(dist, seed);
        let se = (expected_var / DRAWS as f64).sqrt();
        assert!(
            (mean - expected_mean).abs() <= 3.0 * se + 1e-12,
            "{dist:?}: mean {mean} vs {expected_mean} (se {se})"
        );
        if expected_var > 0.0 {
            assert!(
                (var / expected_var - 1.0).abs() < 0.05,
                "{dist:?}: variance {var} vs {expected_var}"
            );
        }
    }

    #[test]
    fn uniform_exponential_and_normal_match_their_moments() {
        assert_mean_within_tolerance(&Distribution::uniform(0.5, 2.0), 1);
        assert_mean_within_tolerance(&Distribution::exponential(0.5), 2);
        assert_mean_within_tolerance(&Distribution::exponential(2.10706), 3);
        assert_mean_within_tolerance(&Distribution::normal(4.8, 1.8322), 4);
        assert_mean_within_tolerance(&Distribution::normal(30.0, 10.0), 5);
    }

    #[test]
    fn piecewise_shapes_match_their_moments() {
        let trapezoid = Distribution::piecewise(vec![
            Segment::rising(1.0 / 6.0, 60.0, 75.0),
            Segment::flat(4.0 / 6.0, 75.0, 105.0),
            Segment::falling(1.0 / 6.0, 105.0, 120.0),
        ]);
        assert_mean_within_tolerance(&trapezoid, 6);

        let ramp = Distribution::piecewise(vec![Segment::rising(1.0, 16.0, 19.0)]);
        assert_mean_within_tolerance(&ramp, 7);

        let teens = Distribution::discrete(&[
            (2.0, 0.2),
            (3.0, 0.2),
            (4.0, 0.25),
            (5.0, 0.25),
            (6.0, 0.1),
        ]);
        assert_mean_within_tolerance(&teens, 8);
    }

    #[test]
    fn rising_ramp_inverts_to_square_root_curve() {
        let segment = Segment::rising(1.0, 16.0, 19.0);
        for u in [0.0, 0.1, 0.25, 0.81, 1.0] {
            let expected = 16.0 + 3.0 * f64::sqrt(u);
            assert!((segment.invert(u) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn piecewise_segment_frequencies_follow_masses() {
        let dist = Distribution::piecewise(vec![
            Segment::flat(0.3, 0.0, 1.0),
            Segment::flat(0.5, 1.0, 2.0),
            Segment::flat(0.2, 2.0, 3.0),
        ]);
        let mut rng = StdRng::seed_from_u64(11);
        let mut counts = [0usize; 3];
        let n = 100_000;
        for _ in 0..n {
            let x = dist.sample(&mut rng);
            let idx = (x.floor() as usize).min(2);
            counts[idx] += 1;
        }
        for (count, p) in counts.iter().zip([0.3, 0.5, 0.2]) {
            let freq = *count as f64 / n as f64;
            let se = (p * (1.0 - p) / n as f64).sqrt();
            assert!((freq - p).abs() <= 4.0 * se, "freq {freq} vs {p}");
        }
    }

    #[test]
    fn discrete_table_only_returns_listed_values() {
        let dist = Distribution::discrete(&[(1.0, 0.2), (2.0, 0.2), (3.0, 0.2), (4.0, 0.2), (5.0, 0.2)]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1_000 {
            let x = dist.sample(&mut rng);
            assert!([1.0, 2.0, 3.0, 4.0, 5.0].contains(&x));
        }
    }

    fn wave_pool() -> Distribution {
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

    #[test]
    fn acceptance_rejection_never_samples_the_empty_gap() {
        let dist = wave_pool();
        dist.validate().expect("valid wave pool density");
        let mut rng = StdRng::seed_from_u64(21);
        let samples: Vec<f64> = (0..20_000).map(|_| dist.sample(&mut rng)).collect();
        assert!(samples.iter().all(|x| (0.0..=60.0).contains(x)));
        assert!(samples.iter().all(|x| !(*x > 10.0 && *x < 30.0)));
        let central = samples.iter().filter(|x| (30.0..=50.0).contains(*x)).count();
        // The [30, 50] piece carries about 96% of the area.
        let share = central as f64 / samples.len() as f64;
        assert!(share > 0.93 && share < 0.98, "central share {share}");
    }

    /// Mean and variance of the normalised target density, by midpoint rule.
    fn density_moments(dist: &Distribution) -> (f64, f64) {
        let Distribution::AcceptanceRejection { lo, hi, density, .. } = dist else {
            unreachable!();
        };
        let steps = 600_000;
        let dx = (hi - lo) / steps as f64;
        let (mut area, mut first, mut second) = (0.0, 0.0, 0.0);
        for i in 0..steps {
            let x = lo + (i as f64 + 0.5) * dx;
            let f = density_at(density, x) * dx;
            area += f;
            first += x * f;
            second += x * x * f;
        }
        let mean = first / area;
        (mean, second / area - mean * mean)
    }

    #[test]
    fn acceptance_rejection_matches_the_density_mean() {
        let dist = wave_pool();
        let (expected_mean, expected_var) = density_moments(&dist);
        assert!(expected_mean > 30.0 && expected_mean < 50.0);
        let (mean, _) = moments(&dist, 22);
        let se = (expected_var / DRAWS as f64).sqrt();
        assert!(
            (mean - expected_mean).abs() <= 3.0 * se,
            "mean {mean} vs {expected_mean} (se {se})"
        );
    }

    #[test]
    fn acceptance_rejection_rejects_a_small_bound() {
        let Distribution::AcceptanceRejection { lo, hi, density, .. } = wave_pool() else {
            unreachable!();
        };
        let dist = Distribution::AcceptanceRejection {
            lo,
            hi,
            density,
            bound: 0.01,
        };
        assert!(matches!(
            dist.validate(),
            Err(DistributionError::BoundTooSmall { .. })
        ));
    }

    #[test]
    fn acceptance_rejection_rejects_zero_density() {
        let dist = Distribution::AcceptanceRejection {
            lo: 0.0,
            hi: 1.0,
            density: vec![DensityPiece {
                from: 0.0,
                to: 1.0,
                at_from: 0.0,
                at_to: 0.0,
            }],
            bound: 1.0,
        };
        assert_eq!(
            dist.validate(),
            Err(DistributionError::DegenerateDensity { lo: 0.0, hi: 1.0 })
        );
    }

    #[test]
    fn piecewise_masses_must_sum_to_one() {
        let dist = Distribution::piecewise(vec![
            Segment::flat(0.3, 0.0, 1.0),
            Segment::flat(0.5, 1.0, 2.0),
        ]);
        assert!(matches!(dist.validate(), Err(DistributionError::MassSum(_))));
        assert_eq!(
            Distribution::piecewise(vec![]).validate(),
            Err(DistributionError::EmptyTable)
        );
    }

    #[test]
    fn parameter_checks_reject_malformed_inputs() {
        assert_eq!(
            Distribution::exponential(0.0).validate(),
            Err(DistributionError::NonPositiveRate(0.0))
        );
        assert_eq!(
            Distribution::uniform(3.0, 1.0).validate(),
            Err(DistributionError::InvertedBounds { lo: 3.0, hi: 1.0 })
        );
        assert_eq!(
            Distribution::normal(1.0, -1.0).validate(),
            Err(DistributionError::NegativeStdDev(-1.0))
        );
        assert_eq!(
            Distribution::constant(f64::NAN).validate(),
            Err(DistributionError::NonFinite)
        );
    }

    #[test]
    fn same_seed_same_stream() {
        let dist = Distribution::normal(5.0, 1.5);
        let mut a = ParkRng::seeded(99);
        let mut b = ParkRng::seeded(99);
        for _ in 0..100 {
            assert_eq!(a.sample(&dist), b.sample(&dist));
        }
    }

    #[test]
    fn distributions_round_trip_through_json() {
        let dist = wave_pool();
        let json = serde_json::to_string(&dist).expect("serialize");
        assert!(json.contains("\"type\":\"acceptance_rejection\""));
        let back: Distribution = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, dist);
    }
}
