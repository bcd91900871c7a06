//! Per-replication results and the sample sequences built from them.

use park_core::metrics::RunSummary;
use serde::Serialize;

/// One finished replication.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicationResult {
    /// Position of this replication in the run.
    pub index: usize,
    pub seed: u64,
    /// Headline wait over reception, attractions and restaurants, in minutes.
    pub average_wait_minutes: f64,
    pub summary: RunSummary,
}

impl ReplicationResult {
    pub fn new(index: usize, summary: RunSummary) -> Self {
        Self {
            index,
            seed: summary.seed,
            average_wait_minutes: summary.average_wait_minutes(),
            summary,
        }
    }
}

/// A sequence of observations of one metric, one per replication.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Samples(pub Vec<f64>);

impl Samples {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.iter().sum::<f64>() / self.0.len() as f64
    }

    /// Sample standard deviation (n - 1 denominator); zero below two samples.
    pub fn std_dev(&self) -> f64 {
        if self.0.len() < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let squares: f64 = self.0.iter().map(|x| (x - mean).powi(2)).sum();
        (squares / (self.0.len() - 1) as f64).sqrt()
    }
}

/// Headline metrics of a set of replications, ready for statistical
/// comparison between policies.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplicationSamples {
    pub average_wait: Samples,
    pub average_rating: Samples,
    pub total_revenue: Samples,
}

impl ReplicationSamples {
    pub fn from_results(results: &[ReplicationResult]) -> Self {
        let mut samples = Self::default();
        for result in results {
            samples.average_wait.0.push(result.average_wait_minutes);
            samples.average_rating.0.push(result.summary.average_rating);
            samples.total_revenue.0.push(result.summary.total_revenue);
        }
        samples
    }

    pub fn len(&self) -> usize {
        self.average_wait.len()
    }

    pub fn is_empty(&self) -> bool {
        self.average_wait.is_empty()
    }
}
