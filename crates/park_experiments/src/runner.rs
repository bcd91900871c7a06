//! Parallel replication execution using rayon.
//!
//! Every replication is an independent [park_core::simulation::run] with its
//! own seed, so replications share nothing and can run on any thread.

use indicatif::{ProgressBar, ProgressStyle};
use park_core::config::{ConfigError, ParkConfig};
use park_core::error::SimError;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::metrics::ReplicationResult;

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("replication {index} (seed {seed}) failed: {source}")]
    Replication {
        index: usize,
        seed: u64,
        #[source]
        source: SimError,
    },
    #[error("failed to create thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("invalid progress template: {0}")]
    Progress(#[from] indicatif::style::TemplateError),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}

/// Runs one replication of `config` with `seed`.
pub fn run_single_replication(
    config: &ParkConfig,
    index: usize,
    seed: u64,
) -> Result<ReplicationResult, ExperimentError> {
    let config = config.clone().with_seed(seed);
    let summary = park_core::simulation::run(&config).map_err(|source| {
        ExperimentError::Replication {
            index,
            seed,
            source,
        }
    })?;
    debug!(index, seed, events = summary.events_processed, "replication done");
    Ok(ReplicationResult::new(index, summary))
}

/// Run `replications` independent days of `config` in parallel.
///
/// Replication `i` uses seed `base_seed + i`. Results come back in
/// replication order whatever the thread count.
///
/// # Arguments
///
/// * `config` - Park configuration shared by every replication
/// * `replications` - Number of days to simulate
/// * `base_seed` - Seed of the first replication
/// * `num_threads` - Optional number of threads to use. If None, uses rayon's default.
/// * `show_progress` - Whether to display a progress bar
pub fn run_replications(
    config: &ParkConfig,
    replications: usize,
    base_seed: u64,
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<ReplicationResult>, ExperimentError> {
    let pb = if show_progress && replications > 0 {
        let bar = ProgressBar::new(replications as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )?
                .progress_chars("#>-"),
        );
        Some(bar)
    } else {
        None
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    info!(
        replications,
        base_seed,
        threads = pool.current_num_threads(),
        "starting replications"
    );

    let pb_clone = pb.clone();
    let results = pool.install(|| {
        (0..replications)
            .into_par_iter()
            .map(|index| {
                let seed = base_seed.wrapping_add(index as u64);
                let result = run_single_replication(config, index, seed);
                if let Some(ref progress_bar) = pb_clone {
                    progress_bar.inc(1);
                }
                result
            })
            .collect::<Result<Vec<_>, _>>()
    });

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    results
}
