//! Independent replications of the water park simulation.
//!
//! Runs many seeded days in parallel, collects the headline metrics of each
//! day as sample sequences, and exports the per-day summaries.
//!
//! # Quick Start
//!
//! ```no_run
//! use park_experiments::{run_replications, Policy, ReplicationSamples};
//! use park_core::config::ParkConfig;
//!
//! let config = Policy::OnlineTickets.apply(ParkConfig::default());
//! let results = run_replications(&config, 20, 1_000, None, false).unwrap();
//! let samples = ReplicationSamples::from_results(&results);
//! println!("average wait: {:.2} min", samples.average_wait.mean());
//! ```
//!
//! # Architecture
//!
//! - [`policy`]: operating policies as adjustments of a [`park_core::config::ParkConfig`]
//! - [`runner`]: parallel replication execution using rayon
//! - [`metrics`]: per-replication rows and per-metric samples
//! - [`export`]: result export to CSV/JSON
//! - [`setup`]: config loading and tracing initialisation

pub mod export;
pub mod metrics;
pub mod policy;
pub mod runner;
pub mod setup;

pub use export::{export_to_csv, export_to_json};
pub use metrics::{ReplicationResult, ReplicationSamples, Samples};
pub use policy::Policy;
pub use runner::{run_replications, run_single_replication, ExperimentError};
pub use setup::{init_tracing, load_config};
