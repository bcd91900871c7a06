//! Configuration loading and log setup for experiment binaries.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use park_core::config::ParkConfig;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{registry, EnvFilter};

use crate::runner::ExperimentError;

/// Reads a [ParkConfig] from a JSON file and validates it. Missing fields
/// take their baseline values.
pub fn load_config(path: impl AsRef<Path>) -> Result<ParkConfig, ExperimentError> {
    let reader = BufReader::new(File::open(path)?);
    let config: ParkConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `info`).
/// Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = registry()
        .with(filter)
        .with(layer().with_writer(std::io::stderr))
        .try_init();
}
