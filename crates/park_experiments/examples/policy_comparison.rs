//! Example: compare the operating policies over independent replications.
//!
//! Runs every policy with the same seeds, prints mean and standard deviation
//! of the headline metrics, and exports the per-day results to CSV and JSON.
//!
//! Run with: cargo run -p park_experiments --example policy_comparison [replications] [config.json]

use park_core::config::ParkConfig;
use park_experiments::{
    export_to_csv, export_to_json, init_tracing, load_config, run_replications, Policy,
    ReplicationSamples,
};

const BASE_SEED: u64 = 1_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let replications: usize = match args.next() {
        Some(arg) => arg.parse()?,
        None => 30,
    };
    let base = match args.next() {
        Some(path) => load_config(path)?,
        None => ParkConfig::default(),
    };

    println!("Running {replications} replications per policy...");
    for policy in Policy::ALL {
        let config = policy.apply(base.clone());
        let results = run_replications(&config, replications, BASE_SEED, None, true)?;
        let samples = ReplicationSamples::from_results(&results);

        println!("\n=== {} ===", policy.name());
        println!(
            "Average wait: {:.2} ± {:.2} min",
            samples.average_wait.mean(),
            samples.average_wait.std_dev()
        );
        println!(
            "Average rating: {:.2} ± {:.2}",
            samples.average_rating.mean(),
            samples.average_rating.std_dev()
        );
        println!(
            "Total revenue: {:.0} ± {:.0}",
            samples.total_revenue.mean(),
            samples.total_revenue.std_dev()
        );

        let csv_path = format!("{}_results.csv", policy.name());
        export_to_csv(&results, policy.name(), &csv_path)?;
        let json_path = format!("{}_results.json", policy.name());
        export_to_json(&results, &json_path)?;
        println!("Exported to {csv_path} and {json_path}");
    }

    println!("\nExperiment complete!");
    Ok(())
}
