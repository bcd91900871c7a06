//! Run one baseline day at the park and print the summary.
//!
//! Run with: cargo run -p park_core --example park_day [seed]

use park_core::clock::ms_to_minutes;
use park_core::config::ParkConfig;
use park_core::simulation::run;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 42,
    };
    let config = ParkConfig::default().with_seed(seed);
    let summary = run(&config)?;

    println!("--- Park day (seed {}) ---", summary.seed);
    println!("Events processed: {}", summary.events_processed);
    println!(
        "Simulation time: {:.1} min after opening",
        ms_to_minutes(summary.final_clock_ms)
    );
    println!(
        "Groups: {} arrived, {} entered, {} completed, {} unresolved",
        summary.arrived_groups,
        summary.entered_groups,
        summary.completed_groups,
        summary.unresolved_groups
    );
    println!(
        "Family splits: {}  express upgrades after abandoning: {}",
        summary.family_splits, summary.express_upgrades
    );
    println!(
        "Rating: avg {:.2}  min {:.2}  max {:.2}",
        summary.average_rating, summary.min_rating, summary.max_rating
    );
    println!(
        "Revenue: {:.0} (tickets {:.0}, express {:.0}, food {:.0}, photos {:.0})",
        summary.total_revenue,
        summary.revenue.tickets,
        summary.revenue.express,
        summary.revenue.food,
        summary.revenue.photos
    );
    println!("Average wait: {:.2} min", summary.average_wait_minutes());

    println!("\n{:<20} {:>8} {:>10} {:>10} {:>10} {:>8}", "facility", "groups", "avg wait", "max wait", "avg queue", "quits");
    for f in &summary.facilities {
        println!(
            "{:<20} {:>8} {:>10.2} {:>10.2} {:>10.2} {:>8}",
            f.name,
            f.groups_served,
            f.average_wait_minutes,
            f.max_wait_minutes,
            f.average_queue_length,
            f.abandonments
        );
    }

    println!("\nRating histogram:");
    for (bin, count) in summary.rating_histogram.iter().enumerate() {
        println!("  {bin:>2}: {count}");
    }

    Ok(())
}
