use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the water park simulation workspace",
    long_about = "A unified CLI for running park days, policy replications, benchmarks,\n\
                  and CI checks in the water park simulation workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one baseline park day and print its summary
    Run {
        /// Seed of the day
        #[arg(long, env = "PARK_SEED", default_value_t = 42)]
        seed: u64,
    },
    /// Compare operating policies over independent replications
    Replicate {
        /// Replications per policy
        #[arg(long, default_value_t = 30)]
        replications: usize,
        /// Optional JSON park configuration replacing the baseline
        #[arg(long)]
        config: Option<String>,
    },
    /// Run Criterion benchmarks
    Bench,
    /// Compare benchmarks: stash changes, create baseline, restore, compare
    BenchCompare,
    /// Run CI checks (fmt, clippy, tests, examples, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Run load tests (ignored tests in park_core)
    LoadTest,
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Build and run the example programs
    Examples,
    /// Run benchmarks
    Bench,
    /// Run check + examples + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn git(args: &[&str]) -> ExitStatus {
    eprintln!("+ git {}", args.join(" "));
    Command::new("git")
        .args(args)
        .status()
        .expect("failed to execute git")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_git(args: &[&str]) {
    let status = git(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_park_day(seed: u64) {
    let seed = seed.to_string();
    run_cargo(&[
        "run",
        "-p",
        "park_core",
        "--example",
        "park_day",
        "--release",
        "--",
        &seed,
    ]);
}

fn run_policy_comparison(replications: usize, config: Option<&str>) {
    let replications = replications.to_string();
    let mut args = vec![
        "run",
        "-p",
        "park_experiments",
        "--example",
        "policy_comparison",
        "--release",
        "--",
        &replications,
    ];
    if let Some(path) = config {
        args.push(path);
    }
    run_cargo(&args);
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test park_core");
    run_cargo(&["test", "-p", "park_core"]);

    step("Test park_experiments");
    run_cargo(&["test", "-p", "park_experiments"]);
}

fn ci_examples() {
    step("Run park_day (baseline, seed 42)");
    run_park_day(42);

    step("Run policy_comparison (3 replications)");
    run_policy_comparison(3, None);
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&["bench", "--package", "park_core", "--bench", "performance"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { seed } => run_park_day(seed),
        Commands::Replicate {
            replications,
            config,
        } => run_policy_comparison(replications, config.as_deref()),
        Commands::Bench => {
            run_cargo(&["bench", "--package", "park_core", "--bench", "performance"]);
        }
        Commands::BenchCompare => {
            let baseline_dir = Path::new("target/criterion");
            if baseline_dir.exists() {
                step("Removing existing benchmark data");
                std::fs::remove_dir_all(baseline_dir).expect("failed to remove target/criterion");
            }

            step("Stashing current changes");
            run_git(&[
                "stash",
                "push",
                "-m",
                "Temporary stash for benchmark comparison",
            ]);

            step("Running benchmark to create baseline");
            run_cargo(&[
                "bench",
                "--package",
                "park_core",
                "--bench",
                "performance",
                "--",
                "--save-baseline",
                "main",
            ]);

            step("Reapplying changes");
            run_git(&["stash", "pop"]);

            step("Running benchmark comparing against baseline");
            run_cargo(&[
                "bench",
                "--package",
                "park_core",
                "--bench",
                "performance",
                "--",
                "--baseline",
                "main",
            ]);

            eprintln!("\nDone! Check the output above to see performance comparison.");
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Examples => ci_examples(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_examples();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::LoadTest => {
            run_cargo(&[
                "test",
                "-p",
                "park_core",
                "--test",
                "load_tests",
                "--",
                "--ignored",
            ]);
        }
    }
}
