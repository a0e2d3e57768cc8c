// Riffgen CLI entry point.
//
// Evolves a population of guitar riffs and prints the best one as tab.
// The pipeline: load config → seed PRNG → run generations (printing the
// best and worst riff at each report) → final report → optional JSON export.
//
// Usage:
//   cargo run -p riffgen -- [--config run.json] [--population N]
//     [--generations N] [--report-every N] [--seed N] [--legacy-sampler]
//     [--json outcome.json]
//
// Log verbosity follows RUST_LOG (default info); `RUST_LOG=debug` shows
// per-generation progress.

use riffgen::config::{EvolutionConfig, Sampler};
use riffgen::evolution::{EvolutionObserver, EvolutionOutcome, GenerationReport, evolve};
use riffgen::render::{render_final_report, render_riff};
use riffgen_prng::RiffRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Prints the best and worst riff of each reported generation.
struct TabPrinter;

impl EvolutionObserver for TabPrinter {
    fn on_report(&mut self, report: &GenerationReport<'_>) {
        let summary = report.summary;
        println!(
            "=== Generation {} (mean {:.1}, best so far {}) ===",
            summary.generation, summary.mean_score, summary.best_so_far
        );
        println!("Best:");
        print!("{}", render_riff(report.best, summary.best_score));
        println!("Worst:");
        print!("{}", render_riff(report.worst, summary.worst_score));
        println!();
    }
}

/// Everything needed to reproduce and inspect a run.
#[derive(Serialize)]
struct RunRecord<'a> {
    seed: u64,
    config: &'a EvolutionConfig,
    outcome: &'a EvolutionOutcome,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut config = match parse_flag::<PathBuf>(&args, "--config") {
        Some(path) => EvolutionConfig::load(&path)?,
        None => EvolutionConfig::default(),
    };
    if let Some(n) = parse_flag(&args, "--population") {
        config.population_size = n;
    }
    if let Some(n) = parse_flag(&args, "--generations") {
        config.generations = n;
    }
    if let Some(n) = parse_flag(&args, "--report-every") {
        config.report_every = n;
    }
    if let Some(s) = parse_flag(&args, "--seed") {
        config.seed = Some(s);
    }
    if args.iter().any(|a| a == "--legacy-sampler") {
        config.sampler = Sampler::LegacyMargin;
    }
    let json_path: Option<PathBuf> = parse_flag(&args, "--json");

    let seed = config.seed.unwrap_or_else(clock_seed);

    println!("=== Riffgen ===");
    println!("Population: {}", config.population_size);
    println!("Generations: {}", config.generations);
    println!("Sampler: {:?}", config.sampler);
    println!("Seed: {}", seed);
    println!();

    let mut rng = RiffRng::new(seed);
    let outcome = evolve(&config, &mut rng, &mut TabPrinter)?;

    let best = &outcome.best;
    match best.generation() {
        Some(g) => println!("=== Best riff (generation {}) ===", g),
        None => println!("=== Best riff (initial seed riff) ==="),
    }
    print!("{}", render_final_report(best.riff(), best.score()));

    if let Some(path) = json_path {
        write_outcome(&path, &RunRecord { seed, config: &config, outcome: &outcome })?;
        println!();
        println!("Wrote run record to {}", path.display());
    }
    Ok(())
}

fn write_outcome(path: &Path, record: &RunRecord<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
