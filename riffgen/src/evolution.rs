// The run driver: generation loop, best-so-far tracking, and reporting.
//
// A run seeds a random population, then for each generation:
//   score all riffs -> offer the best to the best-so-far record ->
//   report (every `report_every`-th generation) -> reproduce.
// There is no convergence test; the loop always runs the configured number
// of generations.
//
// The best-so-far record (`BestRiff`) is an owned copy taken by value, so
// later generations never alter it. It starts from one extra random riff,
// so a run with zero generations still has something to report.
//
// Reporting goes through the `EvolutionObserver` trait. The CLI observer
// prints tabs to stdout; tests use observers that just collect summaries.

use crate::config::EvolutionConfig;
use crate::error::ConfigError;
use crate::population::{Population, ReproductionPlan};
use crate::riff::Riff;
use riffgen_prng::RiffRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The highest-scoring riff seen so far in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRiff {
    riff: Riff,
    score: i32,
    /// Generation the riff was found in; `None` for the initial seed riff.
    generation: Option<usize>,
}

impl BestRiff {
    pub fn seeded(riff: Riff) -> Self {
        let score = riff.score();
        BestRiff {
            riff,
            score,
            generation: None,
        }
    }

    pub fn riff(&self) -> &Riff {
        &self.riff
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn generation(&self) -> Option<usize> {
        self.generation
    }

    /// Replace the record with a copy of `riff` if `score` beats it.
    pub fn offer(&mut self, riff: &Riff, score: i32, generation: usize) -> bool {
        if score > self.score {
            self.riff = riff.clone();
            self.score = score;
            self.generation = Some(generation);
            true
        } else {
            false
        }
    }
}

/// Score statistics for one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub population_size: usize,
    pub best_score: i32,
    pub worst_score: i32,
    pub mean_score: f64,
    /// Best-so-far score after this generation was offered.
    pub best_so_far: i32,
}

/// Periodic snapshot handed to the observer on report generations.
#[derive(Debug)]
pub struct GenerationReport<'a> {
    pub summary: &'a GenerationSummary,
    pub best: &'a Riff,
    pub worst: &'a Riff,
}

/// Receives progress from a run.
pub trait EvolutionObserver {
    /// Called on every `report_every`-th generation.
    fn on_report(&mut self, report: &GenerationReport<'_>);

    /// Called after every generation is scored.
    fn on_generation(&mut self, _summary: &GenerationSummary) {}
}

/// Observer that ignores everything.
pub struct SilentObserver;

impl EvolutionObserver for SilentObserver {
    fn on_report(&mut self, _report: &GenerationReport<'_>) {}
}

/// Result of a complete run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionOutcome {
    pub best: BestRiff,
    pub history: Vec<GenerationSummary>,
    /// Size of the population produced by the last reproduction step.
    pub final_population_size: usize,
}

/// Run the evolutionary search. Fails only on an invalid configuration,
/// before any generation runs.
pub fn evolve(
    config: &EvolutionConfig,
    rng: &mut RiffRng,
    observer: &mut impl EvolutionObserver,
) -> Result<EvolutionOutcome, ConfigError> {
    config.validate()?;
    info!(
        population = config.population_size,
        generations = config.generations,
        sampler = ?config.sampler,
        "starting evolution"
    );

    let mut population = Population::random(config.population_size, rng);
    let mut best = BestRiff::seeded(Riff::random(rng));
    let batches = config.batches.split(config.population_size);
    let mut history = Vec::with_capacity(config.generations);

    for generation in 0..config.generations {
        debug!("[ {generation} ]");
        let scored = population.score();
        let (best_idx, best_score) = scored.best().unwrap_or((0, best.score()));
        let (worst_idx, worst_score) = scored.worst().unwrap_or((0, best.score()));

        if best.offer(&scored.riffs()[best_idx], best_score, generation) {
            debug!(generation, score = best_score, "new best riff");
        }

        let summary = GenerationSummary {
            generation,
            population_size: population.len(),
            best_score,
            worst_score,
            mean_score: scored.mean(),
            best_so_far: best.score(),
        };
        observer.on_generation(&summary);

        if config.is_report_generation(generation) {
            info!(
                generation,
                best = best_score,
                worst = worst_score,
                mean = summary.mean_score,
                best_so_far = best.score(),
                "generation report"
            );
            observer.on_report(&GenerationReport {
                summary: &summary,
                best: &scored.riffs()[best_idx],
                worst: &scored.riffs()[worst_idx],
            });
        }

        let plan = ReproductionPlan {
            batches,
            mutation_percent: config.mutation_percent(generation),
            sampler: config.sampler,
        };
        let next = scored.next_generation(&plan, rng);
        history.push(summary);
        population = next;
    }

    info!(score = best.score(), generation = ?best.generation(), "evolution finished");
    Ok(EvolutionOutcome {
        best,
        history,
        final_population_size: population.len(),
    })
}
