// End-to-end runs of the evolutionary search through the public API.

use riffgen::config::{BatchProportions, EvolutionConfig, Sampler};
use riffgen::evolution::{EvolutionObserver, GenerationReport, GenerationSummary, evolve};
use riffgen::population::{Population, ReproductionPlan};
use riffgen::render::render_final_report;
use riffgen_prng::RiffRng;

#[derive(Default)]
struct Collector {
    summaries: Vec<GenerationSummary>,
    reported: Vec<usize>,
}

impl EvolutionObserver for Collector {
    fn on_report(&mut self, report: &GenerationReport<'_>) {
        assert_eq!(report.best.score(), report.summary.best_score);
        assert_eq!(report.worst.score(), report.summary.worst_score);
        self.reported.push(report.summary.generation);
    }

    fn on_generation(&mut self, summary: &GenerationSummary) {
        self.summaries.push(summary.clone());
    }
}

fn run(config: &EvolutionConfig, seed: u64) -> (riffgen::evolution::EvolutionOutcome, Collector) {
    let mut rng = RiffRng::new(seed);
    let mut collector = Collector::default();
    let outcome = evolve(config, &mut rng, &mut collector).unwrap();
    (outcome, collector)
}

#[test]
fn short_seeded_run() {
    let config = EvolutionConfig {
        population_size: 10,
        generations: 3,
        ..Default::default()
    };
    let (outcome, collector) = run(&config, 42);

    assert_eq!(collector.summaries.len(), 3);
    assert!(collector.summaries.iter().all(|s| s.population_size == 10));
    assert_eq!(outcome.final_population_size, 10);
    assert_eq!(collector.reported, vec![0]);

    for pair in collector.summaries.windows(2) {
        assert!(pair[1].best_so_far >= pair[0].best_so_far);
    }
    for s in &collector.summaries {
        assert!(s.best_so_far >= s.best_score);
        assert!(s.best_score >= s.worst_score);
    }

    let (again, _) = run(&config, 42);
    assert_eq!(again, outcome);
}

#[test]
fn full_length_run_keeps_population_size() {
    for sampler in [Sampler::Proportional, Sampler::LegacyMargin] {
        let config = EvolutionConfig {
            population_size: 12,
            sampler,
            ..Default::default()
        };
        let (outcome, collector) = run(&config, 7);
        assert_eq!(collector.summaries.len(), 101);
        assert!(collector.summaries.iter().all(|s| s.population_size == 12));
        assert_eq!(outcome.final_population_size, 12);
        assert_eq!(collector.reported, (0..=100).step_by(10).collect::<Vec<_>>());
        assert_eq!(outcome.best.riff().score(), outcome.best.score());
    }
}

#[test]
fn uneven_batches_fill_population() {
    let config = EvolutionConfig {
        population_size: 7,
        generations: 5,
        batches: BatchProportions { mutate: 3, splice: 0, shift: 1 },
        ..Default::default()
    };
    let (outcome, collector) = run(&config, 99);
    assert!(collector.summaries.iter().all(|s| s.population_size == 7));
    assert_eq!(outcome.final_population_size, 7);
}

#[test]
fn reproduction_step_is_deterministic() {
    let mut rng = RiffRng::new(3);
    let population = Population::random(40, &mut rng);
    let plan = ReproductionPlan {
        batches: [20, 10, 10],
        mutation_percent: 200,
        sampler: Sampler::Proportional,
    };
    let scored = population.score();
    let a = scored.next_generation(&plan, &mut rng.clone());
    let b = scored.next_generation(&plan, &mut rng);
    assert_eq!(a, b);
    assert_eq!(a.len(), 40);
}

#[test]
fn outcome_exports_to_json() {
    let config = EvolutionConfig {
        population_size: 8,
        generations: 2,
        ..Default::default()
    };
    let (outcome, _) = run(&config, 11);
    let json = serde_json::to_string(&outcome).unwrap();
    let back: riffgen::evolution::EvolutionOutcome = serde_json::from_str(&json).unwrap();
    assert_eq!(back, outcome);

    let report = render_final_report(outcome.best.riff(), outcome.best.score());
    assert!(report.contains(&format!("score: {}", outcome.best.score())));
}
