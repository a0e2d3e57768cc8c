use criterion::{Criterion, black_box, criterion_group, criterion_main};
use riffgen::config::{EvolutionConfig, Sampler};
use riffgen::population::{Population, ReproductionPlan};
use riffgen_prng::RiffRng;

fn bench_generation(c: &mut Criterion) {
    let config = EvolutionConfig::default();
    let mut rng = RiffRng::new(0xB0B);
    let population = Population::random(config.population_size, &mut rng);

    c.bench_function("score 500 riffs", |b| {
        b.iter(|| black_box(population.score().mean()))
    });

    let mut group = c.benchmark_group("next_generation");
    for sampler in [Sampler::Proportional, Sampler::LegacyMargin] {
        let plan = ReproductionPlan {
            batches: config.batches.split(config.population_size),
            mutation_percent: config.mutation_percent(0),
            sampler,
        };
        group.bench_function(format!("{sampler:?}"), |b| {
            b.iter(|| {
                let scored = population.score();
                black_box(scored.next_generation(&plan, &mut rng))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generation);
criterion_main!(benches);
