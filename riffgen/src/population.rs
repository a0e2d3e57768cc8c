// Population scoring, roulette-wheel selection, and reproduction.
//
// One generation step has two phases separated by a hard barrier:
//
// 1. Scoring. Every riff is scored in parallel (rayon) into an immutable
//    `ScoredPopulation` snapshot. Selection weights are each riff's score
//    minus the population's worst score, so the worst riff has weight 0.
//    Weights need the whole score distribution, so nothing is sampled until
//    all scores are in.
//
// 2. Reproduction. The next generation is built from three disjoint batches
//    that all read the same snapshot:
//    - mutate: pick a parent, copy it, mutate every chord at the current
//      per-mille chance
//    - splice: pick two parents independently (with replacement) and cross
//      them over
//    - shift: pick a parent, copy it, rotate it
//    The batches run concurrently, each on its own PRNG forked from the run
//    PRNG in a fixed order, and are concatenated in that order. Output is
//    therefore identical for a given seed no matter how rayon schedules them.
//
// Parents are never modified; children are owned clones.

use crate::config::Sampler;
use crate::riff::Riff;
use rayon::prelude::*;
use riffgen_prng::RiffRng;

/// Margin the legacy sampler shaves off the top of its draw range.
const LEGACY_MARGIN: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    riffs: Vec<Riff>,
}

impl Population {
    /// `size` freshly randomized riffs.
    pub fn random(size: usize, rng: &mut RiffRng) -> Self {
        Population {
            riffs: (0..size).map(|_| Riff::random(rng)).collect(),
        }
    }

    pub fn from_riffs(riffs: Vec<Riff>) -> Self {
        Population { riffs }
    }

    pub fn riffs(&self) -> &[Riff] {
        &self.riffs
    }

    pub fn len(&self) -> usize {
        self.riffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.riffs.is_empty()
    }

    /// Score every riff in parallel and derive selection weights.
    pub fn score(&self) -> ScoredPopulation<'_> {
        let scores: Vec<i32> = self.riffs.par_iter().map(Riff::score).collect();
        let weights = SelectionWeights::from_scores(&scores);
        ScoredPopulation {
            riffs: &self.riffs,
            scores,
            weights,
        }
    }
}

/// Nonnegative selection weights: each score minus the worst score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionWeights {
    worst: i32,
    weights: Vec<u64>,
    total: u64,
}

impl SelectionWeights {
    pub fn from_scores(scores: &[i32]) -> Self {
        let worst = scores.iter().copied().min().unwrap_or(0);
        let weights: Vec<u64> = scores
            .iter()
            .map(|&s| (s as i64 - worst as i64) as u64)
            .collect();
        let total = weights.iter().sum();
        SelectionWeights { worst, weights, total }
    }

    pub fn worst(&self) -> i32 {
        self.worst
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    /// Draw one index. Panics on an empty population.
    pub fn pick(&self, sampler: Sampler, rng: &mut RiffRng) -> usize {
        assert!(!self.weights.is_empty(), "cannot pick from an empty population");
        match sampler {
            Sampler::Proportional => self.pick_proportional(rng),
            Sampler::LegacyMargin => {
                let top = self.total.saturating_sub(LEGACY_MARGIN);
                self.walk(rng.range_u64_inclusive(0, top))
            }
        }
    }

    /// Inverse CDF: the first index whose cumulative weight exceeds a uniform
    /// draw from `[0, total)`. A population of equal scores picks uniformly.
    fn pick_proportional(&self, rng: &mut RiffRng) -> usize {
        if self.total == 0 {
            return rng.range_usize(0, self.weights.len());
        }
        let target = rng.range_u64(0, self.total);
        let mut cumulative = 0u64;
        for (i, &w) in self.weights.iter().enumerate() {
            cumulative += w;
            if cumulative > target {
                return i;
            }
        }
        self.weights.len() - 1
    }

    /// Subtract weights from `draw` in order until it reaches zero or
    /// below; the index where that happens is picked. A zero draw never
    /// steps onto the list and wraps to the last index, and running off the
    /// end clamps there too.
    fn walk(&self, draw: u64) -> usize {
        if draw == 0 {
            return self.weights.len() - 1;
        }
        let mut remaining = draw as i128;
        for (i, &w) in self.weights.iter().enumerate() {
            remaining -= w as i128;
            if remaining <= 0 {
                return i;
            }
        }
        tracing::trace!(draw, total = self.total, "selection walk overran, clamping");
        self.weights.len() - 1
    }
}

/// Batch sizes and operator settings for one reproduction step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReproductionPlan {
    /// `[mutate, splice, shift]` child counts.
    pub batches: [usize; 3],
    /// Per-mille chord mutation chance for the mutate batch.
    pub mutation_percent: u32,
    pub sampler: Sampler,
}

impl ReproductionPlan {
    pub fn size(&self) -> usize {
        self.batches.iter().sum()
    }
}

/// A population together with its scores, frozen for one generation.
#[derive(Debug)]
pub struct ScoredPopulation<'a> {
    riffs: &'a [Riff],
    scores: Vec<i32>,
    weights: SelectionWeights,
}

impl<'a> ScoredPopulation<'a> {
    pub fn riffs(&self) -> &'a [Riff] {
        self.riffs
    }

    pub fn scores(&self) -> &[i32] {
        &self.scores
    }

    pub fn weights(&self) -> &SelectionWeights {
        &self.weights
    }

    /// Index and score of the first highest-scoring riff.
    pub fn best(&self) -> Option<(usize, i32)> {
        self.scores
            .iter()
            .copied()
            .enumerate()
            .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
    }

    /// Index and score of the first lowest-scoring riff.
    pub fn worst(&self) -> Option<(usize, i32)> {
        self.scores
            .iter()
            .copied()
            .enumerate()
            .reduce(|worst, cur| if cur.1 < worst.1 { cur } else { worst })
    }

    pub fn mean(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().map(|&s| s as f64).sum::<f64>() / self.scores.len() as f64
    }

    pub fn pick(&self, sampler: Sampler, rng: &mut RiffRng) -> &'a Riff {
        let riffs: &'a [Riff] = self.riffs;
        &riffs[self.weights.pick(sampler, rng)]
    }

    /// Build the next generation. The run PRNG is advanced by exactly three
    /// forks regardless of batch sizes.
    pub fn next_generation(&self, plan: &ReproductionPlan, rng: &mut RiffRng) -> Population {
        let [mutate_count, splice_count, shift_count] = plan.batches;
        let mutate_rng = rng.fork();
        let splice_rng = rng.fork();
        let shift_rng = rng.fork();

        let (mutated, (spliced, shifted)) = rayon::join(
            move || self.mutate_batch(mutate_count, plan, mutate_rng),
            move || {
                rayon::join(
                    move || self.splice_batch(splice_count, plan, splice_rng),
                    move || self.shift_batch(shift_count, plan, shift_rng),
                )
            },
        );

        let mut riffs = Vec::with_capacity(plan.size());
        riffs.extend(mutated);
        riffs.extend(spliced);
        riffs.extend(shifted);
        Population { riffs }
    }

    fn mutate_batch(&self, count: usize, plan: &ReproductionPlan, mut rng: RiffRng) -> Vec<Riff> {
        (0..count)
            .map(|_| {
                let mut child = self.pick(plan.sampler, &mut rng).clone();
                child.mutate(plan.mutation_percent, &mut rng);
                child
            })
            .collect()
    }

    fn splice_batch(&self, count: usize, plan: &ReproductionPlan, mut rng: RiffRng) -> Vec<Riff> {
        (0..count)
            .map(|_| {
                let first = self.pick(plan.sampler, &mut rng);
                let second = self.pick(plan.sampler, &mut rng);
                first.splice(second, &mut rng)
            })
            .collect()
    }

    fn shift_batch(&self, count: usize, plan: &ReproductionPlan, mut rng: RiffRng) -> Vec<Riff> {
        (0..count)
            .map(|_| {
                let mut child = self.pick(plan.sampler, &mut rng).clone();
                child.shift(&mut rng);
                child
            })
            .collect()
    }
}
