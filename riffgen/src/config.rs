// Run configuration for the evolutionary search.
//
// Every tunable the driver uses lives in `EvolutionConfig`: population size,
// generation count, reporting cadence, how the next generation is split
// between the three reproduction strategies, the mutation-chance schedule,
// which roulette-wheel sampler to use, and an optional fixed seed. Defaults
// reproduce the reference run (500 riffs, 101 generations, a report every
// 10th generation, 50/25/25 mutate/splice/shift, mutation chance starting
// at 200 per mille and dropping by 2 each generation).
//
// Configs load from JSON; missing fields take their defaults and unknown
// fields are rejected so typos fail loudly. `validate()` runs before any
// generation, since a bad config is the only fatal error in a run.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How parents are drawn from the scored population.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sampler {
    /// Inverse-CDF over exact nonnegative weights (score minus worst score).
    #[default]
    Proportional,
    /// The reference draw: the target is taken from `[0, total - 5]` and the
    /// walk result is clamped to the last index.
    LegacyMargin,
}

/// Relative share of the next generation produced by each strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchProportions {
    /// Copy a parent and mutate it.
    pub mutate: u32,
    /// Crossover of two parents.
    pub splice: u32,
    /// Copy a parent and rotate it.
    pub shift: u32,
}

impl Default for BatchProportions {
    fn default() -> Self {
        BatchProportions {
            mutate: 50,
            splice: 25,
            shift: 25,
        }
    }
}

impl BatchProportions {
    pub fn total(&self) -> u64 {
        self.mutate as u64 + self.splice as u64 + self.shift as u64
    }

    /// Batch sizes `[mutate, splice, shift]` summing to exactly `population`.
    /// The shift batch absorbs rounding.
    pub fn split(&self, population: usize) -> [usize; 3] {
        let total = self.total();
        if total == 0 {
            return [population, 0, 0];
        }
        let share = |part: u32| (population as u64 * part as u64 / total) as usize;
        let mutate = share(self.mutate);
        let splice = share(self.splice);
        [mutate, splice, population - mutate - splice]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvolutionConfig {
    /// Riffs per generation. Must be positive.
    pub population_size: usize,
    /// Number of generations to run; there is no early stop.
    pub generations: usize,
    /// Emit a population report every this many generations. Must be positive.
    pub report_every: usize,
    pub batches: BatchProportions,
    /// Per-mille chord mutation chance at generation 0.
    pub mutation_start: u32,
    /// Per-mille reduction of the mutation chance per generation.
    pub mutation_decay: u32,
    pub sampler: Sampler,
    /// Fixed PRNG seed. `None` derives one from the clock.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        EvolutionConfig {
            population_size: 500,
            generations: 101,
            report_every: 10,
            batches: BatchProportions::default(),
            mutation_start: 200,
            mutation_decay: 2,
            sampler: Sampler::Proportional,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read, parse, and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::Invalid("population_size must be positive".into()));
        }
        if self.report_every == 0 {
            return Err(ConfigError::Invalid("report_every must be positive".into()));
        }
        if self.batches.total() == 0 {
            return Err(ConfigError::Invalid(
                "at least one reproduction batch proportion must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Per-mille chord mutation chance for a generation, floored at zero.
    pub fn mutation_percent(&self, generation: usize) -> u32 {
        let decay = (self.mutation_decay as u64).saturating_mul(generation as u64);
        (self.mutation_start as u64).saturating_sub(decay) as u32
    }

    pub fn is_report_generation(&self, generation: usize) -> bool {
        generation % self.report_every == 0
    }
}
