// Seedable pseudo-random source for riff evolution.
//
// xoshiro256++ (Blackman & Vigna, 2019) expanded from a single `u64` seed
// with SplitMix64. Every random decision in `riffgen` (chord sampling,
// mutation rolls, crossover points, roulette-wheel picks) is drawn from a
// `RiffRng` passed explicitly by `&mut`, so a run is fully reproducible
// from its seed.
//
// Parallel reproduction batches each get their own stream via `fork()`,
// which draws a child seed from the parent. Forking in a fixed order keeps
// the whole generation deterministic regardless of how rayon schedules the
// batches.
//
// All sampling is integer-only; no floating point touches the generator.

use serde::{Deserialize, Serialize};

/// The workspace's only source of randomness.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiffRng {
    s: [u64; 4],
}

impl RiffRng {
    /// Seed a new generator. Equal seeds give equal streams.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Derive an independent child generator, advancing this one by one step.
    pub fn fork(&mut self) -> Self {
        RiffRng::new(self.next_u64())
    }

    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Uniform integer in `[low, high)`, rejection-sampled to avoid modulo bias.
    ///
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let span = high - low;
        if span.is_power_of_two() {
            return low + (self.next_u64() & (span - 1));
        }
        let threshold = span.wrapping_neg() % span;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % span);
            }
        }
    }

    /// Uniform integer in `[low, high]`.
    ///
    /// Panics if `low > high`.
    pub fn range_u64_inclusive(&mut self, low: u64, high: u64) -> u64 {
        assert!(low <= high, "range_u64_inclusive: low must be <= high");
        if high == u64::MAX {
            if low == 0 {
                return self.next_u64();
            }
            return self.range_u64(low - 1, high) + 1;
        }
        self.range_u64(low, high + 1)
    }

    /// Uniform `usize` in `[low, high)`. Panics if `low >= high`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Uniform `usize` in `[low, high]`. Panics if `low > high`.
    pub fn range_usize_inclusive(&mut self, low: usize, high: usize) -> usize {
        self.range_u64_inclusive(low as u64, high as u64) as usize
    }

    /// Uniform signed integer in `[low, high]`. Panics if `low > high`.
    pub fn range_i64_inclusive(&mut self, low: i64, high: i64) -> i64 {
        assert!(low <= high, "range_i64_inclusive: low must be <= high");
        let span = high.abs_diff(low);
        low.wrapping_add(self.range_u64_inclusive(0, span) as i64)
    }
}

/// SplitMix64 step, used only to expand a seed into xoshiro state.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RiffRng::new(42);
        let mut b = RiffRng::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = RiffRng::new(42);
        let mut b = RiffRng::new(43);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn fork_is_deterministic_and_independent() {
        let mut parent_a = RiffRng::new(7);
        let mut parent_b = RiffRng::new(7);
        let mut child_a = parent_a.fork();
        let mut child_b = parent_b.fork();
        assert_eq!(child_a, child_b);
        assert_eq!(parent_a, parent_b);
        // Child and parent continue on different streams.
        assert_ne!(child_a.next_u64(), parent_a.next_u64());
        assert_eq!(child_b.next_u64(), {
            let mut replay = RiffRng::new(7);
            let mut c = replay.fork();
            c.next_u64()
        });
    }

    #[test]
    fn range_usize_inclusive_hits_both_ends() {
        let mut rng = RiffRng::new(666);
        let mut saw = [false; 3];
        for _ in 0..10_000 {
            let v = rng.range_usize_inclusive(1, 3);
            assert!((1..=3).contains(&v), "out of range: {v}");
            saw[v - 1] = true;
        }
        assert_eq!(saw, [true; 3]);
    }

    #[test]
    fn range_u64_inclusive_per_mille() {
        let mut rng = RiffRng::new(1000);
        let mut saw_max = false;
        for _ in 0..100_000 {
            let v = rng.range_u64_inclusive(0, 1000);
            assert!(v <= 1000);
            saw_max |= v == 1000;
        }
        assert!(saw_max, "upper bound of an inclusive range must be reachable");
    }

    #[test]
    fn range_i64_inclusive_transpose_steps() {
        let mut rng = RiffRng::new(3);
        let mut counts = [0u32; 3];
        for _ in 0..30_000 {
            let d = rng.range_i64_inclusive(-1, 1);
            counts[(d + 1) as usize] += 1;
        }
        for c in counts {
            assert!((9_000..11_000).contains(&c), "skewed step distribution: {counts:?}");
        }
    }

    #[test]
    fn degenerate_inclusive_range_returns_bound() {
        let mut rng = RiffRng::new(9);
        assert_eq!(rng.range_usize_inclusive(4, 4), 4);
        assert_eq!(rng.range_i64_inclusive(-2, -2), -2);
    }

    #[test]
    fn full_width_inclusive_range_does_not_overflow() {
        let mut rng = RiffRng::new(11);
        let _ = rng.range_u64_inclusive(0, u64::MAX);
        let v = rng.range_u64_inclusive(1, u64::MAX);
        assert!(v >= 1);
    }

    #[test]
    fn state_survives_json() {
        let mut rng = RiffRng::new(42);
        for _ in 0..100 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: RiffRng = serde_json::from_str(&json).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }
}
