// A riff: an ordered sequence of chords, the unit the search evolves.
//
// Riff fitness layers a transition rule over the per-chord scores. Walking
// the chords in order, each chord earns +10 if any of its candidate triads
// has a root that is a tone of some candidate triad of the previous chord,
// and -10 otherwise. The first chord has no predecessor and always takes
// the -10, which the base score of 10 cancels out.
//
// Genetic operators:
// - mutate: per-chord mutation, then removal of any emptied chord
// - splice: one-point crossover at a point in [3, shorter length]
// - shift: rotate the sequence left by a random offset
//
// Chords are owned values, so every riff produced by splice or clone is
// fully independent of its parents.

use crate::catalog::any_contains;
use crate::chord::{Chord, ChordAssessment};
use riffgen_prng::RiffRng;
use serde::{Deserialize, Serialize};

/// Starting score, offsetting the first chord's missing predecessor.
pub const BASE_SCORE: i32 = 10;

/// Reward (or penalty, negated) for each chord-to-chord transition.
pub const TRANSITION_BONUS: i32 = 10;

/// Chord count range for freshly randomized riffs.
pub const MIN_RANDOM_LEN: usize = 3;
pub const MAX_RANDOM_LEN: usize = 10;

/// Lowest crossover point for `splice` when both operands allow it.
pub const MIN_CROSSOVER: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Riff {
    chords: Vec<Chord>,
}

/// Per-chord assessments plus the aggregate riff score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiffAssessment {
    pub chords: Vec<ChordAssessment>,
    pub score: i32,
}

impl Riff {
    pub fn new(chords: Vec<Chord>) -> Self {
        Riff { chords }
    }

    /// A riff of 3 to 10 random chords.
    pub fn random(rng: &mut RiffRng) -> Self {
        let len = rng.range_usize_inclusive(MIN_RANDOM_LEN, MAX_RANDOM_LEN);
        Riff {
            chords: (0..len).map(|_| Chord::random(rng)).collect(),
        }
    }

    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    pub fn assess(&self) -> RiffAssessment {
        let mut score = BASE_SCORE;
        let mut chords: Vec<ChordAssessment> = Vec::with_capacity(self.chords.len());
        for chord in &self.chords {
            let current = chord.assess();
            score += current.score;
            let previous = chords.last().map(|a| a.candidates.as_slice()).unwrap_or(&[]);
            let linked = current
                .candidates
                .iter()
                .any(|now| any_contains(previous, now.root()));
            score += if linked { TRANSITION_BONUS } else { -TRANSITION_BONUS };
            chords.push(current);
        }
        RiffAssessment { chords, score }
    }

    pub fn score(&self) -> i32 {
        self.assess().score
    }

    /// Mutate every chord at `percent` per mille, then drop emptied chords.
    ///
    /// Returns how many chord mutations were applied.
    pub fn mutate(&mut self, percent: u32, rng: &mut RiffRng) -> usize {
        let mut applied = 0;
        for chord in &mut self.chords {
            if chord.mutate(percent, rng).is_some() {
                applied += 1;
            }
        }
        self.chords.retain(|c| !c.is_empty());
        applied
    }

    /// Valid crossover points against `other`.
    ///
    /// Normally `[3, m]` with `m` the shorter length. When a parent has shrunk
    /// below three chords the range collapses to the single point `m`, which
    /// keeps all of the shorter prefix.
    pub fn crossover_range(&self, other: &Riff) -> std::ops::RangeInclusive<usize> {
        let m = self.len().min(other.len());
        MIN_CROSSOVER.min(m)..=m
    }

    /// One-point crossover: this riff's chords before a random point followed
    /// by `other`'s chords from that point on.
    pub fn splice(&self, other: &Riff, rng: &mut RiffRng) -> Riff {
        let range = self.crossover_range(other);
        let point = rng.range_usize_inclusive(*range.start(), *range.end());
        self.splice_at(other, point)
    }

    pub fn splice_at(&self, other: &Riff, point: usize) -> Riff {
        let head = &self.chords[..point.min(self.len())];
        let tail = &other.chords[point.min(other.len())..];
        Riff {
            chords: head.iter().chain(tail).cloned().collect(),
        }
    }

    /// Rotate left by a random offset in `[0, len]`. Returns the offset.
    pub fn shift(&mut self, rng: &mut RiffRng) -> usize {
        let offset = rng.range_usize_inclusive(0, self.len());
        self.shift_by(offset);
        offset
    }

    /// Rotate left by `offset`; `offset == len` is a full turn.
    pub fn shift_by(&mut self, offset: usize) {
        if !self.chords.is_empty() {
            let len = self.chords.len();
            self.chords.rotate_left(offset % len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fretboard::AbsoluteNote;

    fn chord(values: &[u8]) -> Chord {
        Chord::from_notes(values.iter().map(|&v| AbsoluteNote::new(v).unwrap())).unwrap()
    }

    fn c_major() -> Chord {
        chord(&[8, 12, 15])
    }

    fn cluster() -> Chord {
        chord(&[8, 10, 21])
    }

    /// Riff of single-note chords `offset, offset + 1, ...`, so each chord's
    /// origin is visible after crossover and rotation.
    fn labeled(len: usize, offset: u8) -> Riff {
        Riff::new((0..len).map(|i| chord(&[offset + i as u8])).collect())
    }

    #[test]
    fn empty_riff_scores_base() {
        assert_eq!(Riff::default().score(), BASE_SCORE);
    }

    #[test]
    fn repeated_triad_links_to_itself() {
        // 10 base + (10 - 10) first chord + (10 + 10) second chord.
        let riff = Riff::new(vec![c_major(), c_major()]);
        assert_eq!(riff.score(), 30);
    }

    #[test]
    fn unmatched_chord_breaks_the_chain() {
        // 10 base + (10 - 10) + (-5 - 10): a chord without candidates can
        // never link, and the chord after it has no predecessor candidates.
        let riff = Riff::new(vec![c_major(), cluster()]);
        assert_eq!(riff.score(), -5);
        let riff = Riff::new(vec![cluster(), c_major()]);
        assert_eq!(riff.score(), -5);
    }

    #[test]
    fn transition_checks_root_against_previous_tones() {
        // C major then G major (G2 3, B2 7, D3 10): G is a tone of C major.
        let g_major = chord(&[3, 7, 10]);
        assert_eq!(g_major.score(), 10);
        let riff = Riff::new(vec![c_major(), g_major.clone()]);
        assert_eq!(riff.score(), 30);
        // Db major (Db3 9, F3 13, Ab3 16): Db is not a tone of C major.
        let db_major = chord(&[9, 13, 16]);
        assert_eq!(db_major.score(), 10);
        let riff = Riff::new(vec![c_major(), db_major]);
        assert_eq!(riff.score(), 10);
    }

    #[test]
    fn scoring_is_idempotent() {
        let mut rng = RiffRng::new(11);
        for _ in 0..100 {
            let riff = Riff::random(&mut rng);
            assert_eq!(riff.score(), riff.score());
            assert_eq!(riff.assess().chords.len(), riff.len());
        }
    }

    #[test]
    fn random_riff_length_in_range() {
        let mut rng = RiffRng::new(12);
        for _ in 0..500 {
            let riff = Riff::random(&mut rng);
            assert!((MIN_RANDOM_LEN..=MAX_RANDOM_LEN).contains(&riff.len()));
        }
    }

    #[test]
    fn splice_equal_lengths() {
        let a = labeled(5, 0);
        let b = labeled(5, 10);
        let mut rng = RiffRng::new(13);
        for _ in 0..200 {
            let child = a.splice(&b, &mut rng);
            assert_eq!(child.len(), 5);
            let point = child
                .chords()
                .iter()
                .position(|c| c.notes()[0].value() >= 10)
                .unwrap_or(5);
            assert!((3..=5).contains(&point), "crossover point {point}");
            assert_eq!(&child.chords()[..point], &a.chords()[..point]);
            assert_eq!(&child.chords()[point..], &b.chords()[point..]);
        }
    }

    #[test]
    fn splice_length_follows_second_parent() {
        let short = labeled(4, 0);
        let long = labeled(8, 10);
        for point in short.crossover_range(&long) {
            let child = short.splice_at(&long, point);
            assert_eq!(child.len(), point + (long.len() - point));
            assert_eq!(child.len(), 8);
            let child = long.splice_at(&short, point);
            assert_eq!(child.len(), 4);
            assert_eq!(&child.chords()[..point], &long.chords()[..point]);
        }
        assert_eq!(short.crossover_range(&long), 3..=4);
    }

    #[test]
    fn splice_underflow_keeps_short_prefix() {
        let tiny = labeled(2, 0);
        let other = labeled(5, 10);
        assert_eq!(tiny.crossover_range(&other), 2..=2);
        let mut rng = RiffRng::new(14);
        let child = tiny.splice(&other, &mut rng);
        assert_eq!(child.len(), 5);
        assert_eq!(&child.chords()[..2], tiny.chords());
        assert_eq!(&child.chords()[2..], &other.chords()[2..]);

        let empty = Riff::default();
        assert_eq!(empty.splice(&other, &mut rng), other);
    }

    #[test]
    fn spliced_child_is_independent() {
        let a = labeled(5, 0);
        let b = labeled(5, 10);
        let mut child = a.splice_at(&b, 3);
        let mut rng = RiffRng::new(15);
        for _ in 0..20 {
            child.mutate(1001, &mut rng);
        }
        assert_eq!(a, labeled(5, 0));
        assert_eq!(b, labeled(5, 10));
    }

    #[test]
    fn shift_by_zero_or_len_is_noop() {
        let original = labeled(6, 0);
        let mut riff = original.clone();
        riff.shift_by(0);
        assert_eq!(riff, original);
        riff.shift_by(6);
        assert_eq!(riff, original);
        riff.shift_by(2);
        assert_eq!(riff.chords()[0], original.chords()[2]);
        assert_eq!(riff.chords()[4], original.chords()[0]);
    }

    #[test]
    fn random_shift_is_a_rotation() {
        let original = labeled(7, 0);
        let mut rng = RiffRng::new(16);
        for _ in 0..100 {
            let mut riff = original.clone();
            let offset = riff.shift(&mut rng);
            assert!(offset <= original.len());
            for (i, c) in riff.chords().iter().enumerate() {
                assert_eq!(c, &original.chords()[(i + offset) % original.len()]);
            }
        }
        let mut empty = Riff::default();
        assert_eq!(empty.shift(&mut rng), 0);
    }

    #[test]
    fn mutate_drops_emptied_chords() {
        let mut riff = Riff::new(vec![c_major(), Chord::empty(), cluster()]);
        let mut rng = RiffRng::new(17);
        assert_eq!(riff.mutate(0, &mut rng), 0);
        assert_eq!(riff.chords(), &[c_major(), cluster()]);
    }

    #[test]
    fn heavy_mutation_keeps_chords_valid() {
        let mut rng = RiffRng::new(18);
        let mut riff = Riff::random(&mut rng);
        for _ in 0..100 {
            riff.mutate(1001, &mut rng);
            assert!(riff.chords().iter().all(|c| (1..=3).contains(&c.len())));
        }
    }
}
