// A chord: one to three notes, each on its own string.
//
// The note list is the only stored state. Everything derived from it (fret
// positions, candidate chord names, fitness) is recomputed on demand, so a
// mutated chord can never report a stale score.
//
// Fitness rewards tonal specificity: the fewer catalog triads a chord could
// belong to, the higher it scores. A full triad matching exactly one entry
// scores 10; a single note (six candidate triads) scores 0; a cluster that
// fits no triad at all scores -5.
//
// Mutation operators (insert, delete, transpose one, transpose all) are
// best-effort: an operator whose precondition fails simply does nothing.
// Transposing can push two notes onto the same string; the later note in
// the list is then dropped rather than the move being rejected.

use crate::catalog::{ChordName, definitions_containing};
use crate::error::ChordError;
use crate::fretboard::{AbsoluteNote, PitchClass, STRING_COUNT};
use riffgen_prng::RiffRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score of a chord that fits no catalog triad.
pub const UNMATCHED_SCORE: i32 = -5;

/// Candidate count at which a chord scores zero.
const MATCH_CEILING: i32 = 6;

/// Per-mille scale for mutation chances.
pub const PER_MILLE: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AbsoluteNote>", into = "Vec<AbsoluteNote>")]
pub struct Chord {
    notes: Vec<AbsoluteNote>,
}

/// Derived harmonic view of a chord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordAssessment {
    /// Catalog triads covering every pitch class in the chord, in catalog order.
    pub candidates: Vec<ChordName>,
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordMutation {
    Insert,
    Delete,
    TransposeOne,
    TransposeAll,
}

impl ChordMutation {
    pub const ALL: [ChordMutation; 4] = [
        ChordMutation::Insert,
        ChordMutation::Delete,
        ChordMutation::TransposeOne,
        ChordMutation::TransposeAll,
    ];
}

impl Chord {
    pub const MAX_NOTES: usize = 3;

    /// Build a chord from notes in order, skipping any note whose string is
    /// already taken and anything beyond three notes. Fails if nothing is left.
    pub fn from_notes(notes: impl IntoIterator<Item = AbsoluteNote>) -> Result<Self, ChordError> {
        let mut chord = Chord { notes: Vec::with_capacity(Self::MAX_NOTES) };
        for note in notes {
            if chord.notes.len() == Self::MAX_NOTES {
                break;
            }
            chord.try_add(note);
        }
        if chord.notes.is_empty() {
            return Err(ChordError::Empty);
        }
        Ok(chord)
    }

    /// A zero-note chord, the state `Riff::mutate` cleans up.
    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Chord { notes: Vec::new() }
    }

    /// A random chord of one to three notes on distinct strings.
    pub fn random(rng: &mut RiffRng) -> Self {
        let target = rng.range_usize_inclusive(1, Self::MAX_NOTES);
        let mut chord = Chord { notes: Vec::with_capacity(target) };
        while chord.notes.len() < target {
            chord.try_add(AbsoluteNote::random(rng));
        }
        chord
    }

    pub fn notes(&self) -> &[AbsoluteNote] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn pitch_classes(&self) -> Vec<PitchClass> {
        self.notes.iter().map(|n| n.pitch_class()).collect()
    }

    /// Fret per string (index 0 = highest string), `None` where unused.
    pub fn frets(&self) -> [Option<u8>; STRING_COUNT] {
        let mut frets = [None; STRING_COUNT];
        for note in &self.notes {
            let pos = note.position();
            frets[pos.string as usize] = Some(pos.fret);
        }
        frets
    }

    pub fn candidates(&self) -> Vec<ChordName> {
        definitions_containing(&self.pitch_classes())
    }

    pub fn assess(&self) -> ChordAssessment {
        let candidates = self.candidates();
        let score = if candidates.is_empty() {
            UNMATCHED_SCORE
        } else {
            2 * (MATCH_CEILING - candidates.len() as i32)
        };
        ChordAssessment { candidates, score }
    }

    pub fn score(&self) -> i32 {
        self.assess().score
    }

    fn string_free(&self, note: AbsoluteNote) -> bool {
        let string = note.position().string;
        self.notes.iter().all(|n| n.position().string != string)
    }

    /// Add a note if its string is free and the chord is not full.
    pub fn try_add(&mut self, note: AbsoluteNote) -> bool {
        if self.notes.len() < Self::MAX_NOTES && self.string_free(note) {
            self.notes.push(note);
            true
        } else {
            false
        }
    }

    /// With probability `percent`/1000, apply one randomly chosen operator.
    ///
    /// Returns the operator that ran, or `None` if the roll failed, the
    /// chosen operator's precondition did not hold, or an inserted note hit
    /// an occupied string.
    pub fn mutate(&mut self, percent: u32, rng: &mut RiffRng) -> Option<ChordMutation> {
        let roll = rng.range_u64_inclusive(0, PER_MILLE as u64);
        if percent as u64 <= roll {
            return None;
        }
        let kind = ChordMutation::ALL[rng.range_usize(0, ChordMutation::ALL.len())];
        match kind {
            ChordMutation::Insert => {
                if self.notes.len() >= Self::MAX_NOTES {
                    return None;
                }
                if !self.try_add(AbsoluteNote::random(rng)) {
                    return None;
                }
            }
            ChordMutation::Delete => {
                if self.notes.len() <= 1 {
                    return None;
                }
                let idx = rng.range_usize(0, self.notes.len());
                self.notes.remove(idx);
            }
            ChordMutation::TransposeOne => {
                if self.notes.is_empty() {
                    return None;
                }
                let idx = rng.range_usize(0, self.notes.len());
                let delta = rng.range_i64_inclusive(-1, 1);
                self.notes[idx] = self.notes[idx].transpose(delta);
                self.drop_string_collisions();
            }
            ChordMutation::TransposeAll => {
                if self.notes.is_empty() {
                    return None;
                }
                let delta = rng.range_i64_inclusive(-1, 1);
                for note in &mut self.notes {
                    *note = note.transpose(delta);
                }
                self.drop_string_collisions();
            }
        }
        Some(kind)
    }

    /// Keep the first note on each string.
    fn drop_string_collisions(&mut self) {
        let mut taken = [false; STRING_COUNT];
        self.notes.retain(|note| {
            let string = note.position().string as usize;
            !std::mem::replace(&mut taken[string], true)
        });
    }
}

impl TryFrom<Vec<AbsoluteNote>> for Chord {
    type Error = ChordError;

    fn try_from(notes: Vec<AbsoluteNote>) -> Result<Self, Self::Error> {
        Chord::from_notes(notes)
    }
}

impl From<Chord> for Vec<AbsoluteNote> {
    fn from(chord: Chord) -> Self {
        chord.notes
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, note) in self.notes.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{note}")?;
        }
        Ok(())
    }
}
