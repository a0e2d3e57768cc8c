// Fretboard encoding: absolute note numbers to physical string/fret positions.
//
// The modeled instrument is a six-string guitar in standard tuning, limited
// to the first four frets. Notes are numbered in semitones from the open low
// E string (0 = E2) up to A4 (29). Strings are numbered the traditional way,
// so string 0 is the high E and string 5 the low E.
//
// Adjacent strings are five semitones apart, except G (string 2) to B
// (string 1), which is four. That makes fret 4 on the G string the same
// pitch as the open B string; the mapping always prefers the open string,
// so the G string effectively stops at fret 3. The top note (A4) sits at
// fret 5 of the high E string, the one position above fret 4 the range needs.
//
// Used by chord.rs for string-occupancy checks and render.rs for tab output.

use crate::error::FretError;
use riffgen_prng::RiffRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of strings on the modeled instrument.
pub const STRING_COUNT: usize = 6;

/// Highest fret used on any string except where noted.
pub const MAX_FRET: u8 = 4;

/// Semitone span from `string` up to the next-higher string.
fn span_to_next(string: u8) -> u8 {
    if string == 2 { 4 } else { 5 }
}

/// A note number in the modeled range, one unit per semitone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AbsoluteNote(u8);

impl AbsoluteNote {
    pub const LOWEST: AbsoluteNote = AbsoluteNote(0);
    pub const HIGHEST: AbsoluteNote = AbsoluteNote(29);

    /// Validate a raw note number.
    pub fn new(value: u8) -> Result<Self, FretError> {
        if value <= Self::HIGHEST.0 {
            Ok(AbsoluteNote(value))
        } else {
            Err(FretError::InvalidNoteRange(value))
        }
    }

    /// A uniformly random note from the whole range.
    pub fn random(rng: &mut RiffRng) -> Self {
        AbsoluteNote(rng.range_u64_inclusive(Self::LOWEST.0 as u64, Self::HIGHEST.0 as u64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn pitch_class(self) -> PitchClass {
        PitchClass::ALL[(self.0 % 12) as usize]
    }

    /// Shift by `delta` semitones, clamped to the modeled range.
    pub fn transpose(self, delta: i64) -> Self {
        let shifted = (self.0 as i64 + delta).clamp(Self::LOWEST.0 as i64, Self::HIGHEST.0 as i64);
        AbsoluteNote(shifted as u8)
    }

    /// Where this note is played.
    pub fn position(self) -> StringFret {
        let mut string = 5u8;
        let mut fret = self.0;
        while fret > MAX_FRET && string > 0 {
            fret -= span_to_next(string);
            string -= 1;
        }
        if string == 2 && fret == MAX_FRET {
            return StringFret { string: 1, fret: 0 };
        }
        StringFret { string, fret }
    }

    /// Every note in the modeled range, lowest first.
    pub fn all() -> impl Iterator<Item = AbsoluteNote> {
        (Self::LOWEST.0..=Self::HIGHEST.0).map(AbsoluteNote)
    }
}

impl TryFrom<u8> for AbsoluteNote {
    type Error = FretError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        AbsoluteNote::new(value)
    }
}

impl From<AbsoluteNote> for u8 {
    fn from(note: AbsoluteNote) -> u8 {
        note.0
    }
}

impl fmt::Display for AbsoluteNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pitch_class())
    }
}

/// A physical location on the fretboard. String 0 is the highest-pitched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StringFret {
    pub string: u8,
    pub fret: u8,
}

/// Map a raw note number to its fret position.
///
/// Out-of-range input is reported and returned as an error rather than
/// silently wrapped; callers decide whether to skip the note.
pub fn map_raw(value: u8) -> Result<StringFret, FretError> {
    match AbsoluteNote::new(value) {
        Ok(note) => Ok(note.position()),
        Err(err) => {
            tracing::warn!(value, "cannot place note on fretboard: {err}");
            Err(err)
        }
    }
}

/// Letter-name identity of a note, with fixed (flat) enharmonic spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    E,
    F,
    Gb,
    G,
    Ab,
    A,
    Bb,
    B,
    C,
    Db,
    D,
    Eb,
}

impl PitchClass {
    /// Indexed by `note % 12`, starting from E because note 0 is E2.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::E,
        PitchClass::F,
        PitchClass::Gb,
        PitchClass::G,
        PitchClass::Ab,
        PitchClass::A,
        PitchClass::Bb,
        PitchClass::B,
        PitchClass::C,
        PitchClass::Db,
        PitchClass::D,
        PitchClass::Eb,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Gb => "Gb",
            PitchClass::G => "G",
            PitchClass::Ab => "Ab",
            PitchClass::A => "A",
            PitchClass::Bb => "Bb",
            PitchClass::B => "B",
            PitchClass::C => "C",
            PitchClass::Db => "Db",
            PitchClass::D => "D",
            PitchClass::Eb => "Eb",
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
