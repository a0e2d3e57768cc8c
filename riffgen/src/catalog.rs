// Fixed catalog of the 24 major and minor triads.
//
// The catalog is the harmonic oracle for the whole fitness function: a
// chord's candidate names are the triads whose three pitch classes cover
// every pitch class the chord sounds, and riff transitions are judged by
// whether a candidate's root appears in the previous chord's candidates.
//
// The table is a `static`, so any number of scoring threads can read it
// concurrently. Iteration order is fixed (roots ascending from E, major
// before minor) and every query returns results in that order.

use crate::fretboard::PitchClass;
use serde::{Deserialize, Serialize};
use std::fmt;

use PitchClass::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    Major,
    Minor,
}

/// A named three-note chord. `tones[0]` is the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordDefinition {
    pub name: &'static str,
    pub quality: Quality,
    pub tones: [PitchClass; 3],
}

impl ChordDefinition {
    const fn major(name: &'static str, tones: [PitchClass; 3]) -> Self {
        ChordDefinition { name, quality: Quality::Major, tones }
    }

    const fn minor(name: &'static str, tones: [PitchClass; 3]) -> Self {
        ChordDefinition { name, quality: Quality::Minor, tones }
    }

    pub fn root(&self) -> PitchClass {
        self.tones[0]
    }

    pub fn contains(&self, pc: PitchClass) -> bool {
        self.tones.contains(&pc)
    }
}

pub static CATALOG: [ChordDefinition; 24] = [
    ChordDefinition::major("E", [E, Ab, B]),
    ChordDefinition::minor("Em", [E, G, B]),
    ChordDefinition::major("F", [F, A, C]),
    ChordDefinition::minor("Fm", [F, Ab, C]),
    ChordDefinition::major("Gb", [Gb, Bb, Db]),
    ChordDefinition::minor("Gbm", [Gb, A, Db]),
    ChordDefinition::major("G", [G, B, D]),
    ChordDefinition::minor("Gm", [G, Bb, D]),
    ChordDefinition::major("Ab", [Ab, C, Eb]),
    ChordDefinition::minor("Abm", [Ab, B, Eb]),
    ChordDefinition::major("A", [A, Db, E]),
    ChordDefinition::minor("Am", [A, C, E]),
    ChordDefinition::major("Bb", [Bb, D, F]),
    ChordDefinition::minor("Bbm", [Bb, Db, F]),
    ChordDefinition::major("B", [B, Eb, Gb]),
    ChordDefinition::minor("Bm", [B, D, Gb]),
    ChordDefinition::major("C", [C, E, G]),
    ChordDefinition::minor("Cm", [C, Eb, G]),
    ChordDefinition::major("Db", [Db, F, Ab]),
    ChordDefinition::minor("Dbm", [Db, E, Ab]),
    ChordDefinition::major("D", [D, Gb, A]),
    ChordDefinition::minor("Dm", [D, F, A]),
    ChordDefinition::major("Eb", [Eb, G, Bb]),
    ChordDefinition::minor("Ebm", [Eb, Gb, Bb]),
];

/// Handle to one catalog entry. Serializes as the chord's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChordName(u8);

impl ChordName {
    pub fn definition(self) -> &'static ChordDefinition {
        &CATALOG[self.0 as usize]
    }

    pub fn as_str(self) -> &'static str {
        self.definition().name
    }

    pub fn root(self) -> PitchClass {
        self.definition().root()
    }

    /// Look up a catalog entry by name, e.g. `"Gbm"`.
    pub fn lookup(name: &str) -> Option<ChordName> {
        CATALOG
            .iter()
            .position(|def| def.name == name)
            .map(|i| ChordName(i as u8))
    }
}

impl fmt::Display for ChordName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ChordName {
    type Error = String;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        ChordName::lookup(&name).ok_or_else(|| format!("unknown chord name '{name}'"))
    }
}

impl From<ChordName> for String {
    fn from(name: ChordName) -> String {
        name.as_str().to_string()
    }
}

/// Every catalog entry whose tones include all of `pitch_classes`.
///
/// Duplicates in the input are harmless. An empty input matches everything.
pub fn definitions_containing(pitch_classes: &[PitchClass]) -> Vec<ChordName> {
    CATALOG
        .iter()
        .enumerate()
        .filter(|(_, def)| pitch_classes.iter().all(|&pc| def.contains(pc)))
        .map(|(i, _)| ChordName(i as u8))
        .collect()
}

/// True if `root` is a tone of any of the named chords.
pub fn any_contains(names: &[ChordName], root: PitchClass) -> bool {
    names.iter().any(|name| name.definition().contains(root))
}
