// Error types for riff generation.
//
// Errors only arise at the edges: a raw note number outside the modeled
// fretboard range, a chord built (or deserialized) with no playable notes,
// and a bad run configuration. Inside the engine, emptied chords,
// undersized splice operands and sampler overrun have defined fallbacks and
// are not errors.

use std::path::PathBuf;
use thiserror::Error;

/// A raw note number could not be placed on the fretboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FretError {
    #[error("note {0} is outside the modeled range 0..=29")]
    InvalidNoteRange(u8),
}

/// A chord could not be built from the given notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChordError {
    #[error("a chord needs at least one note on a free string")]
    Empty,
}

/// Configuration loading or validation failed. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
