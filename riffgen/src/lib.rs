// Riffgen: evolutionary guitar riff generator
//
// Breeds short chord sequences for a six-string guitar (first four frets,
// standard tuning) with a genetic algorithm. Fitness rewards chords that
// spell exactly one major or minor triad and transitions where a chord's
// root belongs to the previous chord's triad.
//
// Architecture:
// - fretboard.rs: Note numbering, string/fret mapping, pitch classes
// - catalog.rs: The 24 major/minor triads and pitch-class lookup
// - chord.rs: Up-to-three-note chords, triad matching score, chord mutations
// - riff.rs: Chord sequences, transition scoring, splice + shift operators
// - population.rs: Parallel scoring, roulette-wheel selection, batched
//   reproduction of the next generation
// - evolution.rs: Generation loop, best-so-far tracking, observer reports
// - render.rs: Plain-text tab output
// - config.rs: Run configuration (JSON + defaults + validation)
// - error.rs: Error enums
//
// All randomness flows through an explicit `riffgen_prng::RiffRng`, so a
// run is reproducible from its seed.

pub mod catalog;
pub mod chord;
pub mod config;
pub mod error;
pub mod evolution;
pub mod fretboard;
pub mod population;
pub mod render;
pub mod riff;
