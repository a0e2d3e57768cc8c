// Plain-text guitar tablature.
//
// Each chord becomes one two-character column per string: the fret number
// followed by a dash, or two dashes where the string is unused. A riff is
// six rows, high E on top, with the chord columns concatenated, followed by
// its score. The final report adds each chord's candidate triad names.

use crate::chord::Chord;
use crate::fretboard::STRING_COUNT;
use crate::riff::Riff;
use std::fmt::Write;

const UNUSED: &str = "--";

/// Per-string tokens for a single chord, string 0 first.
pub fn chord_tokens(chord: &Chord) -> [String; STRING_COUNT] {
    chord.frets().map(|fret| match fret {
        Some(fret) => format!("{fret}-"),
        None => UNUSED.to_string(),
    })
}

/// The six tab rows of a riff, without the score line.
pub fn tab_rows(riff: &Riff) -> [String; STRING_COUNT] {
    let mut rows: [String; STRING_COUNT] = Default::default();
    for chord in riff.chords() {
        for (row, token) in rows.iter_mut().zip(chord_tokens(chord)) {
            row.push_str(&token);
        }
    }
    rows
}

/// Tab rows followed by the score line.
pub fn render_riff(riff: &Riff, score: i32) -> String {
    let mut out = String::new();
    for row in tab_rows(riff) {
        out.push_str(&row);
        out.push('\n');
    }
    let _ = writeln!(out, "score: {score}");
    out
}

/// The tab plus, per chord, the names of every matching triad.
pub fn render_final_report(riff: &Riff, score: i32) -> String {
    let mut out = render_riff(riff, score);
    for (i, assessment) in riff.assess().chords.iter().enumerate() {
        let names: Vec<&str> = assessment.candidates.iter().map(|c| c.as_str()).collect();
        if names.is_empty() {
            let _ = writeln!(out, "chord {}: (no match)", i + 1);
        } else {
            let _ = writeln!(out, "chord {}: {}", i + 1, names.join(" "));
        }
    }
    out
}
