//! Progression Analyzer
//!
//! Names every chord of a progression in order and summarises the sequence:
//! variety, density, a 0-10 complexity score and a few textual patterns.

use std::collections::HashSet;
use std::fmt::Display;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::namer::{ChordAnalysis, ChordNamer};
use crate::note::InvalidPitchError;

/// Upper bound of the complexity score
const MAX_COMPLEXITY: u8 = 10;

/// Weight of each distinct chord name in the complexity score
const VARIETY_WEIGHT: f64 = 1.5;

/// Chord-name sequences recognised as I-IV-V, only in C and D
const ONE_FOUR_FIVE: [&str; 2] = ["C F G", "D G A"];

/// Number of leading chords searched for I-IV-V
const ONE_FOUR_FIVE_WINDOW: usize = 4;

/// Patterns detected over the chord names of a progression
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pattern {
    /// The first and last chord names are equal.
    ReturnsToRoot,
    /// A name contains "m" but not "maj".
    MinorChords,
    /// A name contains "7".
    SeventhChords,
    /// A name contains "9", "11" or "13".
    ExtendedChords,
    /// A name contains "dim".
    DiminishedChords,
    /// A name contains "aug".
    AugmentedChords,
    /// A name contains "sus".
    SuspendedChords,
    /// The first four names contain "C F G" or "D G A".
    OneFourFive,
}

impl Pattern {
    /// Every pattern, in reporting order
    pub const ALL: [Pattern; 8] = [
        Pattern::ReturnsToRoot,
        Pattern::MinorChords,
        Pattern::SeventhChords,
        Pattern::ExtendedChords,
        Pattern::DiminishedChords,
        Pattern::AugmentedChords,
        Pattern::SuspendedChords,
        Pattern::OneFourFive,
    ];

    /// Human-readable label
    pub const fn label(self) -> &'static str {
        match self {
            Pattern::ReturnsToRoot => "Returns to root",
            Pattern::MinorChords => "Contains minor chords",
            Pattern::SeventhChords => "Contains seventh chords",
            Pattern::ExtendedChords => "Contains extended chords",
            Pattern::DiminishedChords => "Contains diminished chords",
            Pattern::AugmentedChords => "Contains augmented chords",
            Pattern::SuspendedChords => "Contains suspended chords",
            Pattern::OneFourFive => "Contains I-IV-V pattern",
        }
    }

    fn matches(self, names: &[String]) -> bool {
        match self {
            Pattern::ReturnsToRoot => names.first() == names.last(),
            Pattern::MinorChords => any_name(names, |n| n.contains('m') && !n.contains("maj")),
            Pattern::SeventhChords => any_name(names, |n| n.contains('7')),
            Pattern::ExtendedChords => {
                any_name(names, |n| ["9", "11", "13"].iter().any(|ext| n.contains(ext)))
            }
            Pattern::DiminishedChords => any_name(names, |n| n.contains("dim")),
            Pattern::AugmentedChords => any_name(names, |n| n.contains("aug")),
            Pattern::SuspendedChords => any_name(names, |n| n.contains("sus")),
            Pattern::OneFourFive => {
                let head = names
                    .iter()
                    .take(ONE_FOUR_FIVE_WINDOW)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(" ");
                ONE_FOUR_FIVE.iter().any(|p| head.contains(p))
            }
        }
    }
}

fn any_name(names: &[String], pred: impl Fn(&str) -> bool) -> bool {
    names.iter().any(|n| pred(n.as_str()))
}

impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Detect patterns in a sequence of chord names.
///
/// Fewer than two chords never match anything.
pub fn detect_patterns(names: &[String]) -> Vec<Pattern> {
    if names.len() < 2 {
        return Vec::new();
    }
    Pattern::ALL
        .into_iter()
        .filter(|p| p.matches(names))
        .collect()
}

/// Summary of a chord progression
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProgressionAnalysis {
    /// Number of chords analysed.
    pub chord_count: usize,
    /// Number of distinct chord names.
    pub unique_chords: usize,
    /// Chord names in progression order.
    pub chord_names: Vec<String>,
    /// Harmonic variety plus note density, clamped to 0-10.
    pub complexity_score: u8,
    /// Mean distinct notes per chord, rounded to one decimal.
    pub average_notes_per_chord: f64,
    /// Detected patterns, in reporting order.
    pub patterns: Vec<Pattern>,
    /// Per-chord analyses in progression order.
    pub chord_details: Vec<ChordAnalysis>,
}

/// Analyzes ordered sequences of note sets
#[derive(Default)]
pub struct ProgressionAnalyzer {
    namer: ChordNamer,
}

impl ProgressionAnalyzer {
    /// Create an analyzer around a configured namer
    pub fn new(namer: ChordNamer) -> Self {
        ProgressionAnalyzer { namer }
    }

    /// The namer used for each chord
    pub fn namer(&self) -> &ChordNamer {
        &self.namer
    }

    /// Name each note set in order and summarise the sequence.
    ///
    /// Returns `Err(InvalidPitchError)` on the first chord holding a pitch above 127.
    pub fn analyze<S: AsRef<[u8]>>(
        &self,
        progression: &[S],
    ) -> Result<ProgressionAnalysis, InvalidPitchError> {
        if progression.is_empty() {
            return Ok(ProgressionAnalysis::default());
        }

        let chord_details = progression
            .iter()
            .map(|chord| self.namer.name_chord(chord.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let chord_names: Vec<String> = chord_details.iter().map(|a| a.chord_name.clone()).collect();

        let total_notes: usize = chord_details.iter().map(|a| a.note_count).sum();
        let mean_notes = total_notes as f64 / chord_details.len() as f64;
        let unique_chords = chord_names.iter().collect::<HashSet<_>>().len();
        let complexity_score = complexity(unique_chords, mean_notes);
        let patterns = detect_patterns(&chord_names);

        debug!(
            chords = chord_details.len(),
            unique = unique_chords,
            complexity = complexity_score,
            "analyzed progression"
        );

        Ok(ProgressionAnalysis {
            chord_count: chord_details.len(),
            unique_chords,
            chord_names,
            complexity_score,
            average_notes_per_chord: round_tenths(mean_notes),
            patterns,
            chord_details,
        })
    }
}

/// Analyze `progression` with a heuristic-only namer.
pub fn analyze_progression<S: AsRef<[u8]>>(
    progression: &[S],
) -> Result<ProgressionAnalysis, InvalidPitchError> {
    ProgressionAnalyzer::default().analyze(progression)
}

/// `min(floor(unique * 1.5 + mean_notes), 10)`
fn complexity(unique_chords: usize, mean_notes: f64) -> u8 {
    let raw = (unique_chords as f64 * VARIETY_WEIGHT + mean_notes) as usize;
    raw.min(MAX_COMPLEXITY as usize) as u8
}

/// One decimal place, ties to even: 2.25 -> 2.2, 2.75 -> 2.8
fn round_tenths(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_progression_is_zeroed() {
        let a = analyze_progression::<Vec<u8>>(&[]).unwrap();
        assert_eq!(a, ProgressionAnalysis::default());
        assert_eq!(a.complexity_score, 0);
        assert_eq!(a.average_notes_per_chord, 0.0);
    }

    #[test]
    fn one_four_five_one_in_c() {
        let a = analyze_progression(&[
            vec![60u8, 64, 67],
            vec![65, 69, 72],
            vec![67, 71, 74],
            vec![60, 64, 67],
        ])
        .unwrap();
        assert_eq!(a.chord_count, 4);
        assert_eq!(a.chord_names, names(&["C", "F", "G", "C"]));
        assert_eq!(a.unique_chords, 3);
        assert_eq!(a.average_notes_per_chord, 3.0);
        // 3 * 1.5 + 3.0 = 7.5
        assert_eq!(a.complexity_score, 7);
        assert_eq!(a.patterns, vec![Pattern::ReturnsToRoot, Pattern::OneFourFive]);
    }

    #[test]
    fn complexity_is_clamped() {
        assert_eq!(complexity(4, 4.0), 10);
        assert_eq!(complexity(1, 1.0), 2);
        assert_eq!(complexity(0, 0.0), 0);
    }

    #[test]
    fn average_is_rounded_to_one_decimal() {
        let a = analyze_progression(&[vec![60u8, 64, 67], vec![60, 64, 67, 71], vec![60, 64, 67, 71]])
            .unwrap();
        assert_eq!(a.average_notes_per_chord, 3.7);
        // 2 * 1.5 + 3.666 = 6.666
        assert_eq!(a.complexity_score, 6);
    }

    #[test]
    fn average_ties_round_to_even() {
        // (3 + 2 + 2 + 2) / 4 = 2.25
        let a = analyze_progression(&[vec![60u8, 64, 67], vec![60, 67], vec![60, 67], vec![60, 67]])
            .unwrap();
        assert_eq!(a.average_notes_per_chord, 2.2);

        // (4 + 3 + 3 + 3) / 4 = 3.25
        let a = analyze_progression(&[
            vec![60u8, 64, 67, 71],
            vec![60, 64, 67],
            vec![60, 64, 67],
            vec![60, 64, 67],
        ])
        .unwrap();
        assert_eq!(a.average_notes_per_chord, 3.2);

        assert_eq!(round_tenths(2.75), 2.8);
        assert_eq!(round_tenths(1.0 / 3.0), 0.3);
    }

    #[test]
    fn single_chord_has_no_patterns() {
        let a = analyze_progression(&[[60u8, 64, 67]]).unwrap();
        assert!(a.patterns.is_empty());
        assert!(detect_patterns(&names(&["Cm"])).is_empty());
    }

    #[test]
    fn substring_patterns() {
        let found = detect_patterns(&names(&["Cm7", "F9", "Bdim", "Caug", "Dsus4"]));
        assert_eq!(
            found,
            vec![
                Pattern::MinorChords,
                Pattern::SeventhChords,
                Pattern::ExtendedChords,
                Pattern::DiminishedChords,
                Pattern::AugmentedChords,
                Pattern::SuspendedChords,
            ]
        );
    }

    #[test]
    fn maj_is_not_minor_but_dim_is() {
        assert!(!detect_patterns(&names(&["Cmaj7", "G"])).contains(&Pattern::MinorChords));
        assert!(detect_patterns(&names(&["Bdim", "C"])).contains(&Pattern::MinorChords));
    }

    #[test]
    fn one_four_five_only_in_fixed_keys() {
        assert!(detect_patterns(&names(&["D", "G", "A"])).contains(&Pattern::OneFourFive));
        assert!(!detect_patterns(&names(&["G", "C", "D"])).contains(&Pattern::OneFourFive));
        // only the first four chords are searched
        assert!(!detect_patterns(&names(&["Am", "Am", "Am", "C", "F", "G"]))
            .contains(&Pattern::OneFourFive));
        // plain substring match: "C F G7" still contains "C F G"
        assert!(detect_patterns(&names(&["C", "F", "G7"])).contains(&Pattern::OneFourFive));
    }

    #[test]
    fn invalid_pitch_aborts_the_analysis() {
        let err = analyze_progression(&[vec![60u8, 64, 67], vec![130]]).unwrap_err();
        assert_eq!(err, InvalidPitchError { pitch: 130 });
    }
}
