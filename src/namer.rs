//! Chord Namer
//!
//! Turns a collection of MIDI pitches into a chord symbol such as `"Cmaj7"`,
//! `"Dm7"` or `"G5"`, together with a confidence estimate and the path that
//! produced the name.
//!
//! Names come from an optional [`ChordRecognizer`] when one is configured and
//! answers, and from the built-in interval heuristic otherwise.

use std::collections::BTreeSet;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::note::{pitches_to_names, validate_pitches, InvalidPitchError, NoteName, SEMITONES};
use crate::recognizer::{normalize_symbol, ChordRecognizer};

/// Name given to an empty note set
pub const REST: &str = "Rest";

/// Confidence reported for the rest sentinel
const REST_CONFIDENCE: f32 = 1.0;

/// Confidence reported for any name produced by an external engine
const EXTERNAL_CONFIDENCE: f32 = 0.95;

/// More distinct intervals than this marks the chord as a dense cluster
const MAX_NAMED_INTERVALS: usize = 5;

/// Which recognition path produced a chord name
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Fixed answer, e.g. the rest sentinel.
    Builtin,
    /// A configured [`ChordRecognizer`].
    External,
    /// The interval heuristic.
    Heuristic,
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Method::Builtin => "builtin",
            Method::External => "external",
            Method::Heuristic => "heuristic",
        })
    }
}

/// Result of naming a single note set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordAnalysis {
    /// Chord symbol, e.g. `"Cmaj7"`, or `"Rest"` for an empty note set.
    pub chord_name: String,
    /// Note names with octave, sorted by pitch, duplicates kept.
    pub notes: Vec<String>,
    /// The input pitches, sorted ascending, duplicates kept.
    pub midi_notes: Vec<u8>,
    /// Number of distinct pitches.
    pub note_count: usize,
    /// Recognition confidence in `0.0..=1.0`.
    pub confidence: f32,
    /// Path that produced `chord_name`.
    pub method: Method,
}

impl ChordAnalysis {
    fn rest() -> Self {
        ChordAnalysis {
            chord_name: REST.to_string(),
            notes: Vec::new(),
            midi_notes: Vec::new(),
            note_count: 0,
            confidence: REST_CONFIDENCE,
            method: Method::Builtin,
        }
    }
}

/// Builder for `ChordNamer` to plug in an external recognition engine
#[derive(Default)]
pub struct ChordNamerBuilder {
    recognizer: Option<Box<dyn ChordRecognizer>>,
}

impl ChordNamerBuilder {
    /// Create a builder with no external engine
    pub fn new() -> Self {
        ChordNamerBuilder { recognizer: None }
    }

    /// Consult `recognizer` before the heuristic
    pub fn recognizer<R: ChordRecognizer + 'static>(mut self, recognizer: R) -> Self {
        self.recognizer = Some(Box::new(recognizer));
        self
    }

    /// Build the `ChordNamer`
    pub fn build(self) -> ChordNamer {
        ChordNamer {
            recognizer: self.recognizer,
        }
    }
}

/// Names chords from MIDI pitches
#[derive(Default)]
pub struct ChordNamer {
    recognizer: Option<Box<dyn ChordRecognizer>>,
}

impl ChordNamer {
    /// Return a builder to configure an external engine
    pub fn builder() -> ChordNamerBuilder {
        ChordNamerBuilder::new()
    }

    /// Create a namer that only uses the built-in heuristic
    pub fn new() -> Self {
        ChordNamer { recognizer: None }
    }

    /// Whether an external engine is configured
    pub fn has_recognizer(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Name the chord formed by `pitches`.
    ///
    /// Pitches may be in any order and may repeat. An empty slice is a rest.
    /// Returns `Err(InvalidPitchError)` if any pitch is above 127.
    pub fn name_chord(&self, pitches: &[u8]) -> Result<ChordAnalysis, InvalidPitchError> {
        validate_pitches(pitches)?;
        if pitches.is_empty() {
            return Ok(ChordAnalysis::rest());
        }

        let mut midi_notes = pitches.to_vec();
        midi_notes.sort_unstable();
        let unique = unique_pitches(pitches);
        let notes = pitches_to_names(pitches)?;

        if let Some(symbol) = self.try_external(pitches) {
            return Ok(ChordAnalysis {
                chord_name: symbol,
                notes,
                midi_notes,
                note_count: unique.len(),
                confidence: EXTERNAL_CONFIDENCE,
                method: Method::External,
            });
        }

        let chord_name = name_from_unique(&unique);
        trace!(chord = %chord_name, notes = unique.len(), "heuristic chord name");

        Ok(ChordAnalysis {
            chord_name,
            notes,
            midi_notes,
            note_count: unique.len(),
            confidence: estimate_confidence(unique.len()),
            method: Method::Heuristic,
        })
    }

    /// Ask the external engine, swallowing every failure.
    fn try_external(&self, pitches: &[u8]) -> Option<String> {
        let engine = self.recognizer.as_ref()?;
        match engine.recognize(pitches) {
            Ok(Some(symbol)) if !symbol.trim().is_empty() => Some(normalize_symbol(symbol.trim())),
            Ok(_) => {
                debug!(engine = engine.name(), "no chord from external engine, using heuristic");
                None
            }
            Err(e) => {
                debug!(engine = engine.name(), error = %e, "external engine failed, using heuristic");
                None
            }
        }
    }
}

/// Name `pitches` with a heuristic-only namer.
pub fn analyze_chord(pitches: &[u8]) -> Result<ChordAnalysis, InvalidPitchError> {
    ChordNamer::new().name_chord(pitches)
}

/// Shorthand for the chord name alone, e.g. `[60, 64, 67] -> "C"`.
pub fn midi_to_chord_name(pitches: &[u8]) -> Result<String, InvalidPitchError> {
    Ok(analyze_chord(pitches)?.chord_name)
}

/// Confidence of a heuristic name, from the number of distinct pitches.
///
/// The bands are fixed calibration points: up to 3 notes 0.85, 4 notes 0.80,
/// 5-6 notes 0.70, 7 or more 0.60.
pub fn estimate_confidence(unique_pitches: usize) -> f32 {
    match unique_pitches {
        0..=3 => 0.85,
        4 => 0.80,
        5..=6 => 0.70,
        _ => 0.60,
    }
}

/// Run the interval heuristic alone, without any external engine.
///
/// An empty slice yields `"Rest"`.
pub fn heuristic_chord_name(pitches: &[u8]) -> Result<String, InvalidPitchError> {
    validate_pitches(pitches)?;
    if pitches.is_empty() {
        return Ok(REST.to_string());
    }
    Ok(name_from_unique(&unique_pitches(pitches)))
}

fn unique_pitches(pitches: &[u8]) -> Vec<u8> {
    pitches.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Intervals above the root that drive naming
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
struct IntervalFlags {
    min3: bool,
    maj3: bool,
    dim5: bool,
    p5: bool,
    aug5: bool,
    min7: bool,
    maj7: bool,
    ninth: bool,
    eleventh: bool,
    thirteenth: bool,
}

impl IntervalFlags {
    fn from_intervals(intervals: &BTreeSet<usize>) -> Self {
        let has = |i: usize| intervals.contains(&i);
        IntervalFlags {
            min3: has(3),
            maj3: has(4),
            dim5: has(6),
            p5: has(7),
            aug5: has(8),
            min7: has(10),
            maj7: has(11),
            ninth: has(2),
            eleventh: has(5),
            thirteenth: has(9),
        }
    }
}

/// Basic triad quality, the first matching row wins
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Quality {
    Diminished,
    Minor,
    Augmented,
    Major,
    /// Major third with a tritone, spelled as a dominant seventh
    DominantTritone,
    Sus4,
    Sus2,
    /// No third and no sus tone
    Bare,
}

impl Quality {
    fn of(flags: IntervalFlags) -> Self {
        match flags {
            IntervalFlags { min3: true, dim5: true, .. } => Quality::Diminished,
            IntervalFlags { min3: true, .. } => Quality::Minor,
            IntervalFlags { maj3: true, aug5: true, .. } => Quality::Augmented,
            IntervalFlags { maj3: true, p5: true, .. } => Quality::Major,
            IntervalFlags { maj3: true, dim5: true, .. } => Quality::DominantTritone,
            // third only
            IntervalFlags { maj3: true, .. } => Quality::Major,
            IntervalFlags { eleventh: true, .. } => Quality::Sus4,
            IntervalFlags { ninth: true, .. } => Quality::Sus2,
            _ => Quality::Bare,
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            Quality::Diminished => "dim",
            Quality::Minor => "m",
            Quality::Augmented => "aug",
            Quality::Major | Quality::Bare => "",
            Quality::DominantTritone => "7",
            Quality::Sus4 => "sus4",
            Quality::Sus2 => "sus2",
        }
    }
}

fn seventh_suffix(flags: IntervalFlags) -> &'static str {
    if flags.maj7 {
        "maj7"
    } else if flags.min7 {
        "7"
    } else {
        ""
    }
}

fn upper_extension(flags: IntervalFlags) -> Option<&'static str> {
    if flags.thirteenth {
        Some("13")
    } else if flags.eleventh {
        Some("11")
    } else if flags.ninth {
        Some("9")
    } else {
        None
    }
}

/// Heuristic name for a non-empty, sorted, de-duplicated pitch list.
fn name_from_unique(notes: &[u8]) -> String {
    let Some(&lowest) = notes.first() else {
        return REST.to_string();
    };
    let root = NoteName::from_pitch(lowest);
    let mut name = root.to_string();

    match notes {
        [_] => return name,
        [low, high] => {
            let interval = (high - low) as usize % SEMITONES;
            name.push(if interval == 7 { '5' } else { '2' });
            return name;
        }
        _ => {}
    }

    // octave doublings of the root contribute a 0, which counts toward the cluster limit
    let intervals: BTreeSet<usize> = notes[1..]
        .iter()
        .map(|&p| (p as usize + SEMITONES - root.pitch_class()) % SEMITONES)
        .collect();
    let flags = IntervalFlags::from_intervals(&intervals);

    let quality = Quality::of(flags);
    name.push_str(quality.suffix());
    if quality != Quality::DominantTritone {
        name.push_str(seventh_suffix(flags));
    }

    if let Some(ext) = upper_extension(flags) {
        // "G7" + "9" reads "G9", but "Gmaj7" keeps its seventh
        if name.ends_with('7') && !name.ends_with("maj7") {
            name.pop();
        }
        name.push_str(ext);
    }

    if intervals.len() > MAX_NAMED_INTERVALS {
        name = format!("{name}({})", notes.len());
    }
    name
}
