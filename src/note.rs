//! Notes
//!
//! MIDI pitch validation and formatting of pitches as note names with octave
//! (MIDI standard: pitch 60 is "C4").

use std::fmt::Display;
use thiserror::Error;

/// Number of pitch classes in the chromatic scale
pub const SEMITONES: usize = 12;

/// Highest valid MIDI note number
pub const MAX_PITCH: u8 = 127;

/// Sharps-only chromatic names, indexed by pitch class
const NOTE_NAMES: [&str; SEMITONES] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Twelve chromatic pitch classes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NoteName {
    /// C
    C,
    /// C sharp / D flat
    Cs,
    /// D
    D,
    /// D sharp / E flat
    Ds,
    /// E
    E,
    /// F
    F,
    /// F sharp / G flat
    Fs,
    /// G
    G,
    /// G sharp / A flat
    Gs,
    /// A
    A,
    /// A sharp / B flat
    As,
    /// B
    B,
}

impl NoteName {
    /// All pitch classes in chromatic order, starting at C.
    pub const ALL: [NoteName; SEMITONES] = [
        NoteName::C,
        NoteName::Cs,
        NoteName::D,
        NoteName::Ds,
        NoteName::E,
        NoteName::F,
        NoteName::Fs,
        NoteName::G,
        NoteName::Gs,
        NoteName::A,
        NoteName::As,
        NoteName::B,
    ];

    /// Pitch class of a MIDI note number (any value, reduced mod 12).
    pub const fn from_pitch(pitch: u8) -> NoteName {
        Self::ALL[pitch as usize % SEMITONES]
    }

    /// Pitch class index, 0 = C .. 11 = B.
    pub const fn pitch_class(self) -> usize {
        self as usize
    }

    /// Sharps-only spelling, e.g. "C#".
    pub const fn as_str(self) -> &'static str {
        NOTE_NAMES[self as usize]
    }
}

impl Display for NoteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A MIDI note number was outside `0..=127`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid MIDI pitch {pitch}: expected 0..=127")]
pub struct InvalidPitchError {
    /// The offending value.
    pub pitch: u8,
}

/// Check that every pitch is a valid MIDI note number.
pub fn validate_pitches(pitches: &[u8]) -> Result<(), InvalidPitchError> {
    match pitches.iter().find(|&&p| p > MAX_PITCH) {
        Some(&pitch) => Err(InvalidPitchError { pitch }),
        None => Ok(()),
    }
}

/// MIDI octave of a pitch: `floor(pitch / 12) - 1`.
pub const fn octave(pitch: u8) -> i8 {
    (pitch / SEMITONES as u8) as i8 - 1
}

/// Name a single pitch with its octave, e.g. `60 -> "C4"`.
pub fn pitch_to_name(pitch: u8) -> Result<String, InvalidPitchError> {
    validate_pitches(&[pitch])?;
    Ok(format!("{}{}", NoteName::from_pitch(pitch), octave(pitch)))
}

/// Sort pitches ascending and name each one with its octave.
///
/// Duplicates are kept, so the output always has the same length as the input.
pub fn pitches_to_names(pitches: &[u8]) -> Result<Vec<String>, InvalidPitchError> {
    validate_pitches(pitches)?;
    let mut sorted = pitches.to_vec();
    sorted.sort_unstable();
    Ok(sorted
        .into_iter()
        .map(|p| format!("{}{}", NoteName::from_pitch(p), octave(p)))
        .collect())
}
