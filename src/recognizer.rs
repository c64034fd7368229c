//! Pluggable chord recognition engines.
//!
//! A [`ChordRecognizer`] is an optional strategy the [`ChordNamer`](crate::ChordNamer)
//! consults before its built-in heuristic. Any error or empty answer from an
//! engine makes the namer fall back to the heuristic.

use thiserror::Error;

/// Suffix some engines use for root-plus-fifth chords
const POWER_SUFFIX: &str = "power";

/// Errors reported by a recognition engine
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// The engine is not available (missing backend, not initialised).
    #[error("recognition engine unavailable: {0}")]
    Unavailable(String),

    /// An invalid argument was provided to a recognition function.
    #[error("invalid argument `{arg}`: {msg}")]
    InvalidArgument {
        /// The name of the invalid argument.
        arg: &'static str,
        /// A description of the invalid argument.
        msg: String,
    },

    /// The engine failed while analysing the pitches.
    #[error("recognition engine failed: {0}")]
    Engine(String),
}

/// An engine that maps a pitch collection to a chord symbol.
pub trait ChordRecognizer: Send + Sync {
    /// Short name used in log events.
    fn name(&self) -> &str {
        "external"
    }

    /// Name the chord formed by `pitches` (unsorted, may contain duplicates).
    ///
    /// Returns `Ok(None)` when the engine does not recognise the collection.
    fn recognize(&self, pitches: &[u8]) -> Result<Option<String>, RecognitionError>;
}

impl<R: ChordRecognizer + ?Sized> ChordRecognizer for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn recognize(&self, pitches: &[u8]) -> Result<Option<String>, RecognitionError> {
        (**self).recognize(pitches)
    }
}

/// Rewrite engine-specific shorthand into the symbols used by this crate.
///
/// `"Cpower"` becomes `"C5"`; everything else is returned unchanged.
pub fn normalize_symbol(symbol: &str) -> String {
    match symbol.strip_suffix(POWER_SUFFIX) {
        Some(stem) => format!("{stem}5"),
        None => symbol.to_string(),
    }
}
