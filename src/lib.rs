//! # chordify
//!
//! Name chords from sets of MIDI note numbers and analyze chord progressions
//! for variety, density and common patterns.
//!
//! ## Example
//! ```rust
//! use chordify::{ChordNamer, Pattern, ProgressionAnalyzer, TemplateRecognizer};
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1) Name a single chord with the built-in heuristic
//!     let namer = ChordNamer::new();
//!     let chord = namer.name_chord(&[67, 71, 74, 77])?;
//!     assert_eq!(chord.chord_name, "G7");
//!     assert_eq!(chord.notes, ["G4", "B4", "D5", "F5"]);
//!
//!     // 2) Optionally consult a recognition engine first
//!     let namer = ChordNamer::builder()
//!         .recognizer(TemplateRecognizer::new())
//!         .build();
//!
//!     // 3) Analyze a progression
//!     let analyzer = ProgressionAnalyzer::new(namer);
//!     let summary = analyzer.analyze(&[
//!         vec![60u8, 64, 67],
//!         vec![65, 69, 72],
//!         vec![67, 71, 74],
//!         vec![60, 64, 67],
//!     ])?;
//!     assert_eq!(summary.chord_names, ["C", "F", "G", "C"]);
//!     assert!(summary.patterns.contains(&Pattern::ReturnsToRoot));
//!     println!("complexity {}/10", summary.complexity_score);
//!
//!     Ok(())
//! }
//! # run().unwrap();
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

/// Chord naming API.
pub use namer::{
    analyze_chord, estimate_confidence, heuristic_chord_name, midi_to_chord_name, ChordAnalysis,
    ChordNamer, ChordNamerBuilder, Method, REST,
};

/// Note names and pitch validation.
pub use note::{pitch_to_name, pitches_to_names, InvalidPitchError, NoteName};

/// Progression analysis API.
pub use progression::{
    analyze_progression, detect_patterns, Pattern, ProgressionAnalysis, ProgressionAnalyzer,
};

/// External recognition engines.
pub use recognizer::{normalize_symbol, ChordRecognizer, RecognitionError};

/// Template-matching recognition engine.
pub use template::{ChordKind, ChordMatch, TemplateRecognizer, TemplateRecognizerBuilder};

/// Chord naming module.
pub mod namer;

/// Note formatting module.
pub mod note;

/// Progression analysis module.
pub mod progression;

/// Recognition engine interface.
pub mod recognizer;

/// Template-matching recognizer module.
pub mod template;
