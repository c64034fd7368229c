//! Template Recognizer
//!
//! Chord recognition by matching the sounded pitch classes against a template
//! for every (root, kind) pair. A template is a candidate only when all of its
//! tones are sounded; candidates are ranked by how many extra pitch classes
//! sound outside them, normalised by how many the template leaves out.
//!
//! Distance weighting adapted from the chromagram chord detector by Adam Stark,
//! Queen Mary University of London.
//! https://github.com/adamstark/Chord-Detector-and-Chromagram

use crate::note::{validate_pitches, NoteName, SEMITONES};
use crate::recognizer::{ChordRecognizer, RecognitionError};

/// Default distance above which no template is reported
const DEFAULT_MAX_DISTANCE: f32 = 0.12;

/// Pitch classes as a 12-bit set, bit 0 = C
type PitchSet = u16;

/// Chord qualities known to the template recognizer
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChordKind {
    /// Major chord (e.g., C-E-G)
    Major,
    /// Minor chord (e.g., C-Eb-G)
    Minor,
    /// Power chord (e.g., C-G)
    PowerFifth,
    /// Dominant seventh chord (e.g., C-E-G-Bb)
    DominantSeventh,
    /// Major seventh chord (e.g., C-E-G-B)
    MajorSeventh,
    /// Minor seventh chord (e.g., C-Eb-G-Bb)
    MinorSeventh,
    /// Diminished chord (e.g., C-Eb-Gb)
    Diminished,
    /// Augmented chord (e.g., C-E-G#)
    Augmented,
    /// Suspended second chord (e.g., C-D-G)
    SuspendedSecond,
    /// Suspended fourth chord (e.g., C-F-G)
    SuspendedFourth,
}

impl ChordKind {
    /// Every kind, in tie-break order.
    pub const ALL: [ChordKind; 10] = [
        ChordKind::Major,
        ChordKind::Minor,
        ChordKind::PowerFifth,
        ChordKind::DominantSeventh,
        ChordKind::MajorSeventh,
        ChordKind::MinorSeventh,
        ChordKind::Diminished,
        ChordKind::Augmented,
        ChordKind::SuspendedSecond,
        ChordKind::SuspendedFourth,
    ];

    /// Symbol suffix appended to the root name.
    ///
    /// Power chords use the long form `"power"`, which the namer rewrites to `"5"`.
    pub const fn suffix(self) -> &'static str {
        match self {
            ChordKind::Major => "",
            ChordKind::Minor => "m",
            ChordKind::PowerFifth => "power",
            ChordKind::DominantSeventh => "7",
            ChordKind::MajorSeventh => "maj7",
            ChordKind::MinorSeventh => "m7",
            ChordKind::Diminished => "dim",
            ChordKind::Augmented => "aug",
            ChordKind::SuspendedSecond => "sus2",
            ChordKind::SuspendedFourth => "sus4",
        }
    }

    /// Chord tones as semitones above the root, root included.
    pub const fn intervals(self) -> &'static [u8] {
        match self {
            ChordKind::Major => &[0, 4, 7],
            ChordKind::Minor => &[0, 3, 7],
            ChordKind::PowerFifth => &[0, 7],
            ChordKind::DominantSeventh => &[0, 4, 7, 10],
            ChordKind::MajorSeventh => &[0, 4, 7, 11],
            ChordKind::MinorSeventh => &[0, 3, 7, 10],
            ChordKind::Diminished => &[0, 3, 6],
            ChordKind::Augmented => &[0, 4, 8],
            ChordKind::SuspendedSecond => &[0, 2, 7],
            ChordKind::SuspendedFourth => &[0, 5, 7],
        }
    }

    /// Divisor on the distance; above 1.0 favours the kind when extra notes sound.
    const fn bias(self) -> f32 {
        match self {
            ChordKind::Major | ChordKind::Minor => 1.06,
            ChordKind::PowerFifth => 1.005,
            ChordKind::DominantSeventh | ChordKind::MinorSeventh => 1.06,
            ChordKind::Diminished => 1.05,
            ChordKind::Augmented => 1.055,
            ChordKind::MajorSeventh
            | ChordKind::SuspendedSecond
            | ChordKind::SuspendedFourth => 1.0,
        }
    }
}

/// One (root, kind) template
#[derive(Debug, Copy, Clone)]
struct Template {
    root: NoteName,
    kind: ChordKind,
    tones: PitchSet,
    inv_norm: f32,
}

impl Template {
    fn new(root: NoteName, kind: ChordKind) -> Self {
        let intervals = kind.intervals();
        let tones = intervals.iter().fold(0, |set, &i| {
            set | 1 << ((root.pitch_class() + i as usize) % SEMITONES)
        });
        let left_out = (SEMITONES - intervals.len()) as f32;
        Template {
            root,
            kind,
            tones,
            inv_norm: 1.0 / (left_out * kind.bias()),
        }
    }

    /// `None` when a template tone is not sounded.
    fn distance(&self, sounded: PitchSet) -> Option<f32> {
        if sounded & self.tones != self.tones {
            return None;
        }
        let extra = (sounded & !self.tones).count_ones() as f32;
        Some(extra.sqrt() * self.inv_norm)
    }
}

/// A scored template match.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ChordMatch {
    /// Root of the matched template.
    pub root: NoteName,
    /// Quality of the matched template.
    pub quality: ChordKind,
    /// Distance from the template, where lower values indicate a better match.
    pub distance: f32,
}

impl ChordMatch {
    /// Chord symbol in engine shorthand, e.g. `"Am7"` or `"Gpower"`.
    pub fn symbol(&self) -> String {
        format!("{}{}", self.root, self.quality.suffix())
    }
}

/// Builder for `TemplateRecognizer` to customize the match threshold
pub struct TemplateRecognizerBuilder {
    max_distance: f32,
}

impl TemplateRecognizerBuilder {
    /// Create a new builder with default max distance = 0.12
    pub fn new() -> Self {
        TemplateRecognizerBuilder {
            max_distance: DEFAULT_MAX_DISTANCE,
        }
    }

    /// Set the largest distance still reported as a match
    pub fn max_distance(mut self, value: f32) -> Self {
        self.max_distance = value;
        self
    }

    /// Build the `TemplateRecognizer`
    pub fn build(self) -> TemplateRecognizer {
        TemplateRecognizer::with_max_distance(self.max_distance)
    }
}

impl Default for TemplateRecognizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Template-matching chord recognizer
pub struct TemplateRecognizer {
    max_distance: f32,
    templates: Vec<Template>,
}

impl TemplateRecognizer {
    /// Return a builder to customize the match threshold
    pub fn builder() -> TemplateRecognizerBuilder {
        TemplateRecognizerBuilder::new()
    }

    /// Create a recognizer with default max distance = 0.12
    pub fn new() -> Self {
        Self::with_max_distance(DEFAULT_MAX_DISTANCE)
    }

    fn with_max_distance(max_distance: f32) -> Self {
        // kind-major, so ties fall to the earlier kind, then the lower root
        let templates = ChordKind::ALL
            .into_iter()
            .flat_map(|kind| NoteName::ALL.into_iter().map(move |root| Template::new(root, kind)))
            .collect();

        TemplateRecognizer {
            max_distance,
            templates,
        }
    }

    /// The best `k` templates whose tones are all sounded, closest first.
    ///
    /// Returns:
    /// - `Err(InvalidArgument)` if `k == 0` or a pitch is above 127.
    /// - fewer than `k` matches when fewer templates fit the pitches.
    pub fn candidates(&self, pitches: &[u8], k: usize) -> Result<Vec<ChordMatch>, RecognitionError> {
        if k == 0 {
            return Err(RecognitionError::InvalidArgument {
                arg: "k",
                msg: "must be >= 1".to_string(),
            });
        }
        validate_pitches(pitches).map_err(|e| RecognitionError::InvalidArgument {
            arg: "pitches",
            msg: e.to_string(),
        })?;

        let sounded = pitch_set(pitches);
        let mut matches: Vec<ChordMatch> = self
            .templates
            .iter()
            .filter_map(|t| {
                t.distance(sounded).map(|distance| ChordMatch {
                    root: t.root,
                    quality: t.kind,
                    distance,
                })
            })
            .collect();

        // stable: equal distances keep template order
        matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        matches.truncate(k);
        Ok(matches)
    }

    /// The single closest template, if it is within the configured max distance.
    pub fn best_match(&self, pitches: &[u8]) -> Result<Option<ChordMatch>, RecognitionError> {
        let best = self.candidates(pitches, 1)?.into_iter().next();
        Ok(best.filter(|m| m.distance <= self.max_distance))
    }
}

impl Default for TemplateRecognizer {
    fn default() -> Self {
        TemplateRecognizer::new()
    }
}

impl ChordRecognizer for TemplateRecognizer {
    fn name(&self) -> &str {
        "template"
    }

    fn recognize(&self, pitches: &[u8]) -> Result<Option<String>, RecognitionError> {
        Ok(self.best_match(pitches)?.map(|m| m.symbol()))
    }
}

fn pitch_set(pitches: &[u8]) -> PitchSet {
    pitches
        .iter()
        .fold(0, |set, &p| set | 1 << (p as usize % SEMITONES))
}
