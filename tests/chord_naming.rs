//! Integration tests for chord naming over fixture voicings and generated note sets.

use chordify::{
    analyze_chord, pitches_to_names, ChordNamer, ChordRecognizer, InvalidPitchError, Method,
    RecognitionError, TemplateRecognizer,
};
use lazy_static::lazy_static;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A voicing and the name the heuristic gives it
#[derive(Debug, Clone)]
struct Fixture {
    pitches: Vec<u8>,
    name: &'static str,
}

fn fixture(pitches: &[u8], name: &'static str) -> Fixture {
    Fixture {
        pitches: pitches.to_vec(),
        name,
    }
}

lazy_static! {
    static ref FIXTURES: Vec<Fixture> = vec![
        fixture(&[60], "C"),
        fixture(&[60, 67], "C5"),
        fixture(&[62, 69], "D5"),
        fixture(&[60, 65], "C2"),
        fixture(&[60, 64, 67], "C"),
        fixture(&[62, 66, 69], "D"),
        fixture(&[64, 68, 71], "E"),
        fixture(&[60, 63, 67], "Cm"),
        fixture(&[69, 72, 76], "Am"),
        fixture(&[71, 74, 77], "Bdim"),
        fixture(&[60, 64, 68], "Caug"),
        fixture(&[67, 71, 74, 77], "G7"),
        fixture(&[60, 64, 67, 71], "Cmaj7"),
        fixture(&[69, 72, 76, 79], "Am7"),
        fixture(&[74, 77, 81, 84], "Dm7"),
        fixture(&[67, 71, 74, 77, 81], "G9"),
        fixture(&[60, 64, 67, 71, 74], "Cmaj79"),
        fixture(&[67, 72, 74], "Gsus411"),
        fixture(&[60, 62, 67], "Csus29"),
        fixture(&[60, 62, 64, 65, 67, 69, 71], "Cmaj713(7)"),
        fixture(&[60, 62, 64, 65, 67, 69, 72], "C13(7)"),
    ];
}

#[test]
fn test_fixture_voicings() {
    let namer = ChordNamer::new();
    let failures: Vec<String> = FIXTURES
        .iter()
        .filter_map(|f| {
            let got = namer.name_chord(&f.pitches).unwrap().chord_name;
            (got != f.name).then(|| format!("{:?}: expected {}, got {}", f.pitches, f.name, got))
        })
        .collect();

    assert!(failures.is_empty(), "{} fixtures failed:\n{}", failures.len(), failures.join("\n"));
}

/// Every 1-4 note subset of two octaves around middle C
fn generated_note_sets() -> Vec<Vec<u8>> {
    let range: Vec<u8> = (54..78).collect();
    let mut sets = vec![Vec::new()];
    for (i, &a) in range.iter().enumerate() {
        sets.push(vec![a]);
        for (j, &b) in range.iter().enumerate().skip(i + 1) {
            sets.push(vec![a, b]);
            for &c in range.iter().skip(j + 1).step_by(2) {
                sets.push(vec![a, b, c]);
                sets.push(vec![a, b, c, c + 10]);
            }
        }
    }
    sets.push((0..=127).collect());
    sets
}

#[test]
fn test_naming_is_total() {
    let namer = ChordNamer::new();
    for set in generated_note_sets() {
        let a = namer.name_chord(&set).unwrap();
        assert!(!a.chord_name.is_empty(), "{set:?}");
        assert!((0.0..=1.0).contains(&a.confidence), "{set:?}");
        assert_eq!(a.notes.len(), set.len());
    }
}

#[test]
fn test_naming_ignores_order_and_duplicates() {
    let namer = ChordNamer::new();
    let base = namer.name_chord(&[60, 64, 67]).unwrap().chord_name;
    for variant in [&[64, 60, 67][..], &[67, 64, 60], &[60, 64, 67, 67], &[60, 60, 64, 67, 64]] {
        assert_eq!(namer.name_chord(variant).unwrap().chord_name, base);
    }
    assert_eq!(base, "C");
}

#[test]
fn test_confidence_never_rises_with_more_notes() {
    let namer = ChordNamer::new();
    let confidences: Vec<f32> = (1..=12u8)
        .map(|n| namer.name_chord(&(60..60 + n).collect::<Vec<_>>()).unwrap().confidence)
        .collect();
    assert!(confidences.windows(2).all(|w| w[0] >= w[1]), "{confidences:?}");
}

#[test]
fn test_parallel_naming_matches_sequential() {
    let namer = ChordNamer::new();
    let sets = generated_note_sets();
    let sequential: Vec<_> = sets.iter().map(|s| namer.name_chord(s).unwrap()).collect();
    let parallel: Vec<_> = sets.par_iter().map(|s| namer.name_chord(s).unwrap()).collect();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_note_formatting() {
    assert_eq!(pitches_to_names(&[60, 64, 67]).unwrap(), ["C4", "E4", "G4"]);
    assert_eq!(pitches_to_names(&[72, 21]).unwrap(), ["A0", "C5"]);
}

#[test]
fn test_out_of_range_pitch() {
    assert_eq!(analyze_chord(&[60, 140]).unwrap_err(), InvalidPitchError { pitch: 140 });
    assert_eq!(
        analyze_chord(&[128]).unwrap_err().to_string(),
        "invalid MIDI pitch 128: expected 0..=127"
    );
}

/// Engine that counts calls and always fails
struct Flaky {
    calls: Arc<AtomicUsize>,
}

impl ChordRecognizer for Flaky {
    fn recognize(&self, _: &[u8]) -> Result<Option<String>, RecognitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RecognitionError::Unavailable("backend not loaded".into()))
    }
}

#[test]
fn test_failing_engine_falls_back() {
    let calls = Arc::new(AtomicUsize::new(0));
    let namer = ChordNamer::builder()
        .recognizer(Flaky { calls: calls.clone() })
        .build();

    let a = namer.name_chord(&[69, 72, 76]).unwrap();
    assert_eq!(a.chord_name, "Am");
    assert_eq!(a.method, Method::Heuristic);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_template_engine_path() {
    let namer = ChordNamer::builder().recognizer(TemplateRecognizer::new()).build();

    let power = namer.name_chord(&[60, 67]).unwrap();
    assert_eq!(power.chord_name, "C5");
    assert_eq!(power.method, Method::External);
    assert_eq!(power.confidence, 0.95);

    // first inversion: the template finds C, the heuristic reads E as root
    assert_eq!(namer.name_chord(&[64, 67, 72]).unwrap().chord_name, "C");
    assert_eq!(analyze_chord(&[64, 67, 72]).unwrap().chord_name, "Em");

    // nothing close enough: heuristic answers
    let cluster = namer.name_chord(&[60, 61, 62]).unwrap();
    assert_eq!(cluster.method, Method::Heuristic);
    assert_eq!(cluster.chord_name, "Csus29");
}
