//! Walk through chord naming and progression analysis.
//!
//! Run with `RUST_LOG=chordify=debug cargo run --example usage` to see the
//! recognition events.

use chordify::{
    midi_to_chord_name, pitches_to_names, ChordNamer, ProgressionAnalyzer, TemplateRecognizer,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let namer = ChordNamer::new();

    println!("1) C major triad");
    let c_major = namer.name_chord(&[60, 64, 67])?;
    println!("   chord name: {}", c_major.chord_name);
    println!("   notes:      {}", c_major.notes.join(", "));
    println!("   confidence: {:.0}%", c_major.confidence * 100.0);
    println!("   method:     {}", c_major.method);

    println!("2) G dominant seventh");
    let g7 = namer.name_chord(&[67, 71, 74, 77])?;
    println!("   chord name: {} ({} notes)", g7.chord_name, g7.note_count);

    let analyzer = ProgressionAnalyzer::new(namer);

    println!("3) I-IV-V-I in C");
    let summary = analyzer.analyze(&[
        vec![60u8, 64, 67],
        vec![65, 69, 72],
        vec![67, 71, 74],
        vec![60, 64, 67],
    ])?;
    println!("   sequence:   {}", summary.chord_names.join(" -> "));
    println!("   unique:     {}", summary.unique_chords);
    println!("   complexity: {}/10", summary.complexity_score);
    for pattern in &summary.patterns {
        println!("   * {pattern}");
    }

    println!("4) Jazz progression");
    let jazz = analyzer.analyze(&[
        vec![60u8, 64, 67, 71],
        vec![69, 72, 76, 79],
        vec![74, 77, 81, 84],
        vec![67, 71, 74, 77],
    ])?;
    println!("   sequence:   {}", jazz.chord_names.join(" -> "));
    println!("   avg notes:  {}", jazz.average_notes_per_chord);
    println!("   complexity: {}/10", jazz.complexity_score);
    for pattern in &jazz.patterns {
        println!("   * {pattern}");
    }

    println!("5) Quick names");
    for chord in [[60u8, 63, 67], [62, 66, 69], [64, 68, 71]] {
        println!(
            "   {:8} <- {}",
            midi_to_chord_name(&chord)?,
            pitches_to_names(&chord)?.join(", ")
        );
    }

    println!("6) Template engine on inversions");
    let with_engine = ChordNamer::builder()
        .recognizer(TemplateRecognizer::new())
        .build();
    for chord in [[64u8, 67, 72], [69, 72, 77]] {
        let a = with_engine.name_chord(&chord)?;
        println!("   {:8} via {}", a.chord_name, a.method);
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
