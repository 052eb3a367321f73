//! Demonstrates voice allocation, stealing, and release - offline, no
//! audio device needed.
//!
//! Run with: cargo run --example polyphony_walkthrough

use polyvox_dsp::synth::message::NoteEvent;
use polyvox_dsp::synth::PolySynth;
use polyvox_dsp::MAX_BLOCK_SIZE;

fn on(note: u8) -> NoteEvent {
    NoteEvent {
        sample_offset: 0,
        note,
        velocity: 100,
        on: true,
    }
}

fn render(synth: &mut PolySynth, events: &[NoteEvent], frames: usize) -> f32 {
    let mut left = vec![0.0f32; frames];
    let mut right = vec![0.0f32; frames];
    {
        let mut out: [&mut [f32]; 2] = [&mut left, &mut right];
        synth.render_block(&mut out, events, frames);
    }
    left.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

fn main() {
    println!("=== Polyphony Walkthrough (Offline) ===\n");

    let sample_rate = 48_000.0;
    let max_voices = 4;
    let block_size = 256;

    let mut synth = PolySynth::new(max_voices);
    synth.prepare(sample_rate, MAX_BLOCK_SIZE, 2);
    println!("Created PolySynth with {} voices\n", synth.num_voices());

    // Play a C major chord (C4, E4, G4)
    println!("Playing C major chord: C4 (60), E4 (64), G4 (67)");
    let peak = render(&mut synth, &[on(60), on(64), on(67)], block_size);
    println!("  Active voices: {}", synth.active_voices());
    println!("  Peak amplitude: {peak:.3}\n");

    // Fill the pool
    println!("Adding 4th note: B4 (71)");
    let peak = render(&mut synth, &[on(71)], block_size);
    println!("  Active voices: {} (pool full)", synth.active_voices());
    println!("  Peak amplitude: {peak:.3}\n");

    // A 5th note steals the oldest voice
    println!("Adding 5th note: D5 (74) - steals the oldest voice (C4)");
    render(&mut synth, &[on(74)], block_size);
    println!("  Active voices: {}", synth.active_voices());
    println!("  C4 still sounding: {}", synth.is_note_active(60));
    println!("  D5 sounding: {}\n", synth.is_note_active(74));

    // Release everything and let the tails ring out
    println!("Releasing all notes...");
    synth.all_notes_off();
    for _ in 0..200 {
        render(&mut synth, &[], block_size);
    }
    println!("  Active voices after release: {}", synth.active_voices());

    println!("\n=== Pool rules ===");
    println!("- allocation prefers a free voice, else steals the oldest");
    println!("- note-off releases the most recently started duplicate");
    println!("- a voice returns to the pool when its release finishes");
}
