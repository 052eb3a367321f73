//! MIDI wire types and conversion into engine messages.

/// Translate MIDI events into synth messages.
pub mod converter;
/// Decoded MIDI event type.
pub mod midi;

pub use converter::{midi_note_to_freq, midi_to_message, pitch_bend_to_cents};
pub use midi::MidiEvent;
