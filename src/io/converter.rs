use crate::{io::midi::MidiEvent, synth::message::SynthMessage};

/// Semitone span of the pitch wheel in each direction.
const PITCH_BEND_RANGE_SEMITONES: f32 = 2.0;

/// Convert a MIDI event on the given channel into an engine message.
/// Events on other channels, and event types the engine has no use
/// for, map to `None`.
pub fn midi_to_message(midi: MidiEvent, channel_filter: u8) -> Option<SynthMessage> {
    match midi {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } if channel == channel_filter => {
            // Per the MIDI spec, note-on with velocity 0 is a note-off.
            if velocity == 0 {
                Some(SynthMessage::NoteOff { note: key })
            } else {
                Some(SynthMessage::NoteOn {
                    note: key,
                    velocity,
                })
            }
        }
        MidiEvent::NoteOff { channel, key, .. } if channel == channel_filter => {
            Some(SynthMessage::NoteOff { note: key })
        }
        MidiEvent::PitchBend { channel, value } if channel == channel_filter => {
            Some(SynthMessage::PitchBend {
                cents: pitch_bend_to_cents(value),
            })
        }
        _ => None,
    }
}

/// MIDI note number to frequency in Hz. A4 = MIDI 69 = 440 Hz.
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// 14-bit pitch wheel position to a cent offset, ±200 cents full scale.
#[inline]
pub fn pitch_bend_to_cents(value: i16) -> f32 {
    let normalized = (value.clamp(-8192, 8191) as f32) / 8192.0;
    normalized * PITCH_BEND_RANGE_SEMITONES * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_is_440() {
        assert!((midi_note_to_freq(69) - 440.0).abs() < 1e-3);
        assert!((midi_note_to_freq(81) - 880.0).abs() < 1e-2);
        assert!((midi_note_to_freq(57) - 220.0).abs() < 1e-2);
    }

    #[test]
    fn channel_filter_drops_other_channels() {
        let event = MidiEvent::NoteOn {
            channel: 3,
            key: 60,
            velocity: 100,
        };
        assert!(midi_to_message(event, 0).is_none());
        assert!(matches!(
            midi_to_message(event, 3),
            Some(SynthMessage::NoteOn { note: 60, velocity: 100 })
        ));
    }

    #[test]
    fn zero_velocity_note_on_is_note_off() {
        let event = MidiEvent::NoteOn {
            channel: 0,
            key: 64,
            velocity: 0,
        };
        assert!(matches!(
            midi_to_message(event, 0),
            Some(SynthMessage::NoteOff { note: 64 })
        ));
    }

    #[test]
    fn pitch_bend_scales_to_cents() {
        assert_eq!(pitch_bend_to_cents(0), 0.0);
        assert!((pitch_bend_to_cents(8191) - 200.0).abs() < 0.1);
        assert!((pitch_bend_to_cents(-8192) + 200.0).abs() < 0.1);
    }

    #[test]
    fn control_change_is_dropped() {
        let event = MidiEvent::ControlChange {
            channel: 0,
            controller: 1,
            value: 64,
        };
        assert!(midi_to_message(event, 0).is_none());
    }
}
