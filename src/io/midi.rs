/// A decoded channel-voice MIDI event, as delivered by the host or a
/// hardware input thread. Only the events the engine reacts to are
/// modeled; anything else is dropped at the conversion step.
#[derive(Debug, Clone, Copy)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    /// 14-bit pitch wheel position, centered on 0 (range -8192..=8191).
    PitchBend { channel: u8, value: i16 },
    ControlChange { channel: u8, controller: u8, value: u8 },
}
