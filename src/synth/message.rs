#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// Control-thread message, drained by the audio thread at block start.
#[derive(Debug, Copy, Clone)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    /// Global pitch wheel offset in cents.
    PitchBend { cents: f32 },
    AllNotesOff,
}

/// A host-delivered note event inside one audio block. The host hands
/// the engine a slice of these, ordered by `sample_offset`; dispatch is
/// block-granular (all events are applied before the block renders).
#[derive(Debug, Copy, Clone)]
pub struct NoteEvent {
    pub sample_offset: usize,
    pub note: u8,
    pub velocity: u8,
    pub on: bool,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}
