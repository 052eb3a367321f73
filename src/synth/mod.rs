// Purpose: voice lifecycle, polyphony, and block rendering.
// This layer sits above the dsp primitives and owns all realtime state.

pub mod message;
pub mod poly;
pub mod voice;

pub use message::{NoteEvent, SynthMessage};
pub use poly::PolySynth;
pub use voice::Voice;

#[cfg(feature = "rtrb")]
pub use poly::SynthHandle;
