//! Low-level DSP primitives used by the voice layer.
//!
//! These components are allocation-free and realtime-safe, making them safe
//! to embed directly inside voice structs. They intentionally stay focused
//! on the signal-processing math so the synth layer can own orchestration,
//! note dispatch, and parameter fan-out.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// State-variable filter with low/band/high-pass responses.
pub mod filter;
/// Phase-accumulator oscillator with pitch offset and FM.
pub mod oscillator;

pub use envelope::EnvelopeStage;
pub use filter::FilterMode;
pub use oscillator::Waveform;
