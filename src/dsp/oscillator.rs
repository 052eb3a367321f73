use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase-Accumulator Oscillator
============================

The oscillator is the sound source of the voice chain. It tracks its
position inside one waveform cycle with a normalized phase and converts
that phase into a sample value each tick.

Vocabulary
----------

  phase       Position within the current cycle, normalized to [0, 1).
              0.0 is the start of the cycle, 0.5 is halfway through.
              Advancing past 1.0 wraps back around - that wrap IS the
              periodicity of the waveform.

  increment   How far the phase moves per sample:

                  increment = frequency / sample_rate

              At 440 Hz and 48 kHz, the phase advances by ~0.00917 per
              sample, completing one cycle every ~109 samples.

  pitch offset  A detune in semitones applied to the base frequency.
              Frequency is exponential in pitch: +12 semitones doubles
              the frequency, so the conversion is

                  detuned = base * 2^(semitones / 12)

  FM          Frequency modulation. A second, internal sine oscillator
              (the modulator) wiggles the main frequency:

                  f(t) = detuned + depth * sin(tau * fm_phase)

              Small depths give vibrato; audio-rate modulator
              frequencies with large depths generate sidebands and the
              classic metallic FM timbres.

  gain        Output scale, set in decibels and stored as a linear
              factor: linear = 10^(dB / 20).

Waveforms
---------

  Sine     sin(tau * phase)          pure tone, fundamental only
  Saw      2 * phase - 1             every harmonic, bright and buzzy
  Square   sign(phase - 0.5)         odd harmonics, hollow

These are the "naive" shapes: cheap, branch-free, and adequate below
Nyquist/2 for musical use. Band-limited variants (polyBLEP, wavetables)
trade CPU for less aliasing and can be swapped in behind `next_sample`
without touching callers.

Sampling order
--------------

`next_sample` returns the value at the CURRENT phase, then advances.
Sample n of a sine at frequency f is therefore sin(tau * f * n / sr),
with sample 0 exactly 0.0 - which is also what makes note starts
click-free after `reset_phase`.

An oscillator with no sample rate (never prepared) fails closed and
emits silence rather than dividing by zero.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Saw,
    Square,
}

impl Waveform {
    /// Decode a host-facing waveform index. Unknown indices fail closed
    /// to `Sine` rather than erroring.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Waveform::Saw,
            2 => Waveform::Square,
            _ => Waveform::Sine,
        }
    }
}

/// Smallest effective frequency after pitch and FM are combined.
/// Keeps the phase increment strictly positive.
const MIN_FREQUENCY: f32 = 0.01;

pub struct Oscillator {
    waveform: Waveform,
    phase: f32,    // main cycle position, always in [0, 1)
    fm_phase: f32, // modulator cycle position, always in [0, 1)
    sample_rate: f32,
    base_frequency: f32,
    pitch_ratio: f32, // cached 2^(semitones / 12)
    fm_frequency: f32,
    fm_depth: f32,
    gain: f32, // linear, from decibels
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            fm_phase: 0.0,
            sample_rate: 0.0,
            base_frequency: 440.0,
            pitch_ratio: 1.0,
            fm_frequency: 0.0,
            fm_depth: 0.0,
            gain: 1.0,
        }
    }

    /// Set the sample rate. Must be called before rendering; an
    /// oscillator without a sample rate emits silence.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate.is_finite() && sample_rate > 0.0 {
            self.sample_rate = sample_rate;
        }
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Set the base frequency in Hz (typically from a MIDI note).
    pub fn set_frequency(&mut self, frequency: f32) {
        if frequency.is_finite() {
            self.base_frequency = frequency.max(MIN_FREQUENCY);
        }
    }

    /// Set the pitch offset in semitones, clamped to [-64, 64].
    pub fn set_pitch(&mut self, semitones: f32) {
        if semitones.is_finite() {
            let semitones = semitones.clamp(-64.0, 64.0);
            self.pitch_ratio = 2.0_f32.powf(semitones / 12.0);
        }
    }

    /// Set FM modulator frequency [0, 1000] Hz and depth [0, 1000].
    pub fn set_fm_params(&mut self, frequency: f32, depth: f32) {
        if frequency.is_finite() {
            self.fm_frequency = frequency.clamp(0.0, 1000.0);
        }
        if depth.is_finite() {
            self.fm_depth = depth.clamp(0.0, 1000.0);
        }
    }

    /// Set the output gain in decibels, clamped to [-40.0, 0.2] dB.
    pub fn set_gain_db(&mut self, gain_db: f32) {
        if gain_db.is_finite() {
            let gain_db = gain_db.clamp(-40.0, 0.2);
            self.gain = 10.0_f32.powf(gain_db / 20.0);
        }
    }

    /// Rewind both phase accumulators for a click-free note start.
    pub fn reset_phase(&mut self) {
        self.phase = 0.0;
        self.fm_phase = 0.0;
    }

    /// Current phase, exposed for tests and diagnostics.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Produce one sample and advance the phase accumulators.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.sample_rate <= 0.0 {
            return 0.0;
        }

        let value = match self.waveform {
            Waveform::Sine => (TAU * self.phase).sin(),
            Waveform::Saw => 2.0 * self.phase - 1.0,
            Waveform::Square => {
                if self.phase < 0.5 {
                    -1.0
                } else {
                    1.0
                }
            }
        };

        // Effective frequency: detuned base plus the FM modulator's
        // instantaneous contribution, clamped strictly positive.
        let modulation = self.fm_depth * (TAU * self.fm_phase).sin();
        let frequency = (self.base_frequency * self.pitch_ratio + modulation).max(MIN_FREQUENCY);

        self.fm_phase += self.fm_frequency / self.sample_rate;
        self.fm_phase -= self.fm_phase.floor();

        self.phase += frequency / self.sample_rate;
        self.phase -= self.phase.floor();

        value * self.gain
    }
}
