//! The shared parameter snapshot and its update protocol.
//!
//! All synthesis parameters live in one plain [`Params`] struct owned by
//! the dispatcher. Voices receive a reference to it exactly once per
//! audio block and never mutate it; a control thread edits parameters by
//! pushing [`ParamChange`] messages through the wait-free queue, which
//! the audio thread drains at block start. The result is the per-block
//! snapshot contract: within one block every voice sees the same values,
//! and no value changes mid-block.
//!
//! Every setter clamps to the documented range. Out-of-range values are
//! never rejected and non-finite values are ignored outright, so a
//! misbehaving host cannot push the render path into NaN territory.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::{FilterMode, Waveform};
use crate::dsp::filter::{MAX_CUTOFF_HZ, MAX_RESONANCE, MIN_CUTOFF_HZ, MIN_RESONANCE};

pub const MIN_GAIN_DB: f32 = -40.0;
pub const MAX_GAIN_DB: f32 = 0.2;
pub const MIN_ADSR_SECONDS: f32 = 0.01;
pub const MAX_ADSR_SECONDS: f32 = 3.0;
pub const MAX_PITCH_SEMITONES: f32 = 64.0;
pub const MAX_FM_HZ: f32 = 1_000.0;
pub const MAX_FM_DEPTH: f32 = 1_000.0;

/// Clamp a host-supplied value, ignoring NaN and infinities.
#[inline]
fn sanitize(value: f32, current: f32, min: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        current
    }
}

/// Which oscillator slot a change addresses.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscSlot {
    Osc1,
    Osc2,
}

/// Which envelope bank a change addresses.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvTarget {
    /// Shapes the voice amplitude.
    Amp,
    /// Sweeps the filter cutoff.
    Mod,
}

/// One oscillator slot's timbre parameters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscParams {
    pub waveform: Waveform,
    /// Output gain in dB, [-40.0, 0.2].
    pub gain_db: f32,
    /// Pitch offset in semitones, [-64, 64].
    pub pitch: f32,
    /// FM modulator frequency in Hz, [0, 1000].
    pub fm_freq: f32,
    /// FM modulator depth, [0, 1000].
    pub fm_depth: f32,
}

/// One envelope bank's ADSR shape.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParams {
    /// Seconds, [0.01, 3.0].
    pub attack: f32,
    /// Seconds, [0.01, 3.0].
    pub decay: f32,
    /// Level, [0.0, 1.0].
    pub sustain: f32,
    /// Seconds, [0.01, 3.0].
    pub release: f32,
}

/// Filter response and placement.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    pub mode: FilterMode,
    /// Hz, [20, 20000]; additionally held below Nyquist at render time.
    pub cutoff_hz: f32,
    /// Q, [1, 10].
    pub resonance: f32,
}

/// The complete per-block parameter snapshot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    pub osc1: OscParams,
    pub osc2: OscParams,
    pub amp_env: AdsrParams,
    pub mod_env: AdsrParams,
    pub filter: FilterParams,
    /// Post-sum output scale, [0.0, 1.0].
    pub master_gain: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            osc1: OscParams {
                waveform: Waveform::Sine,
                gain_db: 0.0,
                pitch: 0.0,
                fm_freq: 5.0,
                fm_depth: 0.0,
            },
            osc2: OscParams {
                waveform: Waveform::Sine,
                gain_db: 0.0,
                pitch: 0.0,
                fm_freq: 0.0,
                fm_depth: 0.0,
            },
            amp_env: AdsrParams {
                attack: 0.1,
                decay: 0.1,
                sustain: 1.0,
                release: 0.4,
            },
            mod_env: AdsrParams {
                attack: 0.1,
                decay: 0.1,
                sustain: 1.0,
                release: 0.4,
            },
            filter: FilterParams {
                mode: FilterMode::LowPass,
                cutoff_hz: MAX_CUTOFF_HZ,
                resonance: MIN_RESONANCE,
            },
            master_gain: 0.5,
        }
    }
}

/// A single-field parameter update, sent from the control thread and
/// applied by the audio thread at the next block boundary.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamChange {
    /// Waveform by host index {0, 1, 2}; unknown indices fall back to sine.
    Waveform(OscSlot, u8),
    GainDb(OscSlot, f32),
    Pitch(OscSlot, f32),
    FmFreq(OscSlot, f32),
    FmDepth(OscSlot, f32),
    Adsr(EnvTarget, AdsrParams),
    /// Filter mode by host index {0, 1, 2}; unknown indices fall back
    /// to low-pass.
    FilterMode(u8),
    FilterCutoff(f32),
    FilterResonance(f32),
    MasterGain(f32),
}

impl Params {
    /// Apply one change, clamping to the documented ranges.
    pub fn apply(&mut self, change: ParamChange) {
        match change {
            ParamChange::Waveform(slot, index) => {
                self.osc_mut(slot).waveform = Waveform::from_index(index);
            }
            ParamChange::GainDb(slot, db) => {
                let osc = self.osc_mut(slot);
                osc.gain_db = sanitize(db, osc.gain_db, MIN_GAIN_DB, MAX_GAIN_DB);
            }
            ParamChange::Pitch(slot, semitones) => {
                let osc = self.osc_mut(slot);
                osc.pitch = sanitize(
                    semitones,
                    osc.pitch,
                    -MAX_PITCH_SEMITONES,
                    MAX_PITCH_SEMITONES,
                );
            }
            ParamChange::FmFreq(slot, hz) => {
                let osc = self.osc_mut(slot);
                osc.fm_freq = sanitize(hz, osc.fm_freq, 0.0, MAX_FM_HZ);
            }
            ParamChange::FmDepth(slot, depth) => {
                let osc = self.osc_mut(slot);
                osc.fm_depth = sanitize(depth, osc.fm_depth, 0.0, MAX_FM_DEPTH);
            }
            ParamChange::Adsr(target, adsr) => {
                let bank = match target {
                    EnvTarget::Amp => &mut self.amp_env,
                    EnvTarget::Mod => &mut self.mod_env,
                };
                bank.attack = sanitize(adsr.attack, bank.attack, MIN_ADSR_SECONDS, MAX_ADSR_SECONDS);
                bank.decay = sanitize(adsr.decay, bank.decay, MIN_ADSR_SECONDS, MAX_ADSR_SECONDS);
                bank.sustain = sanitize(adsr.sustain, bank.sustain, 0.0, 1.0);
                bank.release =
                    sanitize(adsr.release, bank.release, MIN_ADSR_SECONDS, MAX_ADSR_SECONDS);
            }
            ParamChange::FilterMode(index) => {
                self.filter.mode = FilterMode::from_index(index);
            }
            ParamChange::FilterCutoff(hz) => {
                self.filter.cutoff_hz =
                    sanitize(hz, self.filter.cutoff_hz, MIN_CUTOFF_HZ, MAX_CUTOFF_HZ);
            }
            ParamChange::FilterResonance(q) => {
                self.filter.resonance =
                    sanitize(q, self.filter.resonance, MIN_RESONANCE, MAX_RESONANCE);
            }
            ParamChange::MasterGain(gain) => {
                self.master_gain = sanitize(gain, self.master_gain, 0.0, 1.0);
            }
        }
    }

    fn osc_mut(&mut self, slot: OscSlot) -> &mut OscParams {
        match slot {
            OscSlot::Osc1 => &mut self.osc1,
            OscSlot::Osc2 => &mut self.osc2,
        }
    }
}
