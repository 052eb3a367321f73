use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
State-Variable Filter (TPT topology)
====================================

| mode      | passes          | rejects        |
| --------- | --------------- | -------------- |
| low-pass  | below cutoff    | above cutoff   |
| band-pass | around cutoff   | both sides     |
| high-pass | above cutoff    | below cutoff   |

The SVF computes all three responses from the same two integrator
states, so switching the mode is just picking a different output - no
state is lost and no transient is introduced.

Coefficients
------------

    g = tan(pi * cutoff / sample_rate)      frequency warp
    k = 1 / Q                               damping, Q in [1, 10]

The tan() prewarp maps the analog cutoff onto the digital frequency
axis; with cutoff clamped below Nyquist the argument stays inside
(0, pi/2) where tan is finite and positive, and with k > 0 the topology
is unconditionally stable - the poles cannot leave the unit circle for
any parameter combination we admit.

Coefficients are cached and recomputed only when cutoff, resonance, or
the modulation multiplier actually change. That matters here because
the cutoff is scaled per sample by the modulation envelope: during a
sweep the tan() runs every sample, but once the envelope settles on its
sustain level the filter runs coefficient-free.

The two integrator states persist across blocks for continuity and are
reset when a voice is recycled to a new note.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    LowPass,
    BandPass,
    HighPass,
}

impl FilterMode {
    /// Decode a host-facing mode index. Unknown indices fail closed to
    /// `LowPass`.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => FilterMode::BandPass,
            2 => FilterMode::HighPass,
            _ => FilterMode::LowPass,
        }
    }
}

pub const MIN_CUTOFF_HZ: f32 = 20.0;
pub const MAX_CUTOFF_HZ: f32 = 20_000.0;
pub const MIN_RESONANCE: f32 = 1.0;
pub const MAX_RESONANCE: f32 = 10.0;

pub struct SVFilter {
    mode: FilterMode,
    cutoff_hz: f32,  // base cutoff, clamped [20, 20000]
    resonance: f32,  // Q, clamped [1, 10]
    cutoff_mod: f32, // multiplier from the modulation envelope
    sample_rate: f32,

    // Cached coefficients, rebuilt lazily when parameters change
    g: f32,
    k: f32,
    dirty: bool,

    // Integrator memories
    ic1eq: f32,
    ic2eq: f32,
}

impl SVFilter {
    pub fn new(mode: FilterMode) -> Self {
        Self {
            mode,
            cutoff_hz: MAX_CUTOFF_HZ,
            resonance: MIN_RESONANCE,
            cutoff_mod: 1.0,
            sample_rate: 0.0,
            g: 0.0,
            k: 1.0,
            dirty: true,
            ic1eq: 0.0,
            ic2eq: 0.0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate.is_finite() && sample_rate > 0.0 && sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.dirty = true;
        }
    }

    /// Update response type, cutoff, and resonance. Values are clamped
    /// to the stable range; coefficients are rebuilt on the next
    /// `process` call only if something actually changed.
    pub fn set_params(&mut self, mode: FilterMode, cutoff_hz: f32, resonance: f32) {
        self.mode = mode;
        if cutoff_hz.is_finite() {
            let cutoff_hz = cutoff_hz.clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_HZ);
            if cutoff_hz != self.cutoff_hz {
                self.cutoff_hz = cutoff_hz;
                self.dirty = true;
            }
        }
        if resonance.is_finite() {
            let resonance = resonance.clamp(MIN_RESONANCE, MAX_RESONANCE);
            if resonance != self.resonance {
                self.resonance = resonance;
                self.dirty = true;
            }
        }
    }

    /// Scale the cutoff by the modulation envelope's current level.
    /// Called once per sample by the voice; the effective cutoff is
    /// re-clamped before the coefficients are rebuilt.
    #[inline]
    pub fn set_cutoff_mod(&mut self, modulation: f32) {
        if modulation.is_finite() && modulation != self.cutoff_mod {
            self.cutoff_mod = modulation;
            self.dirty = true;
        }
    }

    /// Clear the integrator state. Called on voice reuse so the new
    /// note does not inherit the previous note's filter tail.
    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    fn update_coefficients(&mut self) {
        // Keep the warped frequency inside (0, pi/2): below Nyquist
        // with margin, and never below the audible floor. The Nyquist
        // cap is applied after the floor so a degenerate sample rate
        // cannot invert the clamp bounds.
        let effective = (self.cutoff_hz * self.cutoff_mod)
            .clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_HZ)
            .min(self.sample_rate * 0.49)
            .max(1.0);
        self.g = (PI * effective / self.sample_rate).tan();
        self.k = 1.0 / self.resonance;
        self.dirty = false;
    }

    /// Run one filter step. Unprepared filters pass the input through.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        if self.sample_rate <= 0.0 {
            return sample;
        }
        if self.dirty {
            self.update_coefficients();
        }

        let h = 1.0 / (1.0 + self.g * (self.g + self.k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + self.g * v3);
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        match self.mode {
            FilterMode::LowPass => v2,
            FilterMode::BandPass => v1,
            FilterMode::HighPass => sample - self.k * v1 - v2,
        }
    }
}
