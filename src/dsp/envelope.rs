use crate::MIN_TIME;

/*
ADSR Envelope Generator
=======================

A four-stage level generator that shapes amplitude (or any other
parameter) over the lifetime of a note.

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release

Stage machine: Idle → Attack → Decay → Sustain → Release → Idle.
Idle is both the initial and the terminal stage; a finished envelope is
re-armed by the next `note_on`, so a voice can be recycled forever.

Two behaviors distinguish this implementation from the textbook version:

Retrigger from the current level
--------------------------------

`note_on` does NOT reset the level to zero. If a note is retriggered
while the envelope is mid-release, the attack ramps from wherever the
level currently sits up to 1.0. A hard reset would produce an audible
click (an instantaneous level discontinuity); ramping from the current
value keeps retriggers and legato replay glitch-free. `note_off`
likewise captures the current level as the release origin, so releasing
during the attack never jumps.

Progress-fraction ramps
-----------------------

Each ramp stage tracks a normalized progress fraction instead of a
sample countdown:

    progress += 1.0 / (stage_seconds * sample_rate)     per sample
    level     = interpolate(start, target, progress)

Durations may be updated at any block boundary (hosts automate them).
Because position within the stage is a fraction, a new duration simply
changes the rate for the REMAINDER of the stage - the ramp stretches or
compresses without a discontinuity, and re-sending identical values is
bit-exact idempotent.

Zero or negative durations are invalid; they are clamped to MIN_TIME so
the per-sample division can never blow up.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,    // no output, voice may be recycled
    Attack,  // ramping current level → 1.0
    Decay,   // ramping 1.0 → sustain level
    Sustain, // holding until note_off
    Release, // ramping captured level → 0.0
}

pub struct Envelope {
    // Shape parameters, updated once per block
    attack_time: f32,   // seconds, > 0
    decay_time: f32,    // seconds, > 0
    sustain_level: f32, // level to hold, in [0, 1]
    release_time: f32,  // seconds, > 0

    // Runtime state
    stage: EnvelopeStage,
    level: f32,    // current output, in [0, 1]
    progress: f32, // fraction through the current ramp stage, in [0, 1]

    // Ramp origins captured at the stage transition
    attack_start_level: f32,
    release_start_level: f32,

    sample_rate: f32,
}

impl Envelope {
    pub fn new() -> Self {
        Self {
            attack_time: 0.1,
            decay_time: 0.1,
            sustain_level: 1.0,
            release_time: 0.4,
            stage: EnvelopeStage::Idle,
            level: 0.0,
            progress: 0.0,
            attack_start_level: 0.0,
            release_start_level: 0.0,
            sample_rate: 0.0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate.is_finite() && sample_rate > 0.0 {
            self.sample_rate = sample_rate;
        }
    }

    /// Update the ADSR shape. Applied at block boundaries; a running
    /// stage keeps its fractional position, so the remainder of the ramp
    /// stretches or compresses to the new duration.
    pub fn set_adsr(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        if attack.is_finite() {
            self.attack_time = attack.max(MIN_TIME);
        }
        if decay.is_finite() {
            self.decay_time = decay.max(MIN_TIME);
        }
        if sustain.is_finite() {
            self.sustain_level = sustain.clamp(0.0, 1.0);
        }
        if release.is_finite() {
            self.release_time = release.max(MIN_TIME);
        }
    }

    /// Gate high: enter Attack from the CURRENT level (no reset to zero,
    /// so retriggering mid-release never clicks).
    pub fn note_on(&mut self) {
        self.attack_start_level = self.level;
        self.progress = 0.0;
        self.stage = EnvelopeStage::Attack;
    }

    /// Gate low: enter Release from the current level. A no-op while
    /// Idle.
    pub fn note_off(&mut self) {
        if self.stage == EnvelopeStage::Idle {
            return;
        }
        self.release_start_level = self.level;
        self.progress = 0.0;
        self.stage = EnvelopeStage::Release;
    }

    /// Advance one sample period and return the new level.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.sample_rate <= 0.0 {
            return 0.0;
        }

        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }

            EnvelopeStage::Attack => {
                self.progress += 1.0 / (self.attack_time * self.sample_rate);
                if self.progress >= 1.0 {
                    self.level = 1.0;
                    self.progress = 0.0;
                    self.stage = EnvelopeStage::Decay;
                } else {
                    self.level =
                        self.attack_start_level + (1.0 - self.attack_start_level) * self.progress;
                }
            }

            EnvelopeStage::Decay => {
                self.progress += 1.0 / (self.decay_time * self.sample_rate);
                if self.progress >= 1.0 {
                    self.level = self.sustain_level;
                    self.progress = 0.0;
                    self.stage = EnvelopeStage::Sustain;
                } else {
                    self.level = 1.0 - (1.0 - self.sustain_level) * self.progress;
                }
            }

            EnvelopeStage::Sustain => {
                self.level = self.sustain_level;
            }

            EnvelopeStage::Release => {
                self.progress += 1.0 / (self.release_time * self.sample_rate);
                if self.progress >= 1.0 {
                    self.level = 0.0;
                    self.progress = 0.0;
                    self.stage = EnvelopeStage::Idle;
                } else {
                    self.level = self.release_start_level * (1.0 - self.progress);
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// True once the release has completed (or the envelope never ran).
    /// The voice pool uses this to recycle voices.
    pub fn is_finished(&self) -> bool {
        self.stage == EnvelopeStage::Idle
    }

    /// True while the envelope is producing output (any non-Idle stage).
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    /// Hard reset to Idle. Used when a voice is silenced without a tail.
    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
        self.progress = 0.0;
        self.attack_start_level = 0.0;
        self.release_start_level = 0.0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}
