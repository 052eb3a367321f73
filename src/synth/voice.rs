use crate::dsp::envelope::Envelope;
use crate::dsp::filter::SVFilter;
use crate::dsp::oscillator::Oscillator;
use crate::io::converter::midi_note_to_freq;
use crate::params::Params;

/// Output channels each voice renders. The chain is duplicated per
/// channel so filter state never crosses between left and right.
pub const NUM_CHANNELS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // available for allocation
    Active,    // sounding, amplitude envelope in attack/decay/sustain
    Releasing, // key released, amplitude envelope in release
}

/*
One polyphonic voice: the full signal chain for a single note.

    osc1 ─┐
          ├─(+)──► filter ──(× amp env × velocity)──► output
    osc2 ─┘           ▲
                      │ cutoff × mod env
                 mod envelope

Both oscillator slots and the filter exist once per output channel;
the two envelopes are shared across channels and advanced exactly once
per sample so left and right stay phase-locked. The modulation
envelope's level scales the filter cutoff every sample, which is what
turns a static low-pass into the classic swept-filter attack.

A voice is constructed once, lives in the pool forever, and is recycled
by `start_note`. It frees itself when the amplitude envelope finishes
its release.
*/
pub struct Voice {
    osc1: [Oscillator; NUM_CHANNELS],
    osc2: [Oscillator; NUM_CHANNELS],
    filter: [SVFilter; NUM_CHANNELS],
    amp_env: Envelope,
    mod_env: Envelope,

    state: VoiceState,
    note: u8,
    velocity_gain: f32, // velocity mapped to a linear gain scalar
    age: u64,           // allocation stamp, used by the steal policy
}

impl Voice {
    pub fn new() -> Self {
        Self {
            osc1: [
                Oscillator::new(crate::dsp::Waveform::Sine),
                Oscillator::new(crate::dsp::Waveform::Sine),
            ],
            osc2: [
                Oscillator::new(crate::dsp::Waveform::Sine),
                Oscillator::new(crate::dsp::Waveform::Sine),
            ],
            filter: [
                SVFilter::new(crate::dsp::FilterMode::LowPass),
                SVFilter::new(crate::dsp::FilterMode::LowPass),
            ],
            amp_env: Envelope::new(),
            mod_env: Envelope::new(),
            state: VoiceState::Free,
            note: 0,
            velocity_gain: 0.0,
            age: 0,
        }
    }

    /// Prime every component with the session sample rate and return
    /// the voice to a silent, free state. Called from the pool's
    /// `prepare`, before any rendering.
    pub fn prepare(&mut self, sample_rate: f32) {
        for ch in 0..NUM_CHANNELS {
            self.osc1[ch].set_sample_rate(sample_rate);
            self.osc2[ch].set_sample_rate(sample_rate);
            self.filter[ch].set_sample_rate(sample_rate);
        }
        self.amp_env.set_sample_rate(sample_rate);
        self.mod_env.set_sample_rate(sample_rate);
        self.free();
    }

    /// Capability check for the dispatcher. Every voice renders the
    /// single fixed chain, so any note is playable; kept as a method so
    /// the allocation loop has a seam if specialized voices appear.
    pub fn can_play(&self, _note: u8) -> bool {
        true
    }

    /// Claim this voice for a note: set the equal-tempered base
    /// frequency on all oscillators, map velocity to gain, trigger both
    /// envelopes, and clear phase/filter state so the onset is clean.
    pub fn start_note(&mut self, note: u8, velocity: u8, bend_cents: f32, age: u64) {
        self.note = note;
        self.velocity_gain = velocity as f32 / 127.0;
        self.age = age;
        self.state = VoiceState::Active;

        let frequency = bent_frequency(note, bend_cents);
        for ch in 0..NUM_CHANNELS {
            self.osc1[ch].set_frequency(frequency);
            self.osc2[ch].set_frequency(frequency);
            self.osc1[ch].reset_phase();
            self.osc2[ch].reset_phase();
            self.filter[ch].reset();
        }

        self.amp_env.note_on();
        self.mod_env.note_on();
    }

    /// Release the note. With `allow_tail_off` the voice keeps sounding
    /// through the amplitude envelope's release; without it the voice
    /// is silenced and freed immediately.
    pub fn stop_note(&mut self, allow_tail_off: bool) {
        if self.state == VoiceState::Free {
            return;
        }
        if allow_tail_off {
            self.amp_env.note_off();
            self.mod_env.note_off();
            self.state = VoiceState::Releasing;
        } else {
            self.free();
        }
    }

    /// Apply the shared per-block parameter snapshot. Called by the
    /// dispatcher exactly once per block, never mid-render.
    pub fn apply_params(&mut self, params: &Params) {
        for ch in 0..NUM_CHANNELS {
            let o1 = &mut self.osc1[ch];
            o1.set_waveform(params.osc1.waveform);
            o1.set_gain_db(params.osc1.gain_db);
            o1.set_pitch(params.osc1.pitch);
            o1.set_fm_params(params.osc1.fm_freq, params.osc1.fm_depth);

            let o2 = &mut self.osc2[ch];
            o2.set_waveform(params.osc2.waveform);
            o2.set_gain_db(params.osc2.gain_db);
            o2.set_pitch(params.osc2.pitch);
            o2.set_fm_params(params.osc2.fm_freq, params.osc2.fm_depth);

            self.filter[ch].set_params(
                params.filter.mode,
                params.filter.cutoff_hz,
                params.filter.resonance,
            );
        }

        self.amp_env.set_adsr(
            params.amp_env.attack,
            params.amp_env.decay,
            params.amp_env.sustain,
            params.amp_env.release,
        );
        self.mod_env.set_adsr(
            params.mod_env.attack,
            params.mod_env.decay,
            params.mod_env.sustain,
            params.mod_env.release,
        );
    }

    /// Retune a sounding voice after a pitch wheel move.
    pub fn set_pitch_bend(&mut self, bend_cents: f32) {
        if self.state == VoiceState::Free {
            return;
        }
        let frequency = bent_frequency(self.note, bend_cents);
        for ch in 0..NUM_CHANNELS {
            self.osc1[ch].set_frequency(frequency);
            self.osc2[ch].set_frequency(frequency);
        }
    }

    /// Render `num_samples` starting at `start_sample`, accumulating
    /// into the planar output buffers. Both envelopes advance once per
    /// sample; the modulation level scales each channel's filter cutoff
    /// before the summed oscillators pass through it.
    pub fn render_block(&mut self, out: &mut [&mut [f32]], start_sample: usize, num_samples: usize) {
        if self.state == VoiceState::Free {
            return;
        }

        let channels = out.len().min(NUM_CHANNELS);
        for i in 0..num_samples {
            let amp = self.amp_env.next_sample() * self.velocity_gain;
            let modulation = self.mod_env.next_sample();

            for (ch, buffer) in out.iter_mut().take(channels).enumerate() {
                let raw = self.osc1[ch].next_sample() + self.osc2[ch].next_sample();
                self.filter[ch].set_cutoff_mod(modulation);
                let shaped = self.filter[ch].process(raw) * amp;
                buffer[start_sample + i] += shaped;
            }
        }

        // The amplitude envelope reaching Idle after release is what
        // returns the voice to the pool.
        if self.state == VoiceState::Releasing && self.amp_env.is_finished() {
            self.free();
        }
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.note = 0;
        self.velocity_gain = 0.0;
        self.amp_env.reset();
        self.mod_env.reset();
        for filter in &mut self.filter {
            filter.reset();
        }
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Releasing)
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn amp_level(&self) -> f32 {
        self.amp_env.level()
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn bent_frequency(note: u8, bend_cents: f32) -> f32 {
    midi_note_to_freq(note) * 2.0_f32.powf(bend_cents / 1200.0)
}
