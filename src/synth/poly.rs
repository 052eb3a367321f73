#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use crate::params::{ParamChange, Params};
#[cfg(feature = "rtrb")]
use crate::synth::message::MessageReceiver;
use crate::synth::message::{NoteEvent, SynthMessage};
use crate::synth::voice::{Voice, NUM_CHANNELS};

/*
Voice Pool and Dispatcher
=========================

PolySynth owns a fixed set of voices, created once and recycled forever.
Nothing is added or removed after construction; notes only claim and
release voices. That, plus the wait-free control queues, is what keeps
the render path free of allocation and locking.

Per block, in order:

  1. Drain parameter changes from the control queue into the owned
     `Params` snapshot. After this point the snapshot is frozen for the
     whole block - every voice reads the same values.
  2. Drain queued note messages, then dispatch the host's note events
     (already ordered by sample offset; dispatch is block-granular).
  3. Fan the snapshot out to every voice.
  4. Render every active voice additively into the output, then apply
     the master gain.

Voice stealing
--------------

Allocation prefers a free voice. When the pool is exhausted, the voice
with the SMALLEST age stamp - the one sounding longest - is restarted
with the new note. Ages come from a counter incremented per note-on, so
two notes arriving in the same block still steal deterministically.
`note_off` goes the other way: among voices sounding that note, the one
with the LARGEST stamp (most recently started) is released first.

Stealing guarantees note-on never fails: an N-voice pool hit with N+1
notes keeps exactly N voices active and the newest note always sounds.
*/

#[cfg(feature = "rtrb")]
const NOTE_QUEUE_SIZE: usize = 256;
#[cfg(feature = "rtrb")]
const PARAM_QUEUE_SIZE: usize = 256;

pub struct PolySynth {
    voices: Vec<Voice>,
    params: Params,
    bend_cents: f32,
    age_counter: u64,
    sample_rate: f32,
    max_block_size: usize,
    num_channels: usize,
    prepared: bool,
    #[cfg(feature = "rtrb")]
    note_rx: Option<Consumer<SynthMessage>>,
    #[cfg(feature = "rtrb")]
    param_rx: Option<Consumer<ParamChange>>,
}

/// Control-thread side of a `PolySynth` built with `with_handle`.
/// Sends are wait-free; messages land at the next block boundary. A
/// full queue drops the message rather than blocking the sender.
#[cfg(feature = "rtrb")]
pub struct SynthHandle {
    notes: Producer<SynthMessage>,
    params: Producer<ParamChange>,
}

#[cfg(feature = "rtrb")]
impl SynthHandle {
    pub fn note_on(&mut self, note: u8, velocity: u8) {
        let _ = self.notes.push(SynthMessage::NoteOn { note, velocity });
    }

    pub fn note_off(&mut self, note: u8) {
        let _ = self.notes.push(SynthMessage::NoteOff { note });
    }

    pub fn pitch_bend(&mut self, cents: f32) {
        let _ = self.notes.push(SynthMessage::PitchBend { cents });
    }

    pub fn all_notes_off(&mut self) {
        let _ = self.notes.push(SynthMessage::AllNotesOff);
    }

    pub fn send(&mut self, message: SynthMessage) {
        let _ = self.notes.push(message);
    }

    pub fn set(&mut self, change: ParamChange) {
        let _ = self.params.push(change);
    }
}

impl PolySynth {
    /// Build a pool of `max_voices` voices (at least one) for
    /// single-threaded hosts that drive the engine directly.
    pub fn new(max_voices: usize) -> Self {
        let voices = (0..max_voices.max(1)).map(|_| Voice::new()).collect();
        Self {
            voices,
            params: Params::default(),
            bend_cents: 0.0,
            age_counter: 0,
            sample_rate: 0.0,
            max_block_size: 0,
            num_channels: NUM_CHANNELS,
            prepared: false,
            #[cfg(feature = "rtrb")]
            note_rx: None,
            #[cfg(feature = "rtrb")]
            param_rx: None,
        }
    }

    /// Build a pool plus the control-thread handle. The handle is the
    /// only thing a GUI or MIDI thread needs; the synth itself moves
    /// into the audio callback.
    #[cfg(feature = "rtrb")]
    pub fn with_handle(max_voices: usize) -> (Self, SynthHandle) {
        let (note_tx, note_rx) = RingBuffer::<SynthMessage>::new(NOTE_QUEUE_SIZE);
        let (param_tx, param_rx) = RingBuffer::<ParamChange>::new(PARAM_QUEUE_SIZE);

        let mut synth = Self::new(max_voices);
        synth.note_rx = Some(note_rx);
        synth.param_rx = Some(param_rx);

        let handle = SynthHandle {
            notes: note_tx,
            params: param_tx,
        };
        (synth, handle)
    }

    /// Prime the engine for a session. Must be called before
    /// `render_block`; rendering without it produces silence.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize, num_channels: usize) {
        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;
        self.num_channels = num_channels.max(1);
        for voice in &mut self.voices {
            voice.prepare(sample_rate);
            voice.apply_params(&self.params);
        }
        self.prepared = sample_rate > 0.0 && sample_rate.is_finite();
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// The current parameter snapshot.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Replace the snapshot directly (single-threaded hosts). Takes
    /// effect at the next block like any queued change.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// Apply one change directly (single-threaded hosts).
    pub fn apply_change(&mut self, change: ParamChange) {
        self.params.apply(change);
    }

    pub fn num_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// True if some active voice is currently sounding `note`.
    pub fn is_note_active(&self, note: u8) -> bool {
        self.voices.iter().any(|v| v.is_active() && v.note() == note)
    }

    /// Start a note, claiming a free voice or stealing the oldest one.
    pub fn note_on(&mut self, note: u8, velocity: u8) {
        self.age_counter += 1;
        let age = self.age_counter;
        let bend = self.bend_cents;
        let params = self.params;

        let index = self
            .voices
            .iter()
            .position(|v| v.is_free() && v.can_play(note))
            .or_else(|| self.steal_index());

        if let Some(index) = index {
            let voice = &mut self.voices[index];
            voice.apply_params(&params);
            voice.start_note(note, velocity, bend, age);
        }
    }

    /// Release the most recently started voice sounding `note`.
    pub fn note_off(&mut self, note: u8) {
        if let Some(voice) = self
            .voices
            .iter_mut()
            .filter(|v| v.is_active() && v.note() == note)
            .max_by_key(|v| v.age())
        {
            voice.stop_note(true);
        }
    }

    /// Move the pitch wheel: remembered for future notes and applied to
    /// every sounding voice.
    pub fn pitch_bend(&mut self, cents: f32) {
        if !cents.is_finite() {
            return;
        }
        self.bend_cents = cents;
        for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
            voice.set_pitch_bend(cents);
        }
    }

    /// Release every sounding voice with its normal tail.
    pub fn all_notes_off(&mut self) {
        for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
            voice.stop_note(true);
        }
    }

    /// Steal target: the active voice sounding longest (smallest age).
    fn steal_index(&self) -> Option<usize> {
        self.voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_active())
            .min_by_key(|(_, v)| v.age())
            .map(|(index, _)| index)
    }

    fn handle_message(&mut self, message: SynthMessage) {
        match message {
            SynthMessage::NoteOn { note, velocity } => self.note_on(note, velocity),
            SynthMessage::NoteOff { note } => self.note_off(note),
            SynthMessage::PitchBend { cents } => self.pitch_bend(cents),
            SynthMessage::AllNotesOff => self.all_notes_off(),
        }
    }

    #[cfg(feature = "rtrb")]
    fn drain_control_queues(&mut self) {
        loop {
            let change = match self.param_rx.as_mut() {
                Some(rx) => match rx.pop() {
                    Ok(change) => change,
                    Err(_) => break,
                },
                None => break,
            };
            self.params.apply(change);
        }
        loop {
            let message = match self.note_rx.as_mut().and_then(MessageReceiver::pop) {
                Some(message) => message,
                None => break,
            };
            self.handle_message(message);
        }
    }

    /// Render one audio block into planar channel buffers.
    ///
    /// `events` is the host's note list for this block, ordered by
    /// `sample_offset`. All events are dispatched before rendering;
    /// voices then contribute additively and order-independently, and
    /// the master gain is applied last. Output is nominally [-1, 1] but
    /// deliberately not clamped - the host owns clipping.
    pub fn render_block(
        &mut self,
        out: &mut [&mut [f32]],
        events: &[NoteEvent],
        num_samples: usize,
    ) {
        for channel in out.iter_mut() {
            channel[..num_samples].fill(0.0);
        }
        if !self.prepared {
            return;
        }
        debug_assert!(
            num_samples <= self.max_block_size,
            "block of {num_samples} exceeds the prepared maximum of {}",
            self.max_block_size
        );
        debug_assert!(out.len() <= self.num_channels);

        #[cfg(feature = "rtrb")]
        self.drain_control_queues();

        for event in events {
            if event.on {
                self.note_on(event.note, event.velocity);
            } else {
                self.note_off(event.note);
            }
        }

        // One frozen snapshot for everyone, once per block.
        let params = self.params;
        for voice in &mut self.voices {
            voice.apply_params(&params);
        }

        let rendered_channels = out.len().min(self.num_channels).min(NUM_CHANNELS);
        for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
            voice.render_block(&mut out[..rendered_channels], 0, num_samples);
        }

        // Channels beyond the stereo pair mirror the rendered ones.
        if out.len() > NUM_CHANNELS {
            let (head, tail) = out.split_at_mut(NUM_CHANNELS);
            for (offset, channel) in tail.iter_mut().enumerate() {
                let source = (NUM_CHANNELS + offset) % NUM_CHANNELS;
                channel[..num_samples].copy_from_slice(&head[source][..num_samples]);
            }
        }

        let master = self.params.master_gain;
        for channel in out.iter_mut() {
            for sample in &mut channel[..num_samples] {
                *sample *= master;
            }
        }
    }
}
