//! Benchmarks for the full render path: one voice, then the pool.
//!
//! These are the numbers that matter for real-time budgeting - a block
//! must render in far less wall time than it represents in audio time.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polyvox_dsp::params::{OscSlot, ParamChange, Params};
use polyvox_dsp::synth::message::NoteEvent;
use polyvox_dsp::synth::{PolySynth, Voice};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // === SINGLE VOICE ===
        // Baseline: two oscillators, filter, both envelopes, stereo.
        let mut voice = Voice::new();
        voice.prepare(SAMPLE_RATE);
        voice.apply_params(&Params::default());
        voice.start_note(57, 100, 0.0, 1);

        group.bench_with_input(BenchmarkId::new("single_voice", size), &size, |b, _| {
            b.iter(|| {
                let mut out: [&mut [f32]; 2] = [&mut left, &mut right];
                voice.render_block(black_box(&mut out), 0, size);
            })
        });

        // === SINGLE VOICE WITH FM ===
        // Adds the modulator sin() on every oscillator.
        let mut voice = Voice::new();
        voice.prepare(SAMPLE_RATE);
        let mut params = Params::default();
        params.apply(ParamChange::FmFreq(OscSlot::Osc1, 200.0));
        params.apply(ParamChange::FmDepth(OscSlot::Osc1, 500.0));
        voice.apply_params(&params);
        voice.start_note(57, 100, 0.0, 1);

        group.bench_with_input(BenchmarkId::new("single_voice_fm", size), &size, |b, _| {
            b.iter(|| {
                let mut out: [&mut [f32]; 2] = [&mut left, &mut right];
                voice.render_block(black_box(&mut out), 0, size);
            })
        });

        // === FULL POOL ===
        // Eight held notes: the worst steady-state case for one block.
        let mut synth = PolySynth::new(8);
        synth.prepare(SAMPLE_RATE, size, 2);
        for (i, note) in [45u8, 48, 52, 57, 60, 64, 69, 72].iter().enumerate() {
            let event = NoteEvent {
                sample_offset: 0,
                note: *note,
                velocity: 100,
                on: true,
            };
            let mut out: [&mut [f32]; 2] = [&mut left, &mut right];
            synth.render_block(&mut out, &[event], if i == 0 { size } else { 1 });
        }

        group.bench_with_input(BenchmarkId::new("pool_8_voices", size), &size, |b, _| {
            b.iter(|| {
                let mut out: [&mut [f32]; 2] = [&mut left, &mut right];
                synth.render_block(black_box(&mut out), &[], size);
            })
        });
    }

    group.finish();
}
