//! Benchmarks for the ADSR envelope generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polyvox_dsp::dsp::envelope::Envelope;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn prepared(attack: f32, decay: f32, sustain: f32, release: f32) -> Envelope {
    let mut env = Envelope::new();
    env.set_sample_rate(SAMPLE_RATE);
    env.set_adsr(attack, decay, sustain, release);
    env
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up)
        let mut env = prepared(3.0, 0.1, 0.7, 0.3);
        env.note_on();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = env.next_sample();
                }
                black_box(&mut buffer);
            })
        });

        // Sustain phase (holding steady)
        let mut env = prepared(0.01, 0.01, 0.7, 0.3);
        env.note_on();
        for _ in 0..2_000 {
            env.next_sample();
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = env.next_sample();
                }
                black_box(&mut buffer);
            })
        });
    }

    group.finish();
}
