//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polyvox_dsp::dsp::oscillator::{Oscillator, Waveform};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn prepared(waveform: Waveform) -> Oscillator {
    let mut osc = Oscillator::new(waveform);
    osc.set_sample_rate(SAMPLE_RATE);
    osc.set_frequency(440.0);
    osc
}

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - one sin() per sample
        let mut osc = prepared(Waveform::Sine);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = osc.next_sample();
                }
                black_box(&mut buffer);
            })
        });

        // Saw - linear ramp
        let mut osc = prepared(Waveform::Saw);
        group.bench_with_input(BenchmarkId::new("saw", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = osc.next_sample();
                }
                black_box(&mut buffer);
            })
        });

        // Square - branch per sample
        let mut osc = prepared(Waveform::Square);
        group.bench_with_input(BenchmarkId::new("square", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = osc.next_sample();
                }
                black_box(&mut buffer);
            })
        });

        // FM adds a second sin() for the modulator
        let mut osc = prepared(Waveform::Sine);
        osc.set_fm_params(200.0, 500.0);
        group.bench_with_input(BenchmarkId::new("sine_fm", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = osc.next_sample();
                }
                black_box(&mut buffer);
            })
        });
    }

    group.finish();
}
