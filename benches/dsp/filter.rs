//! Benchmarks for the state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polyvox_dsp::dsp::filter::{FilterMode, SVFilter};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|n| (std::f32::consts::TAU * 440.0 * n as f32 / SAMPLE_RATE).sin())
            .collect();
        let mut buffer = vec![0.0f32; size];

        // Static cutoff: coefficients computed once, then cached
        let mut filter = SVFilter::new(FilterMode::LowPass);
        filter.set_sample_rate(SAMPLE_RATE);
        filter.set_params(FilterMode::LowPass, 1_000.0, 2.0);
        group.bench_with_input(BenchmarkId::new("lowpass_static", size), &size, |b, _| {
            b.iter(|| {
                for (out, &sample) in buffer.iter_mut().zip(&input) {
                    *out = filter.process(sample);
                }
                black_box(&mut buffer);
            })
        });

        // Swept cutoff: the modulation multiplier changes every sample,
        // forcing a tan() recompute per step - the worst case the mod
        // envelope can inflict
        let mut filter = SVFilter::new(FilterMode::LowPass);
        filter.set_sample_rate(SAMPLE_RATE);
        filter.set_params(FilterMode::LowPass, 8_000.0, 2.0);
        group.bench_with_input(BenchmarkId::new("lowpass_swept", size), &size, |b, _| {
            let mut mod_level = 0.0f32;
            b.iter(|| {
                for (out, &sample) in buffer.iter_mut().zip(&input) {
                    mod_level = (mod_level + 1.0 / SAMPLE_RATE).fract();
                    filter.set_cutoff_mod(mod_level);
                    *out = filter.process(sample);
                }
                black_box(&mut buffer);
            })
        });

        // Bandpass shares the same core, different output tap
        let mut filter = SVFilter::new(FilterMode::BandPass);
        filter.set_sample_rate(SAMPLE_RATE);
        filter.set_params(FilterMode::BandPass, 1_000.0, 4.0);
        group.bench_with_input(BenchmarkId::new("bandpass_static", size), &size, |b, _| {
            b.iter(|| {
                for (out, &sample) in buffer.iter_mut().zip(&input) {
                    *out = filter.process(sample);
                }
                black_box(&mut buffer);
            })
        });
    }

    group.finish();
}
