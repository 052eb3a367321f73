//! polyvox - demo player
//!
//! Run with: cargo run
//!
//! Plays a short filtered arpeggio through the default output device.
//! The synth lives inside the audio callback; this thread only talks to
//! it through the wait-free control handle.

use color_eyre::eyre::{eyre, Result, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use polyvox_dsp::params::{AdsrParams, EnvTarget, OscSlot, ParamChange};
use polyvox_dsp::synth::PolySynth;
use polyvox_dsp::{DEFAULT_VOICES, MAX_BLOCK_SIZE};

fn main() -> Result<()> {
    color_eyre::install()?;

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let (mut synth, mut handle) = PolySynth::with_handle(DEFAULT_VOICES);
    synth.prepare(sample_rate, MAX_BLOCK_SIZE, channels);

    println!("=== polyvox ===");
    println!("Sample rate: {sample_rate} Hz");
    println!("Channels: {channels}");
    println!("Voices: {DEFAULT_VOICES}");
    println!();

    // Patch: slightly detuned saw pair into a resonant swept low-pass.
    handle.set(ParamChange::Waveform(OscSlot::Osc1, 1));
    handle.set(ParamChange::Waveform(OscSlot::Osc2, 1));
    handle.set(ParamChange::Pitch(OscSlot::Osc2, 0.08));
    handle.set(ParamChange::GainDb(OscSlot::Osc2, -8.0));
    handle.set(ParamChange::FilterCutoff(2_500.0));
    handle.set(ParamChange::FilterResonance(3.0));
    handle.set(ParamChange::Adsr(
        EnvTarget::Amp,
        AdsrParams {
            attack: 0.02,
            decay: 0.15,
            sustain: 0.6,
            release: 0.3,
        },
    ));
    handle.set(ParamChange::Adsr(
        EnvTarget::Mod,
        AdsrParams {
            attack: 0.01,
            decay: 0.25,
            sustain: 0.35,
            release: 0.3,
        },
    ));

    // Planar scratch; cpal hands us an interleaved buffer.
    let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut right = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut frames_written = 0;

            let planar = channels.min(2);
            while frames_written < total_frames {
                let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                {
                    let mut out: [&mut [f32]; 2] =
                        [&mut left[..frames], &mut right[..frames]];
                    synth.render_block(&mut out[..planar], &[], frames);
                }

                let base = frames_written * channels;
                for i in 0..frames {
                    for ch in 0..channels {
                        let sample = if ch % 2 == 0 { left[i] } else { right[i] };
                        data[base + i * channels + ch] = sample;
                    }
                }
                frames_written += frames;
            }
        },
        |err| eprintln!("audio error: {err}"),
        None,
    )?;
    stream.play()?;

    println!("Playing... (about 5 seconds)");

    // Drive an arpeggio from this thread through the handle.
    let pattern = [57u8, 60, 64, 69, 64, 60];
    for &note in pattern.iter().cycle().take(24) {
        handle.note_on(note, 100);
        std::thread::sleep(std::time::Duration::from_millis(180));
        handle.note_off(note);
    }

    handle.all_notes_off();
    std::thread::sleep(std::time::Duration::from_millis(600));

    Ok(())
}
