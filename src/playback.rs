//! Blocking WAV playback through the default audio output device.

use crate::wave;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, StreamConfig};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

type PlaybackResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Decodes a WAV file and plays it to completion on the default output
/// device.
///
/// Blocks until the whole buffer has been streamed. Device and stream
/// errors surface unchanged.
pub fn play_file<P: AsRef<Path>>(path: P) -> PlaybackResult<()> {
    let (samples, sample_rate) = wave::read(path)?;
    play_samples(samples, sample_rate)
}

/// Playback position over a decoded buffer, shared with the audio callback.
struct PlaybackState {
    samples: Vec<f64>,
    position: f64,
    /// Source samples consumed per device frame. Nearest-neighbor stepping
    /// when the device rate differs from the file rate.
    step: f64,
    done: bool,
}

impl PlaybackState {
    fn next_frame(&mut self) -> f64 {
        let index = self.position as usize;
        if index >= self.samples.len() {
            self.done = true;
            return 0.0;
        }
        self.position += self.step;
        // 16-bit amplitude units to the device's [-1, 1]
        self.samples[index] / 32768.0
    }
}

fn play_samples(samples: Vec<f64>, sample_rate: u32) -> PlaybackResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or("no output device available")?;
    let config = device.default_output_config()?;
    let device_rate = config.sample_rate().0;

    let state = Arc::new(Mutex::new(PlaybackState {
        samples,
        position: 0.0,
        step: f64::from(sample_rate) / f64::from(device_rate),
        done: false,
    }));

    let stream = match config.sample_format() {
        SampleFormat::F32 => build_stream::<f32>(&device, &config.into(), state.clone())?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config.into(), state.clone())?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config.into(), state.clone())?,
        sample_format => {
            return Err(format!("unsupported sample format: {}", sample_format).into());
        }
    };
    stream.play()?;

    while !state.lock().unwrap().done {
        thread::sleep(Duration::from_millis(20));
    }
    // give the device time to drain its final buffer before the stream drops
    thread::sleep(Duration::from_millis(100));
    Ok(())
}

/// Creates an output stream that pulls frames from the playback state,
/// duplicating each frame across the device's channels.
fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    state: Arc<Mutex<PlaybackState>>,
) -> PlaybackResult<cpal::Stream>
where
    T: Sample + FromSample<f64> + cpal::SizedSample,
{
    let channels = config.channels as usize;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let mut state = state.lock().unwrap();
            for frame in data.chunks_mut(channels) {
                let value: T = T::from_sample(state.next_frame());
                for out in frame.iter_mut() {
                    *out = value;
                }
            }
        },
        |err| eprintln!("audio stream error: {}", err),
        None,
    )?;
    Ok(stream)
}
