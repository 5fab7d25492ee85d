//! WAV decode and encode, delegating to `hound`.

use std::path::Path;

/// Reads a WAV file into 16-bit-unit samples and its sample rate.
///
/// Integer sources are rescaled from their native bit width into 16-bit
/// amplitude units (a 16-bit file decodes verbatim); float sources are
/// scaled by 32767. Multi-channel files keep only the first channel.
pub fn read<P: AsRef<Path>>(path: P) -> Result<(Vec<f64>, u32), hound::Error> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Result<Vec<f64>, _> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| f64::from(v) * 32767.0))
            .collect(),
        hound::SampleFormat::Int => {
            let scale = 32768.0 / (1_i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) * scale))
                .collect()
        }
    };
    let samples = samples?;

    let channel_samples = if spec.channels > 1 {
        samples
            .iter()
            .step_by(spec.channels as usize)
            .copied()
            .collect()
    } else {
        samples
    };

    Ok((channel_samples, spec.sample_rate))
}

/// Writes samples as a mono 16-bit PCM WAV file.
///
/// Samples are rounded to the nearest integer and clamped to the i16 range
/// on the way out.
pub fn write<P: AsRef<Path>>(
    samples: &[f64],
    sample_rate: u32,
    path: P,
) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        let value = sample
            .round()
            .clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16;
        writer.write_sample(value)?;
    }
    writer.finalize()
}
