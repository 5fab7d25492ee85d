//! Applies a small effect chain to a WAV file and writes the result to
//! out.wav.

use ditty::Sound;
use std::env;

fn main() -> anyhow::Result<()> {
    let path = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: effects <input.wav>"))?;

    let mut sound = Sound::from_wav_file(&path)?;
    println!(
        "{}: {} samples at {} Hz",
        path,
        sound.len(),
        sound.sample_rate()
    );

    sound.flip_flop().echo(0.25).staticize(Sound::DEFAULT_STATIC);
    sound.write("out.wav")?;
    println!("Wrote out.wav ({:.1}s)", sound.duration());
    Ok(())
}
