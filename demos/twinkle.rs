//! Synthesizes "Twinkle, Twinkle, Little Star" from a note string, writes
//! it to a WAV file, and plays it.

use ditty::Sound;

const MELODY: &str = "A A E5 E5 F#5 F#5 E5
    D5 D5 C#5 C#5 B B A
    E5 E5 D5 D5 C#5 C#5 B
    E5 E5 D5 D5 C#5 C#5 B
    A A E5 E5 F#5 F#5 E5
    D5 D5 C#5 C#5 B B A";

fn main() -> anyhow::Result<()> {
    let melody = Sound::from_notes(MELODY, 120.0)?;
    melody.write("twinkle.wav")?;
    println!("Wrote twinkle.wav ({:.1}s)", melody.duration());

    println!("Playing...");
    melody.play().map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
