//! The [`Sound`] entity: an owned PCM sample buffer with in-place effects.

use crate::music::{ParseError, note_number_to_frequency, note_to_number};
use crate::samples;
use crate::tone;
use crate::wave;
use rand::Rng;
use std::fmt;
use std::path::Path;

/// Error type for two-operand [`Sound`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundError {
    /// The two operands disagree on sample rate.
    SampleRateMismatch {
        /// Name of the operation that was attempted
        op: &'static str,
        /// Sample rate of the receiver
        left: u32,
        /// Sample rate of the other operand
        right: u32,
    },
}

impl fmt::Display for SoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundError::SampleRateMismatch { op, left, right } => {
                write!(f, "{} requires matching sample rates, {} != {}", op, left, right)
            }
        }
    }
}

impl std::error::Error for SoundError {}

/// An owned, mutable buffer of signed samples at a fixed sampling rate.
///
/// Samples are `f64` values in 16-bit amplitude units (conventionally
/// [-32768, 32767]). Every effect mutates the buffer in place and returns
/// `&mut Self` so calls can be chained. The two operations that can fail,
/// [`overlay`](Sound::overlay) and [`append`](Sound::append), return
/// `Result<&mut Self, SoundError>` and chain with `?`.
///
/// The sample rate is fixed for the lifetime of a `Sound` except through
/// [`change_speed`](Sound::change_speed), which reassigns it deliberately.
/// `Sound` is `Clone`, and a clone shares nothing with its source; clone
/// before applying an effect when the unprocessed buffer is still needed.
///
/// # Examples
///
/// ```
/// use ditty::Sound;
///
/// let mut sound = Sound::from_samples(vec![1.0, 2.0, 3.0, 4.0], 44100);
/// sound.reverse().scale_volume(0.5);
/// assert_eq!(sound.samples(), &[2.0, 1.5, 1.0, 0.5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Sound {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl Sound {
    /// Default per-sample replacement probability for
    /// [`staticize`](Sound::staticize).
    pub const DEFAULT_STATIC: f64 = 0.05;

    /// Creates an empty buffer at the given sample rate.
    pub fn empty(sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
        }
    }

    /// Creates a sound from raw samples and their sample rate.
    pub fn from_samples(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Decodes a WAV file into a sound.
    ///
    /// Multi-channel files keep only their first channel. Decoder errors
    /// surface unchanged.
    pub fn from_wav_file<P: AsRef<Path>>(path: P) -> Result<Self, hound::Error> {
        let (samples, sample_rate) = wave::read(path)?;
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Synthesizes a melody from a whitespace-separated note string.
    ///
    /// Each token is a pitch letter with an optional `#` and an optional
    /// octave digit (octave 4 when omitted). One beat lasts
    /// `60 / tempo_bpm` seconds; every note is rendered as a beat-long pure
    /// tone followed by a beat-long rest. The result is at 44100 Hz.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] naming the first token that fails to parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use ditty::Sound;
    ///
    /// // one beat of A440 plus one beat of rest at 60 bpm
    /// let sound = Sound::from_notes("A", 60.0).unwrap();
    /// assert_eq!(sound.len(), 2 * 44100);
    /// ```
    pub fn from_notes(notes: &str, tempo_bpm: f64) -> Result<Self, ParseError> {
        let beat_seconds = 60.0 / tempo_bpm;
        let mut sound = Sound::empty(tone::DEFAULT_SAMPLE_RATE);
        let mut previous = None;

        for token in notes.split_whitespace() {
            let number = note_to_number(token, previous)?;
            previous = Some(number);

            let note = tone::pure_tone(note_number_to_frequency(number), beat_seconds);
            sound.samples.extend_from_slice(note.samples());
            let rest = tone::silence(beat_seconds);
            sound.samples.extend_from_slice(rest.samples());
        }
        Ok(sound)
    }

    /// The sample buffer.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// The sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples in the buffer.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration of the buffer in seconds at the current rate.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Consumes the sound, returning its sample buffer.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Reassigns the sample rate, leaving the samples untouched.
    ///
    /// The data does not change, so perceived pitch and duration shift with
    /// the new playback rate. No resampling is performed.
    pub fn change_speed(&mut self, sample_rate: u32) -> &mut Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Swaps the first and second halves of the buffer.
    ///
    /// The midpoint is `len / 2` rounded down, so an odd-length buffer
    /// keeps its extra sample in the second half.
    pub fn flip_flop(&mut self) -> &mut Self {
        let mid = self.samples.len() / 2;
        self.samples.rotate_left(mid);
        self
    }

    /// Reverses the sample order.
    pub fn reverse(&mut self) -> &mut Self {
        self.samples.reverse();
        self
    }

    /// Multiplies every sample by `factor`.
    pub fn scale_volume(&mut self, factor: f64) -> &mut Self {
        self.samples = samples::scale(&self.samples, factor);
        self
    }

    /// Replaces each sample, with independent probability `p`, by a uniform
    /// random integer in [-32768, 32767).
    ///
    /// `p` is clamped to [0, 1]. Uses the thread-local generator;
    /// [`staticize_with_rng`](Sound::staticize_with_rng) accepts a seeded
    /// one.
    pub fn staticize(&mut self, p: f64) -> &mut Self {
        self.staticize_with_rng(p, &mut rand::thread_rng())
    }

    /// Like [`staticize`](Sound::staticize), with a caller-supplied random
    /// number generator.
    pub fn staticize_with_rng<R: Rng>(&mut self, p: f64, rng: &mut R) -> &mut Self {
        let p = p.clamp(0.0, 1.0);
        for sample in &mut self.samples {
            if rng.gen_bool(p) {
                *sample = rng.gen_range(-32768..32767) as f64;
            }
        }
        self
    }

    /// Mixes `other` into this sound at half amplitude each.
    ///
    /// The result is truncated to the shorter of the two buffers.
    ///
    /// # Errors
    ///
    /// Fails without mutating either operand when the sample rates differ.
    ///
    /// # Examples
    ///
    /// ```
    /// use ditty::Sound;
    ///
    /// let mut a = Sound::from_samples(vec![2.0, 4.0], 44100);
    /// let b = Sound::from_samples(vec![6.0, 8.0, 10.0], 44100);
    /// a.overlay(&b).unwrap();
    /// assert_eq!(a.samples(), &[4.0, 6.0]);
    /// ```
    pub fn overlay(&mut self, other: &Sound) -> Result<&mut Self, SoundError> {
        self.check_rate("overlay", other)?;
        self.samples = samples::scaled_add(&self.samples, &other.samples, 0.5, 0.5);
        Ok(self)
    }

    /// Concatenates `other`'s samples after this sound's.
    ///
    /// # Errors
    ///
    /// Fails without mutating either operand when the sample rates differ;
    /// the error reports both rates.
    pub fn append(&mut self, other: &Sound) -> Result<&mut Self, SoundError> {
        self.check_rate("append", other)?;
        self.samples.extend_from_slice(&other.samples);
        Ok(self)
    }

    /// Prepends `seconds` worth of zero samples, rounded to the nearest
    /// sample count.
    pub fn delay(&mut self, seconds: f64) -> &mut Self {
        let mut padded = vec![0.0; self.span(seconds)];
        padded.append(&mut self.samples);
        self.samples = padded;
        self
    }

    /// Appends `seconds` worth of zero samples, rounded to the nearest
    /// sample count.
    pub fn extend(&mut self, seconds: f64) -> &mut Self {
        let tail = self.span(seconds);
        self.samples.resize(self.samples.len() + tail, 0.0);
        self
    }

    /// Mixes the sound with a copy of itself delayed by `seconds`: a single
    /// echo tap at half amplitude. The buffer grows by the delay length.
    pub fn echo(&mut self, seconds: f64) -> &mut Self {
        let mut delayed = self.clone();
        delayed.delay(seconds);
        let mut padded = self.clone();
        padded.extend(seconds);
        self.samples = samples::scaled_add(&delayed.samples, &padded.samples, 0.5, 0.5);
        self
    }

    /// Encodes the buffer as a mono 16-bit WAV file.
    ///
    /// Encoder errors surface unchanged.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<&Self, hound::Error> {
        wave::write(&self.samples, self.sample_rate, path)?;
        Ok(self)
    }

    /// Writes the buffer to a temporary WAV file, plays it through the
    /// default output device, and removes the file.
    ///
    /// Blocks until playback completes. The temporary file is removed on
    /// every exit path, including write and playback failures, when its
    /// handle drops.
    #[cfg(feature = "playback")]
    pub fn play(&self) -> Result<&Self, Box<dyn std::error::Error + Send + Sync>> {
        let file = tempfile::Builder::new()
            .prefix("ditty-")
            .suffix(".wav")
            .tempfile()?;
        wave::write(&self.samples, self.sample_rate, file.path())?;
        crate::playback::play_file(file.path())?;
        Ok(self)
    }

    /// Number of samples covering `seconds` at the current rate, rounded to
    /// nearest.
    fn span(&self, seconds: f64) -> usize {
        (seconds * self.sample_rate as f64).round() as usize
    }

    fn check_rate(&self, op: &'static str, other: &Sound) -> Result<(), SoundError> {
        if self.sample_rate != other.sample_rate {
            return Err(SoundError::SampleRateMismatch {
                op,
                left: self.sample_rate,
                right: other.sample_rate,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sound(samples: &[f64]) -> Sound {
        Sound::from_samples(samples.to_vec(), 44100)
    }

    #[test]
    fn test_reverse_is_an_involution() {
        let original = sound(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut s = original.clone();
        s.reverse().reverse();
        assert_eq!(s, original);
    }

    #[test]
    fn test_flip_flop_even_length() {
        let mut s = sound(&[1.0, 2.0, 3.0, 4.0]);
        s.flip_flop();
        assert_eq!(s.samples(), &[3.0, 4.0, 1.0, 2.0]);
        s.flip_flop();
        assert_eq!(s.samples(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_flip_flop_odd_length_keeps_extra_sample_in_second_half() {
        // midpoint 5 / 2 = 2: the second half is three samples long
        let mut s = sound(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        s.flip_flop();
        assert_eq!(s.samples(), &[3.0, 4.0, 5.0, 1.0, 2.0]);
    }

    #[test]
    fn test_flip_flop_empty_and_single() {
        let mut empty = sound(&[]);
        empty.flip_flop();
        assert!(empty.is_empty());

        let mut one = sound(&[7.0]);
        one.flip_flop();
        assert_eq!(one.samples(), &[7.0]);
    }

    #[test]
    fn test_scale_volume_identity() {
        let original = sound(&[1.0, -2.0, 3.0]);
        let mut s = original.clone();
        s.scale_volume(1.0);
        assert_eq!(s, original);
    }

    #[test]
    fn test_scale_volume() {
        let mut s = sound(&[1.0, -2.0, 3.0]);
        s.scale_volume(0.5);
        assert_eq!(s.samples(), &[0.5, -1.0, 1.5]);
    }

    #[test]
    fn test_clone_does_not_alias() {
        let original = sound(&[1.0, 2.0, 3.0]);
        let mut copy = original.clone();
        copy.reverse().scale_volume(10.0).change_speed(8000);
        assert_eq!(original.samples(), &[1.0, 2.0, 3.0]);
        assert_eq!(original.sample_rate(), 44100);
    }

    #[test]
    fn test_change_speed_leaves_samples_untouched() {
        let mut s = sound(&[1.0, 2.0]);
        s.change_speed(22050);
        assert_eq!(s.sample_rate(), 22050);
        assert_eq!(s.samples(), &[1.0, 2.0]);
    }

    #[test]
    fn test_overlay_with_itself_is_identity() {
        let original = sound(&[1.0, -2.0, 3.0]);
        let mut s = original.clone();
        s.overlay(&original).unwrap();
        assert_eq!(s, original);
    }

    #[test]
    fn test_overlay_truncates_to_shorter() {
        let mut s = sound(&[2.0, 4.0, 6.0]);
        let other = sound(&[10.0, 20.0]);
        s.overlay(&other).unwrap();
        assert_eq!(s.samples(), &[6.0, 12.0]);
    }

    #[test]
    fn test_overlay_rate_mismatch() {
        let mut s = sound(&[1.0]);
        let other = Sound::from_samples(vec![1.0], 22050);
        let err = s.overlay(&other).unwrap_err();
        assert_eq!(
            err,
            SoundError::SampleRateMismatch {
                op: "overlay",
                left: 44100,
                right: 22050,
            }
        );
    }

    #[test]
    fn test_append() {
        let mut s = sound(&[1.0, 2.0]);
        let other = sound(&[3.0]);
        s.append(&other).unwrap();
        assert_eq!(s.samples(), &[1.0, 2.0, 3.0]);
        // the other operand is untouched
        assert_eq!(other.samples(), &[3.0]);
    }

    #[test]
    fn test_append_rate_mismatch_reports_both_rates_and_mutates_nothing() {
        let mut s = sound(&[1.0, 2.0]);
        let other = Sound::from_samples(vec![3.0], 8000);
        let err = s.append(&other).unwrap_err();
        assert_eq!(
            err,
            SoundError::SampleRateMismatch {
                op: "append",
                left: 44100,
                right: 8000,
            }
        );
        let message = err.to_string();
        assert!(message.contains("44100") && message.contains("8000"));
        assert_eq!(s.samples(), &[1.0, 2.0]);
        assert_eq!(other.samples(), &[3.0]);
    }

    #[test]
    fn test_delay_prepends_zeros() {
        let mut s = Sound::from_samples(vec![1.0, 2.0], 10);
        s.delay(0.3);
        assert_eq!(s.samples(), &[0.0, 0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_extend_appends_zeros() {
        let mut s = Sound::from_samples(vec![1.0, 2.0], 10);
        s.extend(0.2);
        assert_eq!(s.samples(), &[1.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_delay_rounds_to_nearest_sample() {
        let mut s = Sound::from_samples(vec![1.0], 10);
        // 0.25 s at 10 Hz is 2.5 samples, which rounds up to 3
        s.delay(0.25);
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_echo_is_a_single_tap() {
        let mut s = Sound::from_samples(vec![4.0, 8.0], 10);
        s.echo(0.1);
        // delayed copy [0, 4, 8] mixed with padded copy [4, 8, 0]
        assert_eq!(s.samples(), &[2.0, 6.0, 4.0]);
        assert_eq!(s.sample_rate(), 10);
    }

    #[test]
    fn test_staticize_zero_probability_is_identity() {
        let mut rng = StdRng::seed_from_u64(11);
        let original = sound(&[1.5, -2.5, 3.5]);
        let mut s = original.clone();
        s.staticize_with_rng(0.0, &mut rng);
        assert_eq!(s, original);
    }

    #[test]
    fn test_staticize_full_probability_replaces_with_integers_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut s = sound(&[0.5; 128]);
        s.staticize_with_rng(1.0, &mut rng);
        for &sample in s.samples() {
            assert_eq!(sample, sample.trunc(), "replacement must be an integer");
            assert!((-32768.0..32767.0).contains(&sample));
        }
    }

    #[test]
    fn test_from_notes_single_beat() {
        let s = Sound::from_notes("A", 60.0).unwrap();
        assert_eq!(s.sample_rate(), 44100);
        assert_eq!(s.len(), 2 * 44100);
        // the second half is the rest
        assert!(s.samples()[44100..].iter().all(|&x| x == 0.0));
        // the first half matches a plain A440 tone
        let tone = tone::pure_tone(440.0, 1.0);
        assert_eq!(&s.samples()[..44100], tone.samples());
    }

    #[test]
    fn test_from_notes_rejects_bad_tokens() {
        let err = Sound::from_notes("A H4 B", 120.0).unwrap_err();
        assert_eq!(err, ParseError::InvalidPitch("H4".to_string()));
    }

    #[test]
    fn test_from_notes_empty_string_is_an_empty_sound() {
        let s = Sound::from_notes("", 60.0).unwrap();
        assert!(s.is_empty());
        assert_eq!(s.sample_rate(), 44100);
    }

    #[test]
    fn test_chaining() {
        let mut s = sound(&[1.0, 2.0, 3.0, 4.0]);
        let tail = sound(&[5.0]);
        s.reverse().scale_volume(2.0).append(&tail).unwrap().flip_flop();
        assert_eq!(s.samples(), &[4.0, 2.0, 5.0, 8.0, 6.0]);
    }
}
