use ditty::{Sound, pure_tone};

#[test]
fn test_one_note_at_sixty_bpm_is_two_seconds() {
    // beat = 60 / 60 = 1 s: one second of tone plus one second of rest
    let sound = Sound::from_notes("A", 60.0).unwrap();
    assert_eq!(sound.sample_rate(), 44100);
    assert_eq!(sound.len(), 2 * 44100);

    let tone = pure_tone(440.0, 1.0);
    assert_eq!(&sound.samples()[..44100], tone.samples());
    assert!(sound.samples()[44100..].iter().all(|&s| s == 0.0));
}

#[test]
fn test_melody_length_scales_with_tempo() {
    // beat = 0.5 s at 120 bpm; three notes, each with its own rest
    let sound = Sound::from_notes("A B C#5", 120.0).unwrap();
    assert_eq!(sound.len(), 3 * 44100);
}

#[test]
fn test_octaveless_tokens_track_the_default_octave() {
    let explicit = Sound::from_notes("A4 B4", 90.0).unwrap();
    let implicit = Sound::from_notes("A B", 90.0).unwrap();
    assert_eq!(explicit, implicit);
}

#[test]
fn test_bad_token_aborts_synthesis() {
    let err = Sound::from_notes("A Q2 B", 60.0).unwrap_err();
    assert_eq!(err.to_string(), "invalid pitch name: 'Q2'");
}

#[test]
fn test_written_melody_survives_a_decode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("melody.wav");

    let melody = Sound::from_notes("A E5", 240.0).unwrap();
    melody.write(&path).unwrap();

    let decoded = Sound::from_wav_file(&path).unwrap();
    assert_eq!(decoded.sample_rate(), melody.sample_rate());
    assert_eq!(decoded.len(), melody.len());

    // encoding rounds to 16-bit integers, so samples match to half a unit
    let drift = melody
        .samples()
        .iter()
        .zip(decoded.samples())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0_f64, f64::max);
    assert!(drift <= 0.5, "max round-trip drift {} exceeds 0.5", drift);
}
