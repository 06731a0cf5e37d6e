//! Feature assembly over real WAV files

mod helpers;

use drumsort_fx::features::FeatureAssembler;
use drumsort_fx::{ExtractError, CHUNK_COUNT};
use helpers::{write_corrupt_file, write_stereo_and_mono_pair, write_tone, ToneConfig};
use tempfile::TempDir;

#[test]
fn test_stereo_matches_premixed_mono() {
    let temp_dir = TempDir::new().unwrap();
    let stereo = temp_dir.path().join("stereo.wav");
    let mono = temp_dir.path().join("mono.wav");
    write_stereo_and_mono_pair(&stereo, &mono, 44100, 0.4).unwrap();

    let mut assembler = FeatureAssembler::default();
    let from_stereo = assembler.extract_file(&stereo, "Snare").unwrap();
    let from_mono = assembler.extract_file(&mono, "Snare").unwrap();

    assert_eq!(from_stereo, from_mono);
}

#[test]
fn test_supported_bit_depths() {
    let temp_dir = TempDir::new().unwrap();

    for bits in [16u16, 24, 32] {
        let path = temp_dir.path().join(format!("tone_{}.wav", bits));
        let config = ToneConfig {
            bits_per_sample: bits,
            ..ToneConfig::default()
        };
        write_tone(&path, &config).unwrap();

        let record = FeatureAssembler::default().extract_file(&path, "Hat").unwrap();

        assert_eq!(record.length_ms, 500, "{}-bit", bits);
        assert_eq!(record.pitch.len(), CHUNK_COUNT);
        for (i, (pitch, rms)) in record.pitch.iter().zip(record.rms.iter()).enumerate() {
            assert!((pitch - 440.0).abs() <= 2.0, "{}-bit chunk {}: {} Hz", bits, i, pitch);
            // 0.5 * sin normalized around the 1/(max-min) bias
            assert!((rms - 0.5 / 2f64.sqrt()).abs() < 0.01, "{}-bit chunk {}: rms {}", bits, i, rms);
        }
    }
}

#[test]
fn test_ten_entries_at_any_rate() {
    let temp_dir = TempDir::new().unwrap();

    for (rate, seconds) in [(8000u32, 0.125), (22050, 0.5), (48000, 1.5), (96000, 0.25)] {
        let path = temp_dir.path().join(format!("tone_{}.wav", rate));
        let config = ToneConfig {
            sample_rate: rate,
            duration_seconds: seconds,
            frequency: 300.0,
            ..ToneConfig::default()
        };
        write_tone(&path, &config).unwrap();

        let record = FeatureAssembler::default().extract_file(&path, "Kick").unwrap();
        assert_eq!(record.pitch.len(), CHUNK_COUNT);
        assert_eq!(record.rms.len(), CHUNK_COUNT);
        assert_eq!(record.length_ms, (seconds * 1000.0) as u64);
    }
}

#[test]
fn test_unsupported_files_are_errors() {
    let temp_dir = TempDir::new().unwrap();
    let mut assembler = FeatureAssembler::default();

    let eight_bit = temp_dir.path().join("eight.wav");
    write_tone(
        &eight_bit,
        &ToneConfig {
            bits_per_sample: 8,
            ..ToneConfig::default()
        },
    )
    .unwrap();
    assert!(matches!(
        assembler.extract_file(&eight_bit, "Other"),
        Err(ExtractError::UnsupportedBitDepth(8))
    ));

    let surround = temp_dir.path().join("surround.wav");
    write_tone(
        &surround,
        &ToneConfig {
            channels: 3,
            ..ToneConfig::default()
        },
    )
    .unwrap();
    assert!(matches!(
        assembler.extract_file(&surround, "Other"),
        Err(ExtractError::UnsupportedChannelCount(3))
    ));

    let corrupt = write_corrupt_file(&temp_dir.path().join("broken.wav")).unwrap();
    assert!(matches!(
        assembler.extract_file(&corrupt, "Other"),
        Err(ExtractError::Decode(_))
    ));

    let missing = temp_dir.path().join("missing.wav");
    assert!(matches!(
        assembler.extract_file(&missing, "Other"),
        Err(ExtractError::Decode(_))
    ));
}

#[test]
fn test_too_short_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("blip.wav");
    write_tone(
        &path,
        &ToneConfig {
            sample_rate: 8000,
            duration_seconds: 0.0005,
            ..ToneConfig::default()
        },
    )
    .unwrap();

    assert!(matches!(
        FeatureAssembler::default().extract_file(&path, "Kick"),
        Err(ExtractError::InsufficientLength { .. })
    ));
}
