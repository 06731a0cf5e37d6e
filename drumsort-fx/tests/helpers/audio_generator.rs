//! Audio Test Fixture Generator
//!
//! Synthesizes integer PCM WAV files with `hound`

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

/// Configuration for a generated tone
#[derive(Debug, Clone)]
pub struct ToneConfig {
    pub frequency: f64,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Peak amplitude as a fraction of full scale
    pub amplitude: f64,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            duration_seconds: 0.5,
            sample_rate: 44100,
            channels: 1,
            bits_per_sample: 16,
            amplitude: 0.5,
        }
    }
}

fn full_scale(bits: u16) -> f64 {
    ((1i64 << (bits - 1)) - 1) as f64
}

fn spec(sample_rate: u32, channels: u16, bits: u16) -> hound::WavSpec {
    hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: bits,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Write a sine tone, identical on every channel
pub fn write_tone(path: &Path, config: &ToneConfig) -> anyhow::Result<PathBuf> {
    let mut writer = hound::WavWriter::create(
        path,
        spec(config.sample_rate, config.channels, config.bits_per_sample),
    )?;
    let frames = (config.duration_seconds * config.sample_rate as f64) as usize;
    let peak = config.amplitude * full_scale(config.bits_per_sample);

    for i in 0..frames {
        let t = i as f64 / config.sample_rate as f64;
        let sample = (peak * (2.0 * PI * config.frequency * t).sin()) as i32;
        for _ in 0..config.channels {
            writer.write_sample(sample)?;
        }
    }

    writer.finalize()?;
    Ok(path.to_path_buf())
}

/// Write a 16-bit stereo file with different left and right signals, plus a
/// mono file holding the truncated integer average of each frame
pub fn write_stereo_and_mono_pair(
    stereo_path: &Path,
    mono_path: &Path,
    sample_rate: u32,
    duration_seconds: f64,
) -> anyhow::Result<()> {
    let mut stereo = hound::WavWriter::create(stereo_path, spec(sample_rate, 2, 16))?;
    let mut mono = hound::WavWriter::create(mono_path, spec(sample_rate, 1, 16))?;
    let frames = (duration_seconds * sample_rate as f64) as usize;

    for i in 0..frames {
        let t = i as f64 / sample_rate as f64;
        let left = (12000.0 * (2.0 * PI * 220.0 * t).sin()) as i16;
        let right = (7001.0 * (2.0 * PI * 660.0 * t).sin()) as i16;
        stereo.write_sample(left)?;
        stereo.write_sample(right)?;

        let average = (left as i32 + right as i32) / 2;
        mono.write_sample(average as i16)?;
    }

    stereo.finalize()?;
    mono.finalize()?;
    Ok(())
}

/// Write bytes that carry the right extension but are not a WAV file
pub fn write_corrupt_file(path: &Path) -> anyhow::Result<PathBuf> {
    std::fs::write(path, b"RIFF\x00\x00\x00\x00not really a wave file")?;
    Ok(path.to_path_buf())
}

/// Create `root/dir` holding `valid` tones and `corrupt` broken files
pub fn generate_category(
    root: &Path,
    dir: &str,
    valid: usize,
    corrupt: usize,
    config: &ToneConfig,
) -> anyhow::Result<Vec<PathBuf>> {
    let category = root.join(dir);
    std::fs::create_dir_all(&category)?;

    let mut files = Vec::new();
    for i in 0..valid {
        files.push(write_tone(&category.join(format!("{}_{:03}.wav", dir, i)), config)?);
    }
    for i in 0..corrupt {
        files.push(write_corrupt_file(&category.join(format!("{}_broken_{:03}.wav", dir, i)))?);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_tone() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tone.wav");
        let config = ToneConfig {
            channels: 2,
            bits_per_sample: 24,
            ..ToneConfig::default()
        };

        write_tone(&path, &config).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().bits_per_sample, 24);
        assert_eq!(reader.duration(), 22050);
    }
}
