//! Decoded audio stream

use std::time::Duration;

/// One decoded file: raw interleaved integer PCM plus its format
///
/// Immutable once decoded and owned by a single assembler call.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioStream {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bits per sample as declared by the container
    pub bit_depth: u16,
    /// Interleaved channel count
    pub channels: u16,
    /// Total duration as declared by the container
    pub duration: Duration,
    /// Raw samples, interleaved by channel
    pub samples: Vec<i32>,
}

impl AudioStream {
    /// Build a stream whose duration is derived from its frame count
    pub fn from_samples(sample_rate: u32, bit_depth: u16, channels: u16, samples: Vec<i32>) -> Self {
        let frames = if channels == 0 {
            0
        } else {
            samples.len() / channels as usize
        };
        Self {
            sample_rate,
            bit_depth,
            channels,
            duration: frames_to_duration(frames as u64, sample_rate),
            samples,
        }
    }

    /// Number of complete frames
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }
}

/// Duration of `frames` frames at `sample_rate`
pub fn frames_to_duration(frames: u64, sample_rate: u32) -> Duration {
    if sample_rate == 0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(frames as f64 / sample_rate as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_from_frames() {
        let stream = AudioStream::from_samples(1000, 16, 2, vec![0; 4000]);
        assert_eq!(stream.frames(), 2000);
        assert_eq!(stream.duration, Duration::from_secs(2));
    }

    #[test]
    fn test_zero_sample_rate_has_zero_duration() {
        assert_eq!(frames_to_duration(100, 0), Duration::ZERO);
    }
}
