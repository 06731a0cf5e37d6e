//! Audio Decoding
//!
//! **Purpose:** Turn an audio file into an [`AudioStream`] of raw interleaved
//! integer PCM at its native bit depth.
//!
//! The decoder is a capability behind [`PcmSource`]; [`WavSource`] provides it
//! for RIFF/WAVE files via hound. Decode failures surface as the `Err` arm of
//! each call rather than through a separate last-error query.

use crate::error::{ExtractError, ExtractResult};
use crate::models::audio_stream::{frames_to_duration, AudioStream};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::time::Duration;

/// Source of raw interleaved integer PCM
pub trait PcmSource {
    /// Sample rate in Hz
    fn sample_rate(&self) -> u32;

    /// Bits per sample
    fn bit_depth(&self) -> u16;

    /// Interleaved channel count
    fn channel_count(&self) -> u16;

    /// Total duration of the stream
    fn duration(&self) -> Duration;

    /// Move the read position to frame `frame`
    fn seek(&mut self, frame: u32) -> ExtractResult<()>;

    /// Read every remaining sample, interleaved by channel
    fn read_all_samples(&mut self) -> ExtractResult<Vec<i32>>;
}

/// WAV file source backed by hound
pub struct WavSource<R> {
    reader: hound::WavReader<R>,
}

impl WavSource<BufReader<File>> {
    /// Open a WAV file
    pub fn open(path: &Path) -> ExtractResult<Self> {
        let reader = hound::WavReader::open(path).map_err(|e| {
            ExtractError::Decode(format!("Failed to open {}: {}", path.display(), e))
        })?;
        Self::from_reader(reader)
    }
}

impl<R: Read + Seek> WavSource<R> {
    /// Wrap any seekable byte source holding WAV data
    pub fn new(inner: R) -> ExtractResult<Self> {
        Self::from_reader(hound::WavReader::new(inner)?)
    }

    fn from_reader(reader: hound::WavReader<R>) -> ExtractResult<Self> {
        if reader.spec().sample_format != hound::SampleFormat::Int {
            return Err(ExtractError::UnsupportedSampleFormat(
                "IEEE float PCM".to_string(),
            ));
        }
        Ok(Self { reader })
    }
}

impl<R: Read + Seek> PcmSource for WavSource<R> {
    fn sample_rate(&self) -> u32 {
        self.reader.spec().sample_rate
    }

    fn bit_depth(&self) -> u16 {
        self.reader.spec().bits_per_sample
    }

    fn channel_count(&self) -> u16 {
        self.reader.spec().channels
    }

    fn duration(&self) -> Duration {
        frames_to_duration(self.reader.duration() as u64, self.sample_rate())
    }

    fn seek(&mut self, frame: u32) -> ExtractResult<()> {
        self.reader
            .seek(frame)
            .map_err(|e| ExtractError::Decode(format!("Seek failed: {}", e)))
    }

    fn read_all_samples(&mut self) -> ExtractResult<Vec<i32>> {
        self.reader
            .samples::<i32>()
            .collect::<Result<Vec<i32>, hound::Error>>()
            .map_err(ExtractError::from)
    }
}

/// Decode a whole source into an [`AudioStream`]
pub fn decode_stream<S: PcmSource>(source: &mut S) -> ExtractResult<AudioStream> {
    source.seek(0)?;
    let samples = source.read_all_samples()?;

    Ok(AudioStream {
        sample_rate: source.sample_rate(),
        bit_depth: source.bit_depth(),
        channels: source.channel_count(),
        duration: source.duration(),
        samples,
    })
}

/// Decode a WAV file into an [`AudioStream`]
pub fn decode_wav_file(file_path: &Path) -> ExtractResult<AudioStream> {
    tracing::debug!(path = %file_path.display(), "Decoding audio file");

    let mut source = WavSource::open(file_path)?;
    let stream = decode_stream(&mut source)?;

    tracing::debug!(
        path = %file_path.display(),
        sample_rate = stream.sample_rate,
        bit_depth = stream.bit_depth,
        channels = stream.channels,
        total_samples = stream.samples.len(),
        duration_ms = stream.duration.as_millis() as u64,
        "Audio decoding complete"
    );

    Ok(stream)
}
