//! Feature assembly for one file
//!
//! Normalizer → Mixer → Chunker → {Pitch, Energy}, producing exactly one
//! [`FeatureRecord`] or an [`ExtractError`].

use crate::error::{ExtractError, ExtractResult};
use crate::features::channel_mixer::{check_channels, mono_samples};
use crate::features::chunker::{chunk_sample_length, required_samples, Chunks};
use crate::features::energy::rms;
use crate::features::pcm::{NormalizeMode, SampleNormalizer};
use crate::features::pitch::PitchEstimator;
use crate::models::{AudioStream, ChunkFeatures, FeatureRecord, CHUNK_COUNT};
use crate::utils::audio_decoder::decode_wav_file;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Builds feature records from decoded streams
pub struct FeatureAssembler {
    mode: NormalizeMode,
    pitch: PitchEstimator,
    cancel: Option<CancellationToken>,
}

impl Default for FeatureAssembler {
    fn default() -> Self {
        Self::new(NormalizeMode::default())
    }
}

impl FeatureAssembler {
    pub fn new(mode: NormalizeMode) -> Self {
        Self {
            mode,
            pitch: PitchEstimator::default(),
            cancel: None,
        }
    }

    /// Abort between chunks once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Decode a WAV file and assemble its record
    pub fn extract_file(&mut self, path: &Path, label: &str) -> ExtractResult<FeatureRecord> {
        self.check_cancelled()?;
        let stream = decode_wav_file(path)?;
        self.assemble(stream, label)
    }

    /// Assemble the record for one decoded stream
    ///
    /// `length_ms` is the declared duration of the stream, not the sum of the
    /// chunk durations.
    pub fn assemble(&mut self, stream: AudioStream, label: &str) -> ExtractResult<FeatureRecord> {
        check_channels(stream.channels)?;
        let normalizer = SampleNormalizer::new(stream.bit_depth, self.mode)?;
        if stream.sample_rate == 0 {
            return Err(ExtractError::Decode("sample rate is zero".to_string()));
        }

        let chunk_len = chunk_sample_length(stream.duration, stream.sample_rate);
        let available = stream.frames();
        required_samples(chunk_len, available)?;

        let mono = mono_samples(&stream.samples, stream.channels)?.map(|raw| normalizer.normalize(raw));

        let mut features = [ChunkFeatures::default(); CHUNK_COUNT];
        let mut produced = 0;
        for (index, chunk) in Chunks::new(mono, chunk_len).enumerate() {
            self.check_cancelled()?;

            let pitch = self.pitch.estimate(&chunk, stream.sample_rate);
            features[index] = ChunkFeatures {
                dominant_frequency: pitch.frequency,
                confidence: pitch.confidence,
                rms_energy: rms(&chunk),
            };
            produced += 1;
        }

        if produced != CHUNK_COUNT {
            return Err(ExtractError::InsufficientLength {
                samples: available,
                required: chunk_len * CHUNK_COUNT,
            });
        }

        tracing::trace!(
            label,
            chunk_len,
            confidence = ?features.iter().map(|f| f.confidence).collect::<Vec<_>>(),
            "Chunk features assembled"
        );

        Ok(FeatureRecord::from_chunks(
            stream.duration.as_millis() as u64,
            &features,
            label,
        ))
    }

    fn check_cancelled(&self) -> ExtractResult<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(ExtractError::Cancelled),
            _ => Ok(()),
        }
    }
}
