//! Fixed-count chunking
//!
//! A file is split into exactly [`CHUNK_COUNT`] sequential, non-overlapping
//! chunks of equal length:
//!
//! ```text
//! chunk_duration      = total_duration / CHUNK_COUNT
//! chunk_sample_length = floor(chunk_duration_seconds * sample_rate)
//! ```
//!
//! Samples left over after the last full chunk are dropped.

use crate::error::{ExtractError, ExtractResult};
use crate::models::CHUNK_COUNT;
use std::time::Duration;

/// Samples per chunk for a file of `duration` at `sample_rate`
pub fn chunk_sample_length(duration: Duration, sample_rate: u32) -> usize {
    let chunk_duration = duration / CHUNK_COUNT as u32;
    (chunk_duration.as_secs_f64() * sample_rate as f64).floor() as usize
}

/// Check that `available` mono samples fill every chunk
///
/// Returns the total number of samples the chunks will consume.
pub fn required_samples(chunk_len: usize, available: usize) -> ExtractResult<usize> {
    let required = chunk_len * CHUNK_COUNT;
    if chunk_len == 0 || available < required {
        return Err(ExtractError::InsufficientLength {
            samples: available,
            required: required.max(CHUNK_COUNT),
        });
    }
    Ok(required)
}

/// Iterator adapter yielding full chunks in temporal order
///
/// Yields at most [`CHUNK_COUNT`] chunks; a trailing partial chunk is never
/// yielded.
pub struct Chunks<I> {
    samples: I,
    chunk_len: usize,
    emitted: usize,
}

impl<I> Chunks<I>
where
    I: Iterator<Item = f32>,
{
    pub fn new(samples: I, chunk_len: usize) -> Self {
        Self {
            samples,
            chunk_len,
            emitted: 0,
        }
    }
}

impl<I> Iterator for Chunks<I>
where
    I: Iterator<Item = f32>,
{
    type Item = Vec<f32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.emitted >= CHUNK_COUNT || self.chunk_len == 0 {
            return None;
        }

        let mut buffer = Vec::with_capacity(self.chunk_len);
        buffer.extend(self.samples.by_ref().take(self.chunk_len));
        if buffer.len() < self.chunk_len {
            return None;
        }

        self.emitted += 1;
        Some(buffer)
    }
}
