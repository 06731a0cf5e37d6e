//! Channel mixing (stereo to mono)
//!
//! Mixing happens on raw integers, before normalization. Stereo frames are
//! averaged with integer division (truncating toward zero). This is a plain
//! average, not an energy-preserving mixdown.

use crate::error::{ExtractError, ExtractResult};

/// Highest supported channel count
pub const MAX_CHANNELS: u16 = 2;

/// Validate a channel count
pub fn check_channels(channels: u16) -> ExtractResult<usize> {
    if (1..=MAX_CHANNELS).contains(&channels) {
        Ok(channels as usize)
    } else {
        Err(ExtractError::UnsupportedChannelCount(channels))
    }
}

/// Mono view over interleaved raw samples
///
/// A trailing partial frame is ignored.
pub fn mono_samples(samples: &[i32], channels: u16) -> ExtractResult<impl Iterator<Item = i32> + '_> {
    let width = check_channels(channels)?;
    Ok(samples.chunks_exact(width).map(mix_frame))
}

#[inline]
fn mix_frame(frame: &[i32]) -> i32 {
    match frame {
        [left, right] => ((*left as i64 + *right as i64) / 2) as i32,
        [mono] => *mono,
        _ => 0,
    }
}
