//! PCM normalization
//!
//! Maps raw signed integer samples to `f32` in [-1, 1] using the full signed
//! range of the bit depth:
//!
//! ```text
//! normalized = 2 * (value - min) / (max - min) - 1
//! ```
//!
//! `min` and `max` are asymmetric (e.g. -32768 / 32767), so the mapping is
//! slightly biased: the minimum lands on exactly -1, the maximum on exactly
//! +1, and raw zero lands on `1 / (max - min)` rather than 0. Historical
//! feature tables were produced with this mapping and it is kept as is.

use crate::error::{ExtractError, ExtractResult};

/// Supported PCM bit depths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    Sixteen,
    TwentyFour,
    ThirtyTwo,
}

impl BitDepth {
    /// Representable (min, max) range
    pub fn range(self) -> (i64, i64) {
        match self {
            BitDepth::Sixteen => (i16::MIN as i64, i16::MAX as i64),
            BitDepth::TwentyFour => (-8_388_608, 8_388_607),
            BitDepth::ThirtyTwo => (i32::MIN as i64, i32::MAX as i64),
        }
    }

    /// Normalize one raw sample
    ///
    /// 16-bit input is truncated to `i16` first, wider depths are taken as `i32`.
    pub fn normalize(self, value: i32) -> f32 {
        let raw = match self {
            BitDepth::Sixteen => value as i16 as i64,
            BitDepth::TwentyFour | BitDepth::ThirtyTwo => value as i64,
        };
        let (min, max) = self.range();
        (2.0 * (raw - min) as f64 / (max - min) as f64 - 1.0) as f32
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = ExtractError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            16 => Ok(BitDepth::Sixteen),
            24 => Ok(BitDepth::TwentyFour),
            32 => Ok(BitDepth::ThirtyTwo),
            other => Err(ExtractError::UnsupportedBitDepth(other)),
        }
    }
}

/// How unsupported bit depths are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizeMode {
    /// Reject the file with [`ExtractError::UnsupportedBitDepth`]
    #[default]
    Strict,
    /// Map every sample of an unsupported depth to 0.0 (historical behavior)
    LegacyZero,
}

/// Per-file sample normalizer
#[derive(Debug, Clone, Copy)]
pub struct SampleNormalizer {
    depth: Option<BitDepth>,
}

impl SampleNormalizer {
    /// Resolve the normalizer for a file's declared bit depth
    pub fn new(bits: u16, mode: NormalizeMode) -> ExtractResult<Self> {
        match (BitDepth::try_from(bits), mode) {
            (Ok(depth), _) => Ok(Self { depth: Some(depth) }),
            (Err(_), NormalizeMode::LegacyZero) => {
                tracing::debug!(bits, "Unsupported bit depth, normalizing to silence");
                Ok(Self { depth: None })
            }
            (Err(e), NormalizeMode::Strict) => Err(e),
        }
    }

    /// Normalize one raw sample
    #[inline]
    pub fn normalize(&self, value: i32) -> f32 {
        match self.depth {
            Some(depth) => depth.normalize(value),
            None => 0.0,
        }
    }
}
