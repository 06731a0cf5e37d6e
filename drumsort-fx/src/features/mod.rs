//! Per-file feature extraction
//!
//! Leaves first:
//! - [`pcm`]: raw integer sample → `f32` in [-1, 1]
//! - [`channel_mixer`]: stereo → mono on raw integers
//! - [`chunker`]: mono stream → exactly `CHUNK_COUNT` chunks
//! - [`pitch`]: chunk → dominant frequency + confidence
//! - [`energy`]: chunk → RMS
//! - [`assembler`]: all of the above for one file

pub mod assembler;
pub mod channel_mixer;
pub mod chunker;
pub mod energy;
pub mod pcm;
pub mod pitch;

pub use assembler::FeatureAssembler;
pub use pcm::{BitDepth, NormalizeMode};
pub use pitch::{PitchEstimate, PitchEstimator};
