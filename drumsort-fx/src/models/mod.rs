//! Data models for drumsort-fx

pub mod audio_stream;
pub mod feature_record;

pub use audio_stream::AudioStream;
pub use feature_record::{ChunkFeatures, FeatureRecord, CHUNK_COUNT};
