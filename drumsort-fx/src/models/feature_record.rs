//! Feature record: one row of the output table

/// Number of chunks every file is split into
pub const CHUNK_COUNT: usize = 10;

/// Features of a single chunk
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChunkFeatures {
    /// Dominant fundamental frequency in Hz (0 when unvoiced)
    pub dominant_frequency: f64,
    /// Pitch confidence in [0, 1]
    pub confidence: f64,
    /// Root-mean-square energy of the chunk
    pub rms_energy: f64,
}

/// Fixed-width summary of one audio file
///
/// `pitch` and `rms` are in chunk temporal order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    /// Total duration of the source file in milliseconds
    pub length_ms: u64,
    /// Dominant frequency per chunk
    pub pitch: [f64; CHUNK_COUNT],
    /// RMS energy per chunk
    pub rms: [f64; CHUNK_COUNT],
    /// Category label
    pub label: String,
}

impl FeatureRecord {
    /// Assemble a record from per-chunk features in temporal order
    pub fn from_chunks(length_ms: u64, chunks: &[ChunkFeatures; CHUNK_COUNT], label: impl Into<String>) -> Self {
        let mut pitch = [0.0; CHUNK_COUNT];
        let mut rms = [0.0; CHUNK_COUNT];
        for (i, chunk) in chunks.iter().enumerate() {
            pitch[i] = chunk.dominant_frequency;
            rms[i] = chunk.rms_energy;
        }
        Self {
            length_ms,
            pitch,
            rms,
            label: label.into(),
        }
    }
}
