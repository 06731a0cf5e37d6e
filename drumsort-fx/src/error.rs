//! Error types for drumsort-fx
//!
//! Two severities:
//! - [`ExtractError`]: one file could not be turned into a feature record.
//!   Contained in that file's task; the run continues.
//! - [`PipelineError`]: the run itself cannot continue.

use crate::services::file_scanner::ScanError;
use std::path::PathBuf;
use thiserror::Error;

/// Per-file extraction failure (non-fatal)
#[derive(Debug, Error)]
pub enum ExtractError {
    /// More than two channels (or none at all)
    #[error("Unsupported channel count: {0} (expected 1 or 2)")]
    UnsupportedChannelCount(u16),

    /// Bit depth other than 16, 24 or 32
    #[error("Unsupported bit depth: {0} (expected 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    /// Non-integer PCM (e.g. IEEE float WAV)
    #[error("Unsupported sample format: {0}")]
    UnsupportedSampleFormat(String),

    /// Too short to form the required number of non-empty chunks
    #[error("Insufficient length: {samples} mono samples, need {required}")]
    InsufficientLength { samples: usize, required: usize },

    /// Container or stream could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The run was cancelled while this file was in flight
    #[error("Extraction cancelled")]
    Cancelled,
}

impl From<hound::Error> for ExtractError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::Unsupported => {
                ExtractError::UnsupportedSampleFormat("unsupported WAV encoding".to_string())
            }
            other => ExtractError::Decode(other.to_string()),
        }
    }
}

/// Run-level failure (fatal)
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A category directory is missing or unreadable
    #[error("Cannot read category directory {}: {source}", .path.display())]
    CategoryDir {
        path: PathBuf,
        #[source]
        source: ScanError,
    },

    /// The feature table could not be written
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// A pipeline task could not be joined
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Feature table read/write failure
#[derive(Debug, Error)]
pub enum TableError {
    /// Underlying CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error while flushing or opening the table
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Header does not match the fixed schema
    #[error("Unexpected header: {0}")]
    Header(String),

    /// A data row could not be parsed back into a record
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    /// Table holds no data rows
    #[error("Table has no rows")]
    Empty,
}

/// Result type for per-file extraction
pub type ExtractResult<T> = Result<T, ExtractError>;
