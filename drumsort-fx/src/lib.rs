//! drumsort-fx library interface
//!
//! Exposes the extraction pipeline and classify mode for the binary and for
//! integration testing.

pub mod error;
pub mod features;
pub mod models;
pub mod services;
pub mod utils;

pub use crate::error::{ExtractError, ExtractResult, PipelineError, TableError};
pub use crate::models::{FeatureRecord, CHUNK_COUNT};
