//! Service modules for feature extraction and classify mode

pub mod classifier;
pub mod extraction_pipeline;
pub mod file_scanner;
pub mod table_writer;

pub use classifier::{Classifier, ClassifierReport, FeatureTable, MajorityLabel, TrainedModel};
pub use extraction_pipeline::{ExtractionPipeline, FileJob, PipelineConfig, PipelineState, RunSummary};
pub use file_scanner::{FileScanner, ScanError};
pub use table_writer::TableWriter;
