//! Concurrent extraction pipeline
//!
//! State machine per run: `Idle → Dispatching → Draining → Done`. A fatal
//! error in any state moves the run to `Failed`.
//!
//! # Architecture
//! - Dispatching: every category directory is listed up front. A listing
//!   failure aborts the run before any task exists. The dispatched count is
//!   fixed once all listings are in.
//! - One task per file on a `JoinSet`. Decoding and assembly run on the
//!   blocking pool; a semaphore caps how many files are decoded at once.
//! - Results travel over a bounded mpsc queue to a single writer task.
//!   Failed files send nothing.
//! - Draining: completion is counted on the `JoinSet`, one per dispatched task
//!   whatever its outcome. Only after all of them have completed does the
//!   coordinator drop its queue sender, letting the writer finish.

use crate::error::{ExtractError, PipelineError};
use crate::features::{FeatureAssembler, NormalizeMode};
use crate::models::FeatureRecord;
use crate::services::file_scanner::FileScanner;
use crate::services::table_writer::{drain_into, TableWriter};
use drumsort_common::{CategoryConfig, TomlConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Pipeline run state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Dispatching,
    Draining,
    Done,
    Failed,
}

/// Settings for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_root: PathBuf,
    pub categories: Vec<CategoryConfig>,
    pub extension: String,
    pub result_queue_capacity: usize,
    pub max_concurrent_files: usize,
    pub normalize_mode: NormalizeMode,
}

impl From<&TomlConfig> for PipelineConfig {
    fn from(config: &TomlConfig) -> Self {
        Self {
            data_root: config.data_root.clone(),
            categories: config.categories.clone(),
            extension: config.extension.clone(),
            result_queue_capacity: config.result_queue_capacity.max(1),
            max_concurrent_files: config.max_concurrent_files.max(1),
            normalize_mode: if config.compat.zero_unsupported_bit_depth {
                NormalizeMode::LegacyZero
            } else {
                NormalizeMode::Strict
            },
        }
    }
}

/// One dispatched file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileJob {
    pub path: PathBuf,
    pub label: String,
}

/// How a single task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskOutcome {
    Recorded,
    Skipped,
    Cancelled,
}

/// Counters for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Tasks dispatched
    pub dispatched: usize,
    /// Tasks that reported completion (always equals `dispatched`)
    pub completed: usize,
    /// Rows written to the table
    pub written: usize,
    /// Files skipped because of a per-file error
    pub skipped: usize,
    /// Files abandoned because the run was cancelled
    pub cancelled: usize,
}

/// Extraction pipeline
pub struct ExtractionPipeline {
    config: PipelineConfig,
    cancel: CancellationToken,
    state: PipelineState,
}

impl ExtractionPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
            state: PipelineState::Idle,
        }
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Current state
    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn transition_to(&mut self, next: PipelineState) {
        tracing::info!(from = ?self.state, to = ?next, "Pipeline state transition");
        self.state = next;
    }

    /// List every file of every category
    ///
    /// Runs to completion before anything is spawned, so the dispatched count
    /// is known before the first task can finish.
    pub fn discover(&self) -> Result<Vec<FileJob>, PipelineError> {
        let scanner = FileScanner::new(&self.config.extension);
        let mut jobs = Vec::new();

        for category in &self.config.categories {
            let dir = category.path_under(&self.config.data_root);
            let files = scanner
                .scan(&dir)
                .map_err(|source| PipelineError::CategoryDir {
                    path: dir.clone(),
                    source,
                })?;

            tracing::info!(
                category = %category.label,
                dir = %dir.display(),
                files = files.len(),
                "Category scanned"
            );

            jobs.extend(files.into_iter().map(|path| FileJob {
                path,
                label: category.label.clone(),
            }));
        }

        Ok(jobs)
    }

    /// Run end to end, writing the table to `output`
    ///
    /// The output file is only created once discovery has succeeded.
    pub async fn run_to_path(&mut self, output: &Path) -> Result<RunSummary, PipelineError> {
        let jobs = self.dispatch()?;
        let table = TableWriter::create(output).map_err(|e| self.fail(e.into()))?;
        let (summary, _file) = self.drain(jobs, table).await?;
        tracing::info!(output = %output.display(), "Feature table written");
        Ok(summary)
    }

    /// Run end to end into an arbitrary table sink
    pub async fn run<W>(&mut self, table: TableWriter<W>) -> Result<(RunSummary, W), PipelineError>
    where
        W: Write + Send + 'static,
    {
        let jobs = self.dispatch()?;
        self.drain(jobs, table).await
    }

    /// Enter `Dispatching` and discover every job
    fn dispatch(&mut self) -> Result<Vec<FileJob>, PipelineError> {
        self.transition_to(PipelineState::Dispatching);
        self.discover().map_err(|e| self.fail(e))
    }

    async fn drain<W>(
        &mut self,
        jobs: Vec<FileJob>,
        table: TableWriter<W>,
    ) -> Result<(RunSummary, W), PipelineError>
    where
        W: Write + Send + 'static,
    {
        match self.execute(jobs, table).await {
            Ok(done) => Ok(done),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, err: PipelineError) -> PipelineError {
        tracing::error!(error = %err, "Pipeline run failed");
        self.transition_to(PipelineState::Failed);
        err
    }

    async fn execute<W>(
        &mut self,
        jobs: Vec<FileJob>,
        table: TableWriter<W>,
    ) -> Result<(RunSummary, W), PipelineError>
    where
        W: Write + Send + 'static,
    {
        let dispatched = jobs.len();
        tracing::info!(dispatched, "Dispatching extraction tasks");

        let (tx, rx) = mpsc::channel::<FeatureRecord>(self.config.result_queue_capacity);
        let writer = tokio::task::spawn_blocking(move || drain_into(rx, table));

        let permits = Arc::new(Semaphore::new(self.config.max_concurrent_files));
        let mut tasks = JoinSet::new();
        for job in jobs {
            tasks.spawn(extract_job(
                job,
                tx.clone(),
                Arc::clone(&permits),
                self.cancel.clone(),
                self.config.normalize_mode,
            ));
        }

        self.transition_to(PipelineState::Draining);

        let mut summary = RunSummary {
            dispatched,
            ..RunSummary::default()
        };
        while let Some(joined) = tasks.join_next().await {
            summary.completed += 1;
            match joined {
                Ok(TaskOutcome::Recorded) => {}
                Ok(TaskOutcome::Skipped) => summary.skipped += 1,
                Ok(TaskOutcome::Cancelled) => summary.cancelled += 1,
                Err(e) => {
                    tracing::error!(error = %e, "Extraction task aborted");
                    summary.skipped += 1;
                }
            }

            if summary.completed % 50 == 0 || summary.completed == dispatched {
                tracing::info!(
                    progress = format!("{}/{}", summary.completed, dispatched),
                    "Extraction progress"
                );
            }
        }

        // Every dispatched task has reported; closing our sender closes the queue
        drop(tx);

        let table = writer.await??;
        summary.written = table.rows();
        let inner = table.finish()?;

        self.transition_to(PipelineState::Done);
        tracing::info!(
            dispatched = summary.dispatched,
            written = summary.written,
            skipped = summary.skipped,
            cancelled = summary.cancelled,
            "Extraction run complete"
        );

        Ok((summary, inner))
    }
}

/// Extract one file and enqueue its record
async fn extract_job(
    job: FileJob,
    tx: mpsc::Sender<FeatureRecord>,
    permits: Arc<Semaphore>,
    cancel: CancellationToken,
    mode: NormalizeMode,
) -> TaskOutcome {
    let permit = tokio::select! {
        permit = permits.acquire_owned() => match permit {
            Ok(permit) => permit,
            Err(_) => return TaskOutcome::Cancelled,
        },
        _ = cancel.cancelled() => return TaskOutcome::Cancelled,
    };

    let FileJob { path, label } = job;
    let token = cancel.clone();
    let file = path.clone();
    let extracted = tokio::task::spawn_blocking(move || {
        FeatureAssembler::new(mode)
            .with_cancellation(token)
            .extract_file(&file, &label)
    })
    .await;
    drop(permit);

    match extracted {
        Ok(Ok(record)) => {
            if tx.send(record).await.is_err() {
                tracing::warn!(file = %path.display(), "Result queue closed, record dropped");
                return TaskOutcome::Skipped;
            }
            tracing::debug!(file = %path.display(), "Processed");
            TaskOutcome::Recorded
        }
        Ok(Err(ExtractError::Cancelled)) => {
            tracing::debug!(file = %path.display(), "Extraction cancelled");
            TaskOutcome::Cancelled
        }
        Ok(Err(e)) => {
            tracing::warn!(file = %path.display(), error = %e, "Skipping file");
            TaskOutcome::Skipped
        }
        Err(e) => {
            tracing::error!(file = %path.display(), error = %e, "Extraction worker panicked");
            TaskOutcome::Skipped
        }
    }
}
