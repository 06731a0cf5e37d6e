//! drumsort-fx - drum sample feature extraction
//!
//! Two modes:
//! - extraction (default): scan every category directory under the data root,
//!   extract per-chunk pitch and RMS features from each file and write the
//!   feature table.
//! - classify (`--resultfile`): load an existing feature table, split it and
//!   run the registered classifiers over it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use drumsort_common::config::{load_config, TomlConfig};
use drumsort_fx::services::classifier::{run_classifiers, Classifier, FeatureTable, MajorityLabel};
use drumsort_fx::services::{ExtractionPipeline, PipelineConfig};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for drumsort-fx
#[derive(Parser, Debug)]
#[command(name = "drumsort-fx")]
#[command(about = "Extract pitch and energy features from labelled drum samples")]
#[command(version)]
struct Args {
    /// Classify an existing feature table instead of extracting a new one
    #[arg(long)]
    resultfile: Option<PathBuf>,

    /// Configuration file (falls back to DRUMSORT_CONFIG, then the default locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding one subdirectory per category
    #[arg(short, long, env = "DRUMSORT_DATA_ROOT")]
    data_root: Option<PathBuf>,

    /// Where to write the feature table
    #[arg(short, long, env = "DRUMSORT_OUTPUT")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing; without RUST_LOG the level is refined once the
    // config file is read
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let (filter, filter_handle) = reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new("info")));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(root) = args.data_root {
        config.data_root = root;
    }
    if let Some(output) = args.output {
        config.output_path = output;
    }
    config.validate().context("Invalid configuration")?;

    if !from_env {
        filter_handle
            .reload(level_filter(&config)?)
            .context("Failed to apply logging.level")?;
    }

    info!("Starting drumsort-fx {}", env!("CARGO_PKG_VERSION"));

    match args.resultfile {
        Some(table) => classify(&table),
        None => extract(&config).await,
    }
}

/// Filter for the configured `logging.level`
fn level_filter(config: &TomlConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(&config.logging.level)
        .with_context(|| format!("Invalid logging.level {:?}", config.logging.level))
}

/// Extraction mode
async fn extract(config: &TomlConfig) -> Result<()> {
    info!("Data root: {}", config.data_root.display());
    info!("Output: {}", config.output_path.display());

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    let mut pipeline =
        ExtractionPipeline::new(PipelineConfig::from(config)).with_cancellation(cancel);
    let summary = pipeline
        .run_to_path(&config.output_path)
        .await
        .context("Extraction run failed")?;

    if summary.cancelled > 0 {
        warn!(cancelled = summary.cancelled, "Run was interrupted, table is partial");
    }
    println!(
        "{} of {} files written to {} ({} skipped)",
        summary.written,
        summary.dispatched,
        config.output_path.display(),
        summary.skipped
    );
    Ok(())
}

/// Classify mode
fn classify(path: &Path) -> Result<()> {
    let table = FeatureTable::read_csv(path)
        .with_context(|| format!("Failed to read feature table {}", path.display()))?;
    info!(rows = table.len(), "Feature table loaded from {}", path.display());

    let classifiers: Vec<Box<dyn Classifier>> = vec![Box::new(MajorityLabel)];
    let reports = run_classifiers(&table, &classifiers).context("Classification failed")?;

    for report in reports {
        println!(
            "{}: trained on {} rows, predicted {} rows",
            report.classifier, report.train_rows, report.test_rows
        );
        for (label, count) in &report.predictions {
            println!("  {:<12} {}", label, count);
        }
    }
    Ok(())
}

/// Cancel the run on Ctrl+C
async fn cancel_on_signal(cancel: CancellationToken) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received Ctrl+C, cancelling extraction");
            cancel.cancel();
        }
        Err(e) => warn!(error = %e, "Failed to install Ctrl+C handler"),
    }
}
