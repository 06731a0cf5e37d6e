//! Configuration loading and resolution
//!
//! Bootstrap configuration comes from a single TOML file. Every key is
//! optional; missing keys fall back to built-in defaults.
//!
//! # Resolution order
//!
//! 1. Explicit path (command-line `--config`)
//! 2. Environment variable (`DRUMSORT_CONFIG`)
//! 3. `./drumsort.toml` in the working directory
//! 4. `<user config dir>/drumsort/config.toml`
//! 5. Built-in defaults

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "DRUMSORT_CONFIG";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "drumsort.toml";

/// A labeled category bound to one subdirectory of the data root
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryConfig {
    /// Subdirectory name under `data_root`
    pub dir: String,
    /// Label written to the `Type` column
    pub label: String,
}

impl CategoryConfig {
    pub fn new(dir: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            label: label.into(),
        }
    }

    /// Directory of this category under `data_root`
    pub fn path_under(&self, data_root: &Path) -> PathBuf {
        data_root.join(&self.dir)
    }
}

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Root directory holding one subdirectory per category
    pub data_root: PathBuf,

    /// Where extraction mode writes the feature table
    pub output_path: PathBuf,

    /// Audio file extension, matched case-sensitively and without the dot
    pub extension: String,

    /// Category table (directory → label)
    pub categories: Vec<CategoryConfig>,

    /// Capacity of the bounded result queue between workers and the writer
    pub result_queue_capacity: usize,

    /// Maximum number of files decoded at the same time
    pub max_concurrent_files: usize,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Compatibility switches for historical output
    pub compat: CompatConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

/// Compatibility switches
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompatConfig {
    /// Normalize samples of unsupported bit depths to 0.0 instead of
    /// rejecting the file
    pub zero_unsupported_bit_depth: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("./data"),
            output_path: PathBuf::from("result.csv"),
            extension: "wav".to_string(),
            categories: default_categories(),
            result_queue_capacity: 10,
            max_concurrent_files: default_concurrency(),
            logging: LoggingConfig::default(),
            compat: CompatConfig::default(),
        }
    }
}

fn default_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig::new("kick", "Kick"),
        CategoryConfig::new("hat", "Hat"),
        CategoryConfig::new("other", "Other"),
        CategoryConfig::new("percussion", "Percussion"),
        CategoryConfig::new("snare", "Snare"),
    ]
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(Error::Config("No categories configured".to_string()));
        }
        if let Some(bad) = self
            .categories
            .iter()
            .find(|c| c.dir.trim().is_empty() || c.label.trim().is_empty())
        {
            return Err(Error::Config(format!(
                "Category entries need a dir and a label: {:?}",
                bad
            )));
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(Error::Config(format!(
                "Extension must be non-empty and given without a leading dot: {:?}",
                self.extension
            )));
        }
        if self.result_queue_capacity == 0 {
            return Err(Error::Config(
                "result_queue_capacity must be at least 1".to_string(),
            ));
        }
        if self.max_concurrent_files == 0 {
            return Err(Error::Config(
                "max_concurrent_files must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Find the config file to use, if any
///
/// An explicit path (CLI or environment) must exist; the implicit locations
/// are skipped when absent.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Result<Option<PathBuf>> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return require_existing(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return require_existing(PathBuf::from(path));
        }
    }

    // Priority 3: Working directory
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Ok(Some(local));
    }

    // Priority 4: User config directory
    if let Some(user) = dirs::config_dir().map(|d| d.join("drumsort").join("config.toml")) {
        if user.is_file() {
            return Ok(Some(user));
        }
    }

    Ok(None)
}

fn require_existing(path: PathBuf) -> Result<Option<PathBuf>> {
    if path.is_file() {
        Ok(Some(path))
    } else {
        Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )))
    }
}

/// Resolve and load configuration, falling back to built-in defaults
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    match resolve_config_path(cli_arg)? {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            TomlConfig::load(&path)
        }
        None => {
            debug!("No config file found, using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}
