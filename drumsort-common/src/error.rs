//! Common error types for drumsort

use thiserror::Error;

/// Common result type for drumsort operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across drumsort tools
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
