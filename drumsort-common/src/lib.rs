//! # drumsort Common Library
//!
//! Shared code for the drumsort tools:
//! - Error type used while bootstrapping
//! - TOML configuration loading and category table

pub mod config;
pub mod error;

pub use config::{CategoryConfig, TomlConfig};
pub use error::{Error, Result};
