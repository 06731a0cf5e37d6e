//! Test Helper Utilities
//!
//! Shared utilities for testing drumsort-fx

#![allow(dead_code)]

pub mod audio_generator;

pub use audio_generator::{
    generate_category, write_corrupt_file, write_stereo_and_mono_pair, write_tone, ToneConfig,
};
