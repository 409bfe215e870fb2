//! Predict API Adapters - External adapters for predict-api.
//!
//! This crate provides adapters for:
//! - Filesystem and stdin request sources (JSON and JSON Lines)

pub mod fs;

pub use fs::{FsRequestSource, STDIN_PATH};
