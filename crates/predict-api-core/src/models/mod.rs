//! Baseline predictor implementations.
//!
//! Each model implements the `Predictor` trait for one slot. They are simple
//! signal heuristics that stand in for the trained models and share the same
//! input checks.

mod audio;
mod ir;
mod validate;

pub use audio::{AudioConfig, AudioEventModel};
pub use ir::{IrConfig, IrStatusModel};
