//! IR presence detection model.
//!
//! Flags a human presence when the mean normalized intensity of the IR
//! tensor reaches the configured threshold.

#![allow(clippy::cast_precision_loss)]

use serde_json::json;
use tracing::debug;

use super::validate::check_samples;
use crate::domain::{InferenceError, Prediction, Predictor, Slot};

/// Configuration for IR presence detection.
#[derive(Debug, Clone)]
pub struct IrConfig {
    /// Mean intensity (0.0-1.0) at or above which a presence is reported.
    pub presence_threshold: f32,
    /// Required tensor length, if the model has a fixed input shape.
    pub expected_len: Option<usize>,
}

impl Default for IrConfig {
    fn default() -> Self {
        Self {
            presence_threshold: 0.5,
            expected_len: None,
        }
    }
}

/// IR presence detection predictor.
pub struct IrStatusModel {
    config: IrConfig,
}

impl IrStatusModel {
    /// Creates a new IR model with the given configuration.
    #[must_use]
    pub const fn new(config: IrConfig) -> Self {
        Self { config }
    }
}

impl Default for IrStatusModel {
    fn default() -> Self {
        Self::new(IrConfig::default())
    }
}

impl Predictor for IrStatusModel {
    fn name(&self) -> &'static str {
        "ir_status"
    }

    fn slot(&self) -> Slot {
        Slot::Ir
    }

    fn predict(&self, input: &[f32]) -> Result<Prediction, InferenceError> {
        check_samples(input, self.config.expected_len)?;

        // f64 keeps the sum of large finite samples finite.
        let score = input.iter().map(|&v| f64::from(v)).sum::<f64>() / input.len() as f64;
        let class = if score >= f64::from(self.config.presence_threshold) {
            "human"
        } else {
            "none"
        };
        debug!(score, class, "IR prediction");

        let mut prediction = Prediction::new();
        prediction.insert("status".into(), json!("ok"));
        prediction.insert("class".into(), json!(class));
        prediction.insert("score".into(), json!(score));
        prediction.insert("model".into(), json!(self.name()));
        Ok(prediction)
    }
}
