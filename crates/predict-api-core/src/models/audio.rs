//! Audio event detection model.
//!
//! Reports a glass-break event when the RMS energy of the waveform reaches
//! the configured threshold.

#![allow(clippy::cast_precision_loss)]

use serde_json::json;
use tracing::debug;

use super::validate::check_samples;
use crate::domain::{InferenceError, Prediction, Predictor, Slot};

/// Configuration for audio event detection.
#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// RMS energy (0.0-1.0) at or above which an event is reported.
    pub event_threshold: f32,
    /// Required waveform length, if the model has a fixed input window.
    pub expected_len: Option<usize>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            event_threshold: 0.5,
            expected_len: None,
        }
    }
}

/// Audio event detection predictor.
pub struct AudioEventModel {
    config: AudioConfig,
}

impl AudioEventModel {
    /// Creates a new audio model with the given configuration.
    #[must_use]
    pub const fn new(config: AudioConfig) -> Self {
        Self { config }
    }
}

impl Default for AudioEventModel {
    fn default() -> Self {
        Self::new(AudioConfig::default())
    }
}

impl Predictor for AudioEventModel {
    fn name(&self) -> &'static str {
        "audio_event"
    }

    fn slot(&self) -> Slot {
        Slot::Audio
    }

    fn predict(&self, input: &[f32]) -> Result<Prediction, InferenceError> {
        check_samples(input, self.config.expected_len)?;

        let energy = input
            .iter()
            .map(|&s| f64::from(s) * f64::from(s))
            .sum::<f64>();
        let rms = (energy / input.len() as f64).sqrt();
        let peak = input.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()));
        let event = if rms >= f64::from(self.config.event_threshold) {
            "glass_break"
        } else {
            "none"
        };
        debug!(rms, peak, event, "Audio prediction");

        let mut prediction = Prediction::new();
        prediction.insert("status".into(), json!("ok"));
        prediction.insert("event".into(), json!(event));
        prediction.insert("rms".into(), json!(rms));
        prediction.insert("peak".into(), json!(peak));
        prediction.insert("model".into(), json!(self.name()));
        Ok(prediction)
    }
}
