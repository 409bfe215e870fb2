//! Synthetic input builders for testing.

#![allow(clippy::cast_precision_loss)]

use predict_api_core::{Prediction, PredictionRequest};
use serde_json::Value;

/// Converts a JSON object literal into a [`Prediction`].
///
/// # Panics
///
/// Panics if `value` is not a JSON object.
#[must_use]
pub fn prediction(value: Value) -> Prediction {
    match value {
        Value::Object(map) => map,
        other => panic!("prediction must be a JSON object, got {other}"),
    }
}

/// Builder for synthetic tensors, waveforms and requests.
pub struct SyntheticInput;

impl SyntheticInput {
    // === Signals ===

    /// Creates a signal with every sample set to `value`.
    #[must_use]
    pub fn constant(len: usize, value: f32) -> Vec<f32> {
        vec![value; len]
    }

    /// Creates an all-zero signal.
    #[must_use]
    pub fn silence(len: usize) -> Vec<f32> {
        Self::constant(len, 0.0)
    }

    /// Creates a linear ramp from 0.0 up to 1.0 (inclusive).
    #[must_use]
    pub fn ramp(len: usize) -> Vec<f32> {
        if len < 2 {
            return Self::silence(len);
        }
        let step = 1.0 / (len - 1) as f32;
        (0..len).map(|i| i as f32 * step).collect()
    }

    /// Creates a sine wave with the given peak amplitude and cycle count.
    #[must_use]
    pub fn sine(len: usize, amplitude: f32, cycles: f32) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let phase = std::f32::consts::TAU * cycles * i as f32 / len as f32;
                amplitude * phase.sin()
            })
            .collect()
    }

    // === Requests ===

    /// The request used throughout the docs: four-value IR tensor and waveform.
    #[must_use]
    pub fn sample_request() -> PredictionRequest {
        PredictionRequest::new()
            .with_ir(vec![0.1, 0.2, 0.3, 0.4])
            .with_audio(vec![0.9, 0.8, 0.7, 0.6])
    }

    /// A request carrying only an IR tensor.
    #[must_use]
    pub fn ir_only() -> PredictionRequest {
        PredictionRequest::new().with_ir(vec![0.1, 0.2, 0.3, 0.4])
    }

    /// A request carrying only an audio waveform.
    #[must_use]
    pub fn audio_only() -> PredictionRequest {
        PredictionRequest::new().with_audio(vec![0.9, 0.8, 0.7, 0.6])
    }
}
