//! Standardized prediction request.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{InferenceError, Slot};

/// Aggregate request sent by the backend.
///
/// Each field is one slot's input. A missing key and an explicit `null`
/// both mean "do not invoke this slot"; an empty array is a present input and
/// is handed to the predictor as-is. Unknown keys are ignored.
///
/// Slots decode independently: a value of the wrong shape in one slot is kept
/// as [`SlotInput::Malformed`] and never prevents the other slot from decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionRequest {
    /// Input tensor for the IR detection model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ir_input_tensor: Option<SlotInput>,
    /// Waveform samples for the audio event model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_waveform_array: Option<SlotInput>,
}

/// A present input for one slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotInput {
    /// A flat array of numbers.
    Samples(Vec<f32>),
    /// A value that is not a flat array of numbers.
    Malformed {
        /// The value as received.
        raw: Value,
        /// Why it could not be read as samples.
        message: String,
    },
}

impl SlotInput {
    /// Reads a raw JSON value as samples, keeping it as malformed if it is not
    /// a flat array of numbers.
    #[must_use]
    pub fn from_value(raw: Value) -> Self {
        match serde_json::from_value::<Vec<f32>>(raw.clone()) {
            Ok(samples) => Self::Samples(samples),
            Err(e) => Self::Malformed {
                raw,
                message: e.to_string(),
            },
        }
    }

    /// Returns the samples, or `None` if the input is malformed.
    #[must_use]
    pub fn as_samples(&self) -> Option<&[f32]> {
        match self {
            Self::Samples(samples) => Some(samples.as_slice()),
            Self::Malformed { .. } => None,
        }
    }

    /// Returns the samples a predictor runs on.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::InvalidInput`] if the input is malformed.
    pub fn samples(&self) -> Result<&[f32], InferenceError> {
        match self {
            Self::Samples(samples) => Ok(samples.as_slice()),
            Self::Malformed { message, .. } => Err(InferenceError::invalid_input(message.clone())),
        }
    }

    /// Returns true if the input could not be read as samples.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

impl Serialize for SlotInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Samples(samples) => samples.serialize(serializer),
            Self::Malformed { raw, .. } => raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for SlotInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl PredictionRequest {
    /// Creates a request with no inputs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the IR input tensor.
    #[must_use]
    pub fn with_ir(mut self, tensor: impl Into<Vec<f32>>) -> Self {
        self.ir_input_tensor = Some(SlotInput::Samples(tensor.into()));
        self
    }

    /// Sets the audio waveform.
    #[must_use]
    pub fn with_audio(mut self, waveform: impl Into<Vec<f32>>) -> Self {
        self.audio_waveform_array = Some(SlotInput::Samples(waveform.into()));
        self
    }

    /// Returns the input for a slot, or `None` if it was absent.
    #[must_use]
    pub const fn input(&self, slot: Slot) -> Option<&SlotInput> {
        match slot {
            Slot::Ir => self.ir_input_tensor.as_ref(),
            Slot::Audio => self.audio_waveform_array.as_ref(),
        }
    }

    /// Returns the well-formed samples for a slot, if any.
    #[must_use]
    pub fn samples(&self, slot: Slot) -> Option<&[f32]> {
        self.input(slot).and_then(SlotInput::as_samples)
    }

    /// Drops the input for a slot so it is treated as absent.
    pub fn clear(&mut self, slot: Slot) {
        match slot {
            Slot::Ir => self.ir_input_tensor = None,
            Slot::Audio => self.audio_waveform_array = None,
        }
    }

    /// Returns true if no slot has an input.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Slot::ALL.iter().all(|slot| self.input(*slot).is_none())
    }
}
