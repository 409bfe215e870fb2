//! Aggregate prediction response.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::Slot;

/// Opaque result object returned by a predictor.
pub type Prediction = Map<String, Value>;

/// Outcome recorded for one slot.
///
/// On the wire every variant is a JSON object:
/// - `Absent` is `{}`
/// - `Success` is the predictor's object, unchanged
/// - `Failed` is `{"status": "error", "message": ...}`
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SlotResult {
    /// The slot's input was missing, so its predictor was not invoked.
    #[default]
    Absent,
    /// The predictor returned a result.
    Success(Prediction),
    /// The predictor failed; the failure is reported in-band.
    Failed {
        /// Description of the failure.
        message: String,
    },
}

impl SlotResult {
    /// Creates a failed result.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Returns true if the slot reported an in-band error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns true if the slot's input was absent.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the predictor's result, if it succeeded.
    #[must_use]
    pub const fn prediction(&self) -> Option<&Prediction> {
        match self {
            Self::Success(prediction) => Some(prediction),
            _ => None,
        }
    }

    /// Returns the failure message, if the slot failed.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Rebuilds a slot result from its wire object.
    ///
    /// A predictor result that itself carries `status: "error"` with a string
    /// message cannot be told apart from a router failure and reads back as
    /// `Failed`.
    #[must_use]
    pub fn from_object(object: Prediction) -> Self {
        if object.is_empty() {
            return Self::Absent;
        }
        let is_error = object.get("status").and_then(Value::as_str) == Some("error");
        match (is_error, object.get("message").and_then(Value::as_str)) {
            (true, Some(message)) if object.len() == 2 => Self::failed(message),
            _ => Self::Success(object),
        }
    }
}

impl Serialize for SlotResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_map(Some(0))?.end(),
            Self::Success(prediction) => prediction.serialize(serializer),
            Self::Failed { message } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("status", "error")?;
                map.serialize_entry("message", message)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for SlotResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Prediction::deserialize(deserializer).map(Self::from_object)
    }
}

/// Aggregate response returned to the backend.
///
/// Every slot key is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// IR detection result.
    pub ir_detection: SlotResult,
    /// Audio event detection result.
    pub audio_detection: SlotResult,
    /// Response construction time (RFC 3339, UTC).
    pub timestamp: String,
}

impl PredictionResponse {
    /// Builds a response from per-slot results, stamped with the current time.
    ///
    /// Slots missing from `results` are recorded as absent.
    pub fn from_slots(results: impl IntoIterator<Item = (Slot, SlotResult)>) -> Self {
        let mut response = Self {
            ir_detection: SlotResult::Absent,
            audio_detection: SlotResult::Absent,
            timestamp: iso_timestamp(),
        };
        for (slot, result) in results {
            *response.slot_mut(slot) = result;
        }
        response
    }

    /// Returns the result recorded for a slot.
    #[must_use]
    pub const fn slot(&self, slot: Slot) -> &SlotResult {
        match slot {
            Slot::Ir => &self.ir_detection,
            Slot::Audio => &self.audio_detection,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut SlotResult {
        match slot {
            Slot::Ir => &mut self.ir_detection,
            Slot::Audio => &mut self.audio_detection,
        }
    }

    /// Number of slots that reported an in-band error.
    #[must_use]
    pub fn error_count(&self) -> usize {
        Slot::ALL
            .iter()
            .filter(|slot| self.slot(**slot).is_error())
            .count()
    }

    /// Returns true if any slot reported an in-band error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
#[must_use]
pub fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
