//! Prediction slots.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One named prediction capability with its own input key, predictor and
/// output entry.
///
/// Adding a slot requires a matching field in the request, the response and
/// the router table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Infrared presence detection.
    Ir,
    /// Audio event detection.
    Audio,
}

impl Slot {
    /// Every slot, in response order.
    pub const ALL: [Self; 2] = [Self::Ir, Self::Audio];

    /// Short name used in logs, config sections and CLI flags.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ir => "ir",
            Self::Audio => "audio",
        }
    }

    /// Request key carrying this slot's input.
    #[must_use]
    pub const fn input_key(self) -> &'static str {
        match self {
            Self::Ir => "ir_input_tensor",
            Self::Audio => "audio_waveform_array",
        }
    }

    /// Response key carrying this slot's result.
    #[must_use]
    pub const fn output_key(self) -> &'static str {
        match self {
            Self::Ir => "ir_detection",
            Self::Audio => "audio_detection",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown slot name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown slot '{0}' (expected one of: ir, audio)")]
pub struct ParseSlotError(String);

impl FromStr for Slot {
    type Err = ParseSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseSlotError(s.to_string()))
    }
}
