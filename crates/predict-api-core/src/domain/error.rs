//! Error types raised by predictors and the router registry.

use std::time::Duration;

use thiserror::Error;

use super::Slot;

/// Failure raised by a predictor for a single invocation.
///
/// This is the only failure kind the router converts into an in-band error.
/// The string variants display as the bare description so it can be copied
/// verbatim into the `message` field of the slot result.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// Input was present but unusable (wrong shape, non-finite samples).
    #[error("{0}")]
    InvalidInput(String),
    /// The model backing the predictor could not be reached or loaded.
    #[error("{0}")]
    Unavailable(String),
    /// Inference ran and failed.
    #[error("{0}")]
    Failed(String),
    /// The call did not finish within the configured timeout.
    #[error("prediction timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl InferenceError {
    /// Shorthand for [`InferenceError::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Shorthand for [`InferenceError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Error raised while assembling the predictor table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No predictor was registered for a slot.
    #[error("no predictor registered for slot '{0}'")]
    MissingPredictor(Slot),
    /// A slot was registered more than once.
    #[error("predictor for slot '{0}' registered twice")]
    DuplicatePredictor(Slot),
}
