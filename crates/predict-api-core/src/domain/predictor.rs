//! Predictor trait for pluggable inference collaborators.

use super::{InferenceError, Prediction, Slot};

/// Trait implemented by every inference collaborator.
///
/// A predictor serves exactly one slot. It receives that slot's opaque input
/// and returns an opaque result object which the router embeds verbatim.
pub trait Predictor: Send + Sync {
    /// Returns the name of this predictor.
    fn name(&self) -> &'static str;

    /// Returns the slot this predictor serves.
    fn slot(&self) -> Slot;

    /// Runs inference on one input.
    ///
    /// # Errors
    ///
    /// Returns an [`InferenceError`] if the input is unusable or inference
    /// fails. Malformed input must be reported here rather than answered with
    /// a bogus result.
    fn predict(&self, input: &[f32]) -> Result<Prediction, InferenceError>;
}
