//! Input checks shared by the baseline models.

use crate::domain::InferenceError;

/// Rejects inputs a model cannot run on.
pub(super) fn check_samples(
    input: &[f32],
    expected_len: Option<usize>,
) -> Result<(), InferenceError> {
    if input.is_empty() {
        return Err(InferenceError::invalid_input("input is empty"));
    }
    if let Some(expected) = expected_len {
        if input.len() != expected {
            return Err(InferenceError::invalid_input(format!(
                "bad shape: expected {expected} values, got {}",
                input.len()
            )));
        }
    }
    if let Some(index) = input.iter().position(|v| !v.is_finite()) {
        return Err(InferenceError::invalid_input(format!(
            "non-finite value at index {index}"
        )));
    }
    Ok(())
}
