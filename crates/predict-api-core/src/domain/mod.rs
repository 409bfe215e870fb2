//! Core domain types for prediction routing.

mod error;
mod predictor;
mod request;
mod response;
mod slot;

pub use error::{InferenceError, RegistryError};
pub use predictor::Predictor;
pub use request::{PredictionRequest, SlotInput};
pub use response::{iso_timestamp, Prediction, PredictionResponse, SlotResult};
pub use slot::{ParseSlotError, Slot};
