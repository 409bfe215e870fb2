//! Predict API Core - Domain logic and prediction routing
//!
//! This crate contains the request/response domain types, the `Predictor`
//! trait implemented by inference collaborators, the `PredictionRouter` that
//! fans a request out to them, and baseline predictors for IR and audio.

pub mod domain;
pub mod models;
pub mod ports;
pub mod router;

pub use domain::{
    InferenceError, Prediction, PredictionRequest, PredictionResponse, Predictor, RegistryError,
    Slot, SlotInput, SlotResult,
};
pub use models::{AudioConfig, AudioEventModel, IrConfig, IrStatusModel};
pub use ports::{
    ProgressEvent, ProgressSink, RequestSource, ResponseOutput, SourcedRequest, SourcedResponse,
};
pub use router::{DispatchMode, PredictionRouter, RouterBuilder, RouterConfig};
