//! Test support utilities for predict-api.
//!
//! Provides mock predictors, mock ports and synthetic input builders for
//! testing the routing pipeline.
//!
//! # Example
//!
//! ```
//! use predict_api_core::{PredictionRouter, Slot};
//! use predict_api_test_support::{MockPredictor, SyntheticInput};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let ir = Arc::new(MockPredictor::responding(Slot::Ir, json!({"status": "ok"})));
//! let audio = Arc::new(MockPredictor::responding(Slot::Audio, json!({"status": "ok"})));
//! let router = PredictionRouter::builder()
//!     .shared_predictor(ir.clone())
//!     .shared_predictor(audio.clone())
//!     .build()
//!     .unwrap();
//!
//! router.route(&SyntheticInput::ir_only());
//! assert_eq!(ir.call_count(), 1);
//! assert_eq!(audio.call_count(), 0);
//! ```

mod builders;
mod mocks;

pub use builders::{prediction, SyntheticInput};
pub use mocks::{MockPredictor, MockProgressSink, MockRequestSource, MockResponseOutput};
