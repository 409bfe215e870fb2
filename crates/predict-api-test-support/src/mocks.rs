//! Mock implementations of the predictor trait and core ports.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use predict_api_core::ports::{
    ProgressEvent, ProgressSink, RequestSource, ResponseOutput, SourcedRequest, SourcedResponse,
};
use predict_api_core::{InferenceError, Prediction, Predictor, Slot};
use serde_json::Value;

use crate::builders::prediction;

/// Mock implementation of `Predictor` for testing.
///
/// Returns a scripted outcome and records every input it receives.
pub struct MockPredictor {
    name: &'static str,
    slot: Slot,
    outcome: Result<Prediction, InferenceError>,
    delay: Option<Duration>,
    panic_message: Option<&'static str>,
    inputs: Mutex<Vec<Vec<f32>>>,
}

impl MockPredictor {
    /// Creates a predictor that always returns `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a JSON object.
    #[must_use]
    pub fn responding(slot: Slot, value: Value) -> Self {
        Self::with_outcome(slot, Ok(prediction(value)))
    }

    /// Creates a predictor that always fails with `error`.
    #[must_use]
    pub fn failing(slot: Slot, error: InferenceError) -> Self {
        Self::with_outcome(slot, Err(error))
    }

    /// Creates a predictor that panics with `message` on every call.
    #[must_use]
    pub fn panicking(slot: Slot, message: &'static str) -> Self {
        let mut mock = Self::with_outcome(slot, Err(InferenceError::failed(message)));
        mock.panic_message = Some(message);
        mock
    }

    fn with_outcome(slot: Slot, outcome: Result<Prediction, InferenceError>) -> Self {
        Self {
            name: "mock",
            slot,
            outcome,
            delay: None,
            panic_message: None,
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Sets the reported predictor name.
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Makes every call sleep before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns the number of times `predict()` was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns every input received, in call order.
    #[must_use]
    pub fn inputs(&self) -> Vec<Vec<f32>> {
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Predictor for MockPredictor {
    fn name(&self) -> &'static str {
        self.name
    }

    fn slot(&self) -> Slot {
        self.slot
    }

    fn predict(&self, input: &[f32]) -> Result<Prediction, InferenceError> {
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(input.to_vec());
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        if let Some(message) = self.panic_message {
            panic!("{message}");
        }
        self.outcome.clone()
    }
}

/// Mock implementation of `RequestSource` for testing.
///
/// Yields pre-built requests; `Err` entries become decode errors.
pub struct MockRequestSource {
    items: Vec<Result<SourcedRequest, String>>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockRequestSource {
    /// Creates a new mock source with the given requests.
    #[must_use]
    pub fn new(requests: Vec<SourcedRequest>) -> Self {
        Self::with_items(requests.into_iter().map(Ok).collect())
    }

    /// Creates a mock source that mixes requests and decode failures.
    #[must_use]
    pub fn with_items(items: Vec<Result<SourcedRequest, String>>) -> Self {
        Self {
            items,
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl RequestSource for MockRequestSource {
    fn requests(&self) -> Box<dyn Iterator<Item = anyhow::Result<SourcedRequest>> + Send + '_> {
        if let Ok(mut c) = self.iteration_count.lock() {
            *c += 1;
        }
        Box::new(self.items.iter().map(|item| match item {
            Ok(request) => Ok(request.clone()),
            Err(reason) => Err(anyhow::anyhow!("{reason}")),
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Mock implementation of `ResponseOutput` for testing.
///
/// Captures responses for later assertions.
pub struct MockResponseOutput {
    responses: Arc<Mutex<Vec<SourcedResponse>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResponseOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured responses.
    #[must_use]
    pub fn responses(&self) -> Vec<SourcedResponse> {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockResponseOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseOutput for MockResponseOutput {
    fn write(&self, response: &SourcedResponse) -> anyhow::Result<()> {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(response.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Ok(mut c) = self.flush_count.lock() {
            *c += 1;
        }
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Started { .. }))
            .count()
    }

    /// Returns the number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Skipped { .. }))
            .count()
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { routed, skipped } => Some((*routed, *skipped)),
            _ => None,
        })
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
