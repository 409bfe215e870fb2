//! Prediction router.
//!
//! Fans one request out to the predictor of every slot whose input is
//! present and assembles a single response. A predictor failure is recorded
//! in-band for its own slot and never reaches the caller.

use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{
    InferenceError, Prediction, PredictionRequest, PredictionResponse, Predictor, RegistryError,
    Slot, SlotInput, SlotResult,
};

/// How predictors are invoked for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchMode {
    /// One slot after another on the calling thread.
    #[default]
    Sequential,
    /// One scoped thread per present slot, all joined before the response is built.
    Concurrent,
}

/// Router settings.
#[derive(Debug, Clone, Default)]
pub struct RouterConfig {
    /// Dispatch strategy.
    pub dispatch: DispatchMode,
    /// Upper bound for a single predictor call. `None` waits indefinitely.
    ///
    /// With a timeout each call runs on its own detached thread. A predictor
    /// that never returns keeps its thread alive for the life of the process,
    /// one thread per timed-out call.
    pub timeout: Option<Duration>,
}

/// Routes requests to a fixed table of predictors, one per slot.
pub struct PredictionRouter {
    ir: Arc<dyn Predictor>,
    audio: Arc<dyn Predictor>,
    config: RouterConfig,
}

impl fmt::Debug for PredictionRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionRouter")
            .field("ir", &self.ir.name())
            .field("audio", &self.audio.name())
            .field("config", &self.config)
            .finish()
    }
}

impl PredictionRouter {
    /// Starts building a router.
    #[must_use]
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Returns the router settings.
    #[must_use]
    pub const fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Lists every slot with the name of its predictor.
    #[must_use]
    pub fn slots(&self) -> Vec<(Slot, &'static str)> {
        Slot::ALL
            .iter()
            .map(|&slot| (slot, self.predictor(slot).name()))
            .collect()
    }

    /// Routes a request to every slot with a present input.
    ///
    /// Never fails: absent inputs yield empty slot results and predictor
    /// failures yield `{status: "error", message}` for that slot only.
    #[must_use]
    pub fn route(&self, request: &PredictionRequest) -> PredictionResponse {
        let results = match self.config.dispatch {
            DispatchMode::Sequential => self.route_sequential(request),
            DispatchMode::Concurrent => self.route_concurrent(request),
        };
        PredictionResponse::from_slots(results)
    }

    fn route_sequential(&self, request: &PredictionRequest) -> Vec<(Slot, SlotResult)> {
        Slot::ALL
            .iter()
            .map(|&slot| {
                let result = match request.input(slot) {
                    Some(input) => self.invoke(slot, input),
                    None => absent(slot),
                };
                (slot, result)
            })
            .collect()
    }

    fn route_concurrent(&self, request: &PredictionRequest) -> Vec<(Slot, SlotResult)> {
        thread::scope(|scope| {
            let mut results = Vec::with_capacity(Slot::ALL.len());
            let mut pending = Vec::new();

            for slot in Slot::ALL {
                match request.input(slot) {
                    Some(input) => {
                        pending.push((slot, scope.spawn(move || self.invoke(slot, input))));
                    }
                    None => results.push((slot, absent(slot))),
                }
            }

            // A panicking predictor is a defect, not an inference failure.
            for (slot, handle) in pending {
                let result = handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
                results.push((slot, result));
            }

            results
        })
    }

    /// Calls one predictor inside the slot's failure boundary.
    ///
    /// A malformed input fails the slot without reaching the predictor.
    fn invoke(&self, slot: Slot, input: &SlotInput) -> SlotResult {
        let predictor = self.predictor(slot);

        let outcome = input.samples().and_then(|samples| {
            debug!(
                "Dispatching {} values to {} predictor {}",
                samples.len(),
                slot,
                predictor.name()
            );
            match self.config.timeout {
                Some(timeout) => {
                    predict_with_timeout(Arc::clone(predictor), samples.to_vec(), timeout)
                }
                None => predictor.predict(samples),
            }
        });

        match outcome {
            Ok(prediction) => SlotResult::Success(prediction),
            Err(e) => {
                warn!("{} predictor {} failed: {}", slot, predictor.name(), e);
                SlotResult::failed(e.to_string())
            }
        }
    }

    fn predictor(&self, slot: Slot) -> &Arc<dyn Predictor> {
        match slot {
            Slot::Ir => &self.ir,
            Slot::Audio => &self.audio,
        }
    }
}

fn absent(slot: Slot) -> SlotResult {
    debug!("No input for {} slot, skipping", slot);
    SlotResult::Absent
}

/// Runs a prediction on a detached worker and waits at most `timeout`.
///
/// An overrunning call keeps running on its worker; its result is dropped.
fn predict_with_timeout(
    predictor: Arc<dyn Predictor>,
    input: Vec<f32>,
    timeout: Duration,
) -> Result<Prediction, InferenceError> {
    let (tx, rx) = mpsc::channel();
    let name = format!("predict-{}", predictor.slot());

    thread::Builder::new()
        .name(name)
        .spawn(move || {
            // Receiver is gone once the caller timed out.
            let _ = tx.send(predictor.predict(&input));
        })
        .map_err(|e| InferenceError::Unavailable(format!("failed to spawn predictor: {e}")))?;

    match rx.recv_timeout(timeout) {
        Ok(outcome) => outcome,
        Err(RecvTimeoutError::Timeout) => Err(InferenceError::Timeout(timeout)),
        Err(RecvTimeoutError::Disconnected) => {
            Err(InferenceError::failed("predictor exited without a result"))
        }
    }
}

/// Builder for [`PredictionRouter`].
///
/// Every slot needs exactly one predictor; the table is checked once in
/// [`RouterBuilder::build`] instead of on each request.
#[derive(Default)]
pub struct RouterBuilder {
    predictors: Vec<Arc<dyn Predictor>>,
    config: RouterConfig,
}

impl RouterBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a predictor for the slot it declares.
    #[must_use]
    pub fn predictor(self, predictor: impl Predictor + 'static) -> Self {
        self.shared_predictor(Arc::new(predictor))
    }

    /// Registers an already shared predictor.
    #[must_use]
    pub fn shared_predictor(mut self, predictor: Arc<dyn Predictor>) -> Self {
        self.predictors.push(predictor);
        self
    }

    /// Replaces the router settings.
    #[must_use]
    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the dispatch strategy.
    #[must_use]
    pub fn dispatch(mut self, dispatch: DispatchMode) -> Self {
        self.config.dispatch = dispatch;
        self
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Builds the router.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if a slot has no predictor or more than one.
    pub fn build(self) -> Result<PredictionRouter, RegistryError> {
        let mut ir = None;
        let mut audio = None;

        for predictor in self.predictors {
            let slot = predictor.slot();
            let entry = match slot {
                Slot::Ir => &mut ir,
                Slot::Audio => &mut audio,
            };
            if entry.replace(predictor).is_some() {
                return Err(RegistryError::DuplicatePredictor(slot));
            }
        }

        let router = PredictionRouter {
            ir: ir.ok_or(RegistryError::MissingPredictor(Slot::Ir))?,
            audio: audio.ok_or(RegistryError::MissingPredictor(Slot::Audio))?,
            config: self.config,
        };
        debug!("Built router: {:?}", router);
        Ok(router)
    }
}
