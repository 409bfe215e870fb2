//! Progress reporting port for UI integration.

use super::SourcedResponse;

/// Events emitted while routing a batch of requests.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Routing started for a request.
    Started {
        /// Origin of the request.
        source: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total requests in batch, if known.
        total: Option<usize>,
    },
    /// Routing completed for a request.
    Completed {
        /// The routed response.
        response: SourcedResponse,
    },
    /// A request was skipped because it could not be decoded.
    Skipped {
        /// Origin of the request.
        source: String,
        /// Reason for skipping.
        reason: String,
    },
    /// All requests have been processed.
    Finished {
        /// Total requests routed.
        routed: usize,
        /// Total requests skipped.
        skipped: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
