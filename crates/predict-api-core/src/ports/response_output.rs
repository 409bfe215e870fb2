//! Response output port for writing routed responses.

use serde::{Deserialize, Serialize};

use crate::domain::PredictionResponse;

/// A response tagged with the origin of its request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcedResponse {
    /// Origin label of the request.
    pub source: String,
    /// The aggregate response.
    #[serde(flatten)]
    pub response: PredictionResponse,
}

/// Port for outputting responses.
pub trait ResponseOutput: Send + Sync {
    /// Writes a single response.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, response: &SourcedResponse) -> anyhow::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
