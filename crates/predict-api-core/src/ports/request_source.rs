//! Request source port for reading prediction requests.

use crate::domain::PredictionRequest;

/// A request together with a label describing where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcedRequest {
    /// Origin label, e.g. `requests.jsonl:3`.
    pub source: String,
    /// The decoded request.
    pub request: PredictionRequest,
}

impl SourcedRequest {
    /// Creates a new sourced request.
    pub fn new(source: impl Into<String>, request: PredictionRequest) -> Self {
        Self {
            source: source.into(),
            request,
        }
    }
}

/// Port for reading requests from a source.
pub trait RequestSource: Send + Sync {
    /// Returns an iterator over requests from this source.
    ///
    /// # Errors
    ///
    /// Individual items may be errors if a request fails to decode.
    fn requests(&self) -> Box<dyn Iterator<Item = anyhow::Result<SourcedRequest>> + Send + '_>;

    /// Returns the total number of requests, if known.
    fn count_hint(&self) -> Option<usize>;
}
