//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the routing core and external adapters.

mod progress;
mod request_source;
mod response_output;

pub use progress::{ProgressEvent, ProgressSink};
pub use request_source::{RequestSource, SourcedRequest};
pub use response_output::{ResponseOutput, SourcedResponse};
