use thiserror::Error;

/// Errors from [`crate::distance::DistanceProvider`] and
/// [`crate::CostMatrixBuilder`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistanceError {
    /// No nodes were provided.
    ///
    /// A cost matrix needs at least the depot.
    #[error("at least one node is required")]
    EmptyInput,
    /// The routing service could not be reached.
    #[error("network error requesting {url}: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The routing service did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },
    /// The routing service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The routing service reported an error code.
    #[error("routing service error {code}: {message}")]
    ServiceError {
        /// Service status code, e.g. `"NoRoute"`.
        code: String,
        /// Service message.
        message: String,
    },
    /// The routing service found no route between the pair.
    #[error("no route found for {url}")]
    NoRoute {
        /// Requested URL.
        url: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Decoder error description.
        message: String,
    },
    /// A provider returned a negative or non-finite cost.
    #[error("invalid cost {value} from node {from} to node {to}")]
    InvalidCost {
        /// Origin node index.
        from: usize,
        /// Destination node index.
        to: usize,
        /// Offending value.
        value: f64,
    },
    /// A batch answer did not match the number of requested pairs.
    #[error("expected {expected} distances, provider returned {actual}")]
    LengthMismatch {
        /// Requested pair count.
        expected: usize,
        /// Returned value count.
        actual: usize,
    },
}
