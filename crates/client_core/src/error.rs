use thiserror::Error;

/// Failure outcome of a catalog fetch, surfaced verbatim to the view for the
/// current request and swallowed for superseded ones.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Transport-level failure: connectivity, TLS, or an unreadable body.
    #[error("catalog request failed: {0}")]
    Network(String),
    /// The catalog service answered with an error response.
    #[error("catalog service error (status {status}): {message}")]
    Service { status: u16, message: String },
}
