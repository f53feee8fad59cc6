//! Error types for payload decoding.

use thiserror::Error;

/// Result type alias for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors raised while decoding a single upstream response.
///
/// A decode error fails only the fetch target it came from; the
/// collection loop decides what that means for the cycle.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("gzip error: {0}")]
    Gzip(#[source] std::io::Error),

    #[error("response has no data")]
    MissingData,

    #[error("stats history is empty")]
    EmptyHistory,

    #[error("upstream rejected request: {0}")]
    Rejected(String),
}
