//! Error types for the todo service transport

use thiserror::Error;

/// Errors surfaced by the transport layer
///
/// The state layer does not distinguish between these beyond "the operation
/// was rejected" — reducers collapse every variant into the op's rejected
/// action. The variants exist for logging and for callers outside the store.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing `BOARDSYNC_API_URL` environment variable
    #[error("Missing BOARDSYNC_API_URL environment variable")]
    MissingBaseUrl,

    /// Missing `BOARDSYNC_API_KEY` environment variable
    #[error("Missing BOARDSYNC_API_KEY environment variable")]
    MissingApiKey,

    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be deserialized
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Unauthorized - invalid API key
    #[error("Unauthorized - invalid API key")]
    Unauthorized,

    /// Server returned a non-2xx status
    #[error("HTTP error (status {status}): {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Raw response body, for debugging
        body: String,
    },

    /// Server accepted the request but rejected the operation
    /// (`resultCode != 0` in the response envelope)
    #[error("Rejected by server: {}", messages.join("; "))]
    Rejected {
        /// Human-readable rejection messages
        messages: Vec<String>,
    },
}
