//! Error types for the Thematic client.

use thiserror::Error;

/// Errors that can occur when using the Thematic client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered a strict endpoint with a non-200 status.
    #[error("{operation}: request failed with status {status}: {message}")]
    Api {
        /// Client operation that issued the request.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        message: String,
    },

    /// Response body was not a JSON envelope.
    #[error("{operation}: bad response (status {status}): {body}")]
    BadResponse {
        /// Client operation that issued the request.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Envelope reported success but lacks a field the operation needs.
    #[error("{operation}: bad response, missing `{missing}`")]
    Protocol {
        /// Client operation that issued the request.
        operation: &'static str,
        /// Name of the missing field.
        missing: &'static str,
    },

    /// Envelope status was not `success`.
    #[error("{operation}: request rejected ({message})")]
    Rejected {
        /// Client operation that issued the request.
        operation: &'static str,
        /// Error message supplied by the server.
        message: String,
    },

    /// Login failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Job reached the `errored` state.
    #[error("job {job_id} errored and did not complete")]
    JobErrored {
        /// Job identifier.
        job_id: String,
    },

    /// Job reached the `canceled` state.
    #[error("job {job_id} was canceled")]
    JobCanceled {
        /// Job identifier.
        job_id: String,
    },

    /// The continuation callback asked the wait loop to stop.
    #[error("waiting for job {job_id} was interrupted")]
    Interrupted {
        /// Job identifier.
        job_id: String,
    },

    /// Job status could not be fetched within the retry budget.
    #[error("failure waiting for job {job_id} after {attempts} tries: {source}")]
    PollFailed {
        /// Job identifier.
        job_id: String,
        /// Number of consecutive failed attempts.
        attempts: u32,
        /// Last error seen.
        #[source]
        source: Box<ClientError>,
    },

    /// Local file or sink I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to deserialize the `data` payload.
    #[error("Failed to deserialize response: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl ClientError {
    /// Message supplied by the server, if this error carries one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } | Self::Api { message, .. } => Some(message),
            Self::Auth(message) => Some(message),
            Self::PollFailed { source, .. } => source.server_message(),
            _ => None,
        }
    }

    /// Whether the error is the terminal outcome of a job rather than a
    /// failure to talk to the service.
    pub fn is_job_outcome(&self) -> bool {
        matches!(self, Self::JobErrored { .. } | Self::JobCanceled { .. })
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
