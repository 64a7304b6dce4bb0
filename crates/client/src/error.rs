//! Error types for the catalog client.

/// Errors that can occur when calling the catalog API.
///
/// Cloneable so one failed fetch can be handed to every watcher of a key.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The base URL or a derived request URL did not parse.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The request never produced a response (connect, timeout, body read).
    #[error("request failed: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// The response body was not the expected JSON shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The watcher's background task has stopped.
    #[error("watcher closed")]
    Closed,
}

impl ClientError {
    /// HTTP status of the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
