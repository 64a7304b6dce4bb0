//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// The `Display` text of each variant is the caller-facing message; the HTTP
/// layer surfaces it verbatim as `statusMessage`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or missing input (e.g. missing required fields).
    #[error("{0}")]
    InvalidInput(String),

    /// An identifier was invalid (e.g. absent from the request path).
    #[error("{0}")]
    InvalidId(String),

    /// A requested resource was not found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The operation is not supported on this resource.
    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound(resource)
    }
}
