//! Error types for the amphibians client core.
//!
//! # Design
//! Failures are split by layer. `TransportError` means the round-trip itself
//! failed (no usable response). `ApiError` means a response arrived but was
//! not the expected 200 + JSON array. `FetchError` is what a repository
//! returns and keeps the two apart, because the view model only recovers from
//! the connectivity side.

use thiserror::Error;

/// A response was received but could not be turned into the expected value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned a status other than the expected one.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

/// The HTTP round-trip did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    /// Connection refused, DNS failure, TLS failure, truncated body and the like.
    #[error("I/O failure: {0}")]
    Io(String),

    /// The blocking task executing the request panicked or was cancelled.
    #[error("transport worker failed: {0}")]
    Worker(String),
}

/// Error returned by `AmphibiansRepository::fetch_all`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("connectivity error: {0}")]
    Connectivity(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl FetchError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, FetchError::Connectivity(_))
    }
}

/// Invalid client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid base URL {0:?}: expected http:// or https:// followed by a host")]
    InvalidBaseUrl(String),

    #[error("invalid timeout {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),
}
