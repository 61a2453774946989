//! Error types for the REST client.
//!
//! # Design
//! HTTP error statuses are deliberately absent: a 404 or a 500 comes back as a
//! normal `HttpResponse` and the caller decides what it means. Errors are
//! reserved for things the client itself could not do: reach the server,
//! encode the body, or turn a successful body into the requested type.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = RestError> = std::result::Result<T, E>;

/// Errors returned by `RestClient` and `RequestBuilder`.
#[derive(Debug, Error)]
pub enum RestError {
    /// The base address could not be parsed, or it cannot carry a path.
    #[error("invalid endpoint `{url}`: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// The transport failed before a response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A successful response used a content type with no registered deserializer.
    #[error("no deserializer registered for content type `{0}`")]
    NoDeserializer(String),

    /// A successful response carried a body but no Content-Type header.
    #[error("response has a body but no content type")]
    MissingContentType,

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// A configuration value from the environment was malformed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Failures raised by a `Transport` implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The ureq agent failed (DNS, connection refused, timeout, ...).
    #[error("http transport failed: {0}")]
    Ureq(#[from] ureq::Error),

    /// Failure reported by a custom transport.
    #[error("transport failed: {0}")]
    Other(String),
}
