//! Error types for the reader pipeline.
//!
//! Each layer has its own error: [`RequestError`] when an extraction request
//! is built, [`TransportError`] when an attempt fails on the wire, and
//! [`ReaderError`] for everything the pipeline can run into after that.
//! None of them escape [`crate::processor::Reader::read`]; they are turned
//! into an [`crate::model::ExtractionResult::Failure`] there.

use thiserror::Error;

use crate::model::ApiErrorEnvelope;

/// Invalid input while building an extraction request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Target URL must not be empty")]
    EmptyUrl,

    #[error("Invalid target URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    #[error("Invalid Reader API base URL: {0}")]
    InvalidApiBase(String),

    #[error("Failed to encode request body: {0}")]
    InvalidPayload(String),
}

/// Failure of a single attempt before any HTTP status was received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The attempt exceeded the per-attempt timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Connection refused, host unreachable or DNS failure.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Anything else reqwest reports (malformed request, body decode, ...).
    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Timeout(_) | TransportError::Connect(_))
    }
}

impl From<reqwest::Error> for TransportError {
    /// The request URL is dropped from the message: a GET URL carries the
    /// API key in its query string.
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Errors raised inside the reader pipeline.
#[derive(Error, Debug)]
pub enum ReaderError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The API answered with an error envelope (any status, including 200).
    #[error("Reader API error (HTTP {status}): {envelope}")]
    Api {
        status: u16,
        envelope: ApiErrorEnvelope,
    },

    /// The API answered with a non-200 status and no JSON error envelope.
    #[error("Request failed: HTTP {status}")]
    Http { status: u16, body: String },

    #[error("Failed to save result: {0}")]
    Save(#[from] std::io::Error),
}
