//! HTTP error types

use std::fmt;

use thiserror::Error;

/// Why an in-flight request was aborted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    /// A newer request with the same fingerprint replaced this one
    Duplicate,
    /// Cancelled through `cancel_request`, `cancel_fingerprint` or `cancel_all_request`
    User,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Duplicate => write!(f, "superseded by a duplicate request"),
            CancelReason::User => write!(f, "cancelled by caller"),
        }
    }
}

/// HTTP errors that can occur during requests
///
/// Business failures (a `code` other than 200 in the response body) are not
/// errors at this level: they resolve to a [`crate::ServerResult`] carrying the code.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request was aborted before it completed
    #[error("Request cancelled: {0}")]
    Cancelled(CancelReason),
    /// HTTP error with status code
    #[error("HTTP error ({status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
    /// Request timeout
    #[error("Request timeout")]
    Timeout,
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Request URL could not be built
    #[error("Invalid URL: {0}")]
    Url(String),
    /// Header name or value rejected
    #[error("Invalid header: {0}")]
    Header(String),
    /// Client build error
    #[error("Client build error: {0}")]
    Build(String),
    /// Other error
    #[error("{0}")]
    Other(String),
}

impl HttpError {
    /// True when the request was aborted rather than failed
    pub fn is_cancelled(&self) -> bool {
        matches!(self, HttpError::Cancelled(_))
    }

    /// The cancel reason, if this is a cancellation
    pub fn cancel_reason(&self) -> Option<CancelReason> {
        match self {
            HttpError::Cancelled(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::Timeout
        } else if err.is_builder() {
            HttpError::Build(err.to_string())
        } else if err.is_connect() {
            HttpError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            HttpError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            HttpError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        HttpError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for HttpError {
    fn from(err: url::ParseError) -> Self {
        HttpError::Url(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderName> for HttpError {
    fn from(err: reqwest::header::InvalidHeaderName) -> Self {
        HttpError::Header(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for HttpError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        HttpError::Header(err.to_string())
    }
}
