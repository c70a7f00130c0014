//! HTTP response types

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HttpError;

/// HTTP Response type - generic over the body type R and error type E
/// This is the primary return type for all HTTP operations
pub type Response<R, E = HttpError> = Result<R, E>;

/// Business code signalling success
pub const SUCCESS_CODE: i64 = 200;

/// Business code signalling a missing or expired login
pub const UNAUTHORIZED_CODE: i64 = 401;

/// Business payload returned by every backend endpoint
///
/// `code == 200` is success. Any other code is a business failure even when
/// the HTTP exchange itself succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerResult<T> {
    /// Business code
    pub code: i64,
    /// Server provided message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Payload, commonly absent on failures
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ServerResult<T> {
    /// Successful result carrying `data`
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: None,
            data: Some(data),
        }
    }

    /// Whether the business code is 200
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Whether the business code is 401
    pub fn is_unauthorized(&self) -> bool {
        self.code == UNAUTHORIZED_CODE
    }
}

impl ServerResult<Value> {
    /// Convert the untyped payload into `T`
    ///
    /// On success the payload must fit `T`. On a business failure a payload
    /// that does not fit is dropped instead, so callers still see the code
    /// and message.
    pub fn into_typed<T: DeserializeOwned>(self) -> Response<ServerResult<T>> {
        let data = match self.data {
            None | Some(Value::Null) => None,
            Some(value) if self.code == SUCCESS_CODE => Some(serde_json::from_value(value)?),
            Some(value) => match serde_json::from_value(value) {
                Ok(data) => Some(data),
                Err(err) => {
                    tracing::debug!(
                        "Dropping payload of failed response (code {}): {}",
                        self.code,
                        err
                    );
                    None
                }
            },
        };

        Ok(ServerResult {
            code: self.code,
            message: self.message,
            data,
        })
    }
}

/// Transport envelope handed to response interceptors
#[derive(Debug, Clone)]
pub struct TransportResponse {
    status: u16,
    headers: HeaderMap,
    body: ServerResult<Value>,
}

impl TransportResponse {
    /// Assemble an envelope
    pub fn new(status: u16, headers: HeaderMap, body: ServerResult<Value>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Decoded business payload
    pub fn body(&self) -> &ServerResult<Value> {
        &self.body
    }

    /// Mutable business payload
    pub fn body_mut(&mut self) -> &mut ServerResult<Value> {
        &mut self.body
    }

    /// Drop status and headers, keeping only the business payload
    pub fn into_body(self) -> ServerResult<Value> {
        self.body
    }
}
