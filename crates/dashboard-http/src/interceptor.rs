//! Caller supplied interceptor stages
//!
//! The chain around every call is fixed:
//!
//! 1. built-in de-duplication (fingerprint + registry)
//! 2. [`Interceptors::on_request`], or [`Interceptors::on_request_error`] when it fails
//! 3. transport
//! 4. [`Interceptors::on_response`] for decoded responses, or
//!    [`Interceptors::on_response_error`] for transport level failures
//! 5. built-in terminal stage (release the registry entry, unwrap the body)
//!
//! Hooks are synchronous and run on the calling task.

use crate::error::HttpError;
use crate::request::ApiRequest;
use crate::response::TransportResponse;

/// Caller hooks wired into a client at construction
///
/// Every hook defaults to passing its input through unchanged.
pub trait Interceptors: Send + Sync + 'static {
    /// Transform the outgoing request, e.g. to inject credentials
    fn on_request(&self, request: ApiRequest) -> Result<ApiRequest, HttpError> {
        Ok(request)
    }

    /// Convert a failure of [`Interceptors::on_request`] into the error returned to the caller
    fn on_request_error(&self, error: HttpError) -> HttpError {
        error
    }

    /// Inspect or rewrite a decoded response
    fn on_response(&self, response: TransportResponse) -> Result<TransportResponse, HttpError> {
        Ok(response)
    }

    /// Handle a transport level failure, including cancellations
    fn on_response_error(&self, error: HttpError) -> HttpError {
        error
    }
}

/// Interceptor set that leaves every request and response untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInterceptors;

impl Interceptors for NoInterceptors {}

impl<T: Interceptors> Interceptors for std::sync::Arc<T> {
    fn on_request(&self, request: ApiRequest) -> Result<ApiRequest, HttpError> {
        (**self).on_request(request)
    }

    fn on_request_error(&self, error: HttpError) -> HttpError {
        (**self).on_request_error(error)
    }

    fn on_response(&self, response: TransportResponse) -> Result<TransportResponse, HttpError> {
        (**self).on_response(response)
    }

    fn on_response_error(&self, error: HttpError) -> HttpError {
        (**self).on_response_error(error)
    }
}
