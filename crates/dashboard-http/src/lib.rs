//! De-duplicating, cancelable HTTP client for the admin dashboard
//!
//! Every call is tagged with a [`Fingerprint`] derived from its method, URL,
//! query params and JSON body. Issuing a call whose fingerprint is already in
//! flight aborts the older one. Calls can also be cancelled by URL or all at
//! once, and run through a fixed chain of [`Interceptors`].
//!
//! Responses follow the backend's `{ code, message, data }` envelope and are
//! returned as a [`ServerResult`]. Transport failures and cancellations are
//! errors; business failures are not.
//!
//! # Example
//!
//! ```no_run
//! use dashboard_http::{HttpClient, RequestOptions, Response, ServerResult};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Page {
//!     total: u64,
//! }
//!
//! async fn example() -> Response<ServerResult<Page>> {
//!     let client = HttpClient::new("https://admin.example.com/api")?;
//!     client
//!         .get(
//!             "/authority/user/page",
//!             RequestOptions::new().param("page", 1).param("pageSize", 20),
//!         )
//!         .await
//! }
//! ```

mod client;
mod error;
pub mod fingerprint;
mod interceptor;
mod registry;
mod request;
mod response;

pub use client::{HttpClient, HttpClientBuilder, DEFAULT_TIMEOUT};
pub use error::{CancelReason, HttpError};
pub use fingerprint::Fingerprint;
pub use interceptor::{Interceptors, NoInterceptors};
pub use registry::{AbortSignal, InFlightGuard, InFlightRegistry};
pub use request::{ApiRequest, RequestBody, RequestOptions};
pub use reqwest::header;
pub use reqwest::Method;
pub use response::{Response, ServerResult, TransportResponse, SUCCESS_CODE, UNAUTHORIZED_CODE};
