//! Outgoing request model

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;

use crate::error::HttpError;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Request body as handed to the transport
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Declared JSON body, sent as `application/json`
    Json(serde_json::Value),
    /// Pre-serialized text body with an optional declared content type
    Text {
        /// Raw body
        content: String,
        /// Declared `Content-Type`, if any
        content_type: Option<String>,
    },
    /// `application/x-www-form-urlencoded` fields
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Serialize `body` into a declared JSON body
    pub fn json<B: Serialize + ?Sized>(body: &B) -> Result<Self, HttpError> {
        Ok(RequestBody::Json(serde_json::to_value(body)?))
    }

    /// Untyped text body
    pub fn text(content: impl Into<String>) -> Self {
        RequestBody::Text {
            content: content.into(),
            content_type: None,
        }
    }

    /// Whether the body declares itself as JSON
    pub fn is_declared_json(&self) -> bool {
        match self {
            RequestBody::Json(_) => true,
            RequestBody::Text {
                content_type: Some(content_type),
                ..
            } => content_type
                .split(';')
                .next()
                .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(JSON_CONTENT_TYPE)),
            _ => false,
        }
    }
}

/// Per-call options: query params, extra headers and a timeout override
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub(crate) params: Vec<(String, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) timeout: Option<Duration>,
}

impl RequestOptions {
    /// Empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query parameter; order is preserved on the wire and in the fingerprint
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Append several query parameters
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    /// Add a header to the request
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Override the client-wide timeout for this call
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A request on its way through the interceptor chain
///
/// Request interceptors receive it by value and hand back the (possibly
/// modified) request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    url: String,
    params: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<RequestBody>,
    timeout: Option<Duration>,
}

impl ApiRequest {
    /// Request for `url` with no params, headers or body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Build a request from per-call options
    pub fn with_options(
        method: Method,
        url: impl Into<String>,
        options: RequestOptions,
    ) -> Result<Self, HttpError> {
        let mut request = Self::new(method, url);
        request.params = options.params;
        request.timeout = options.timeout;
        for (key, value) in &options.headers {
            request.set_header(key, value)?;
        }
        Ok(request)
    }

    /// Attach a body
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// HTTP method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// URL as given by the caller, before the base URL is applied
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query parameters in insertion order
    pub fn query(&self) -> &[(String, String)] {
        &self.params
    }

    /// Headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable headers
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Insert or replace a header
    pub fn set_header(&mut self, key: &str, value: &str) -> Result<(), HttpError> {
        let name = HeaderName::from_bytes(key.as_bytes())?;
        let value = HeaderValue::from_str(value)?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Request body
    pub fn request_body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Per-call timeout override
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Apply this request onto a reqwest builder for `url`
    pub(crate) fn into_reqwest(
        self,
        client: &reqwest::Client,
        url: url::Url,
    ) -> reqwest::RequestBuilder {
        let mut builder = client.request(self.method, url).headers(self.headers);

        if !self.params.is_empty() {
            builder = builder.query(&self.params);
        }

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        match self.body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Text {
                content,
                content_type,
            }) => {
                let builder = match content_type {
                    Some(content_type) => builder.header(CONTENT_TYPE, content_type),
                    None => builder,
                };
                builder.body(content)
            }
            Some(RequestBody::Form(fields)) => builder.form(&fields),
            None => builder,
        }
    }
}
