//! HTTP client wrapper

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::error::HttpError;
use crate::fingerprint::{self, Fingerprint};
use crate::interceptor::{Interceptors, NoInterceptors};
use crate::registry::{AbortSignal, InFlightRegistry};
use crate::request::{ApiRequest, RequestBody, RequestOptions};
use crate::response::{Response, ServerResult, TransportResponse};

/// Client-wide request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// De-duplicating, cancelable HTTP client bound to one base URL
///
/// Each client owns its registry of in-flight requests; clones share it.
pub struct HttpClient<I = NoInterceptors> {
    inner: reqwest::Client,
    base_url: Url,
    registry: InFlightRegistry,
    interceptors: Arc<I>,
}

impl<I> Clone for HttpClient<I> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            base_url: self.base_url.clone(),
            registry: self.registry.clone(),
            interceptors: Arc::clone(&self.interceptors),
        }
    }
}

impl<I> fmt::Debug for HttpClient<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("in_flight", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Client for `base_url` with default settings and no interceptors
    pub fn new(base_url: &str) -> Response<Self> {
        Self::builder(base_url).build()
    }

    /// Create a new HTTP client builder
    pub fn builder(base_url: impl Into<String>) -> HttpClientBuilder {
        HttpClientBuilder::new(base_url)
    }
}

impl<I: Interceptors> HttpClient<I> {
    /// Base URL relative paths are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Registry of outstanding requests
    pub fn registry(&self) -> &InFlightRegistry {
        &self.registry
    }

    /// Number of requests currently in flight
    pub fn in_flight(&self) -> usize {
        self.registry.len()
    }

    /// GET request
    pub async fn get<T>(&self, url: &str, options: RequestOptions) -> Response<ServerResult<T>>
    where
        T: DeserializeOwned,
    {
        let request = ApiRequest::with_options(Method::GET, url, options)?;
        self.send(request).await
    }

    /// POST with JSON body
    pub async fn post<T, B>(
        &self,
        url: &str,
        body: &B,
        options: RequestOptions,
    ) -> Response<ServerResult<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request =
            ApiRequest::with_options(Method::POST, url, options)?.body(RequestBody::json(body)?);
        self.send(request).await
    }

    /// PUT with JSON body
    pub async fn put<T, B>(
        &self,
        url: &str,
        body: &B,
        options: RequestOptions,
    ) -> Response<ServerResult<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request =
            ApiRequest::with_options(Method::PUT, url, options)?.body(RequestBody::json(body)?);
        self.send(request).await
    }

    /// DELETE request
    pub async fn delete<T>(&self, url: &str, options: RequestOptions) -> Response<ServerResult<T>>
    where
        T: DeserializeOwned,
    {
        let request = ApiRequest::with_options(Method::DELETE, url, options)?;
        self.send(request).await
    }

    /// Run `request` through the interceptor chain
    ///
    /// Transport failures and cancellations are returned as errors. Business
    /// failures resolve to a [`ServerResult`] whose `code` is not 200.
    #[instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    pub async fn send<T>(&self, request: ApiRequest) -> Response<ServerResult<T>>
    where
        T: DeserializeOwned,
    {
        let guard = self
            .registry
            .register(fingerprint::of_request(&request), request.url());

        let request = self
            .interceptors
            .on_request(request)
            .map_err(|err| self.interceptors.on_request_error(err))?;

        let response = match self.dispatch(request, guard.signal()).await {
            Ok(response) => self.interceptors.on_response(response)?,
            Err(err) => {
                if !err.is_cancelled() {
                    tracing::warn!("Request failed: {}", err);
                }
                return Err(self.interceptors.on_response_error(err));
            }
        };

        self.registry.release(guard);
        response.into_body().into_typed()
    }

    async fn dispatch(
        &self,
        request: ApiRequest,
        signal: &AbortSignal,
    ) -> Response<TransportResponse> {
        let url = self.resolve_url(request.url())?;
        let builder = request.into_reqwest(&self.inner, url);

        let exchange = async move {
            let response = builder.send().await?;
            let status = response.status();
            let headers = response.headers().clone();

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(HttpError::Status {
                    status: status.as_u16(),
                    message,
                });
            }

            let bytes = response.bytes().await?;
            let body: ServerResult<Value> = serde_json::from_slice(&bytes)?;
            Ok(TransportResponse::new(status.as_u16(), headers, body))
        };

        tokio::select! {
            biased;
            reason = signal.aborted() => Err(HttpError::Cancelled(reason)),
            result = exchange => result,
        }
    }

    /// Absolute URLs pass through; relative paths are appended to the base URL
    fn resolve_url(&self, url: &str) -> Response<Url> {
        if has_scheme(url) {
            return Ok(Url::parse(url)?);
        }

        let base = self.base_url.as_str().trim_end_matches('/');
        let path = url.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Cancel outstanding requests by the bare URL they were issued with
    ///
    /// Every in-flight call to one of `urls` is aborted, whatever its query
    /// params or body. Use [`HttpClient::cancel_fingerprint`] to target a
    /// single parameterized call.
    pub fn cancel_request<U, S>(&self, urls: U)
    where
        U: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for url in urls {
            self.registry.cancel_url(url.as_ref());
        }
    }

    /// Cancel the outstanding request with `fingerprint`, if any
    pub fn cancel_fingerprint(&self, fingerprint: &Fingerprint) {
        self.registry.cancel(fingerprint);
    }

    /// Cancel every outstanding request
    pub fn cancel_all_request(&self) {
        self.registry.cancel_all();
    }
}

/// Whether `url` starts with `<scheme>://`
fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once("://") else {
        return false;
    };

    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// HTTP client builder
pub struct HttpClientBuilder<I = NoInterceptors> {
    base_url: String,
    timeout: Duration,
    interceptors: I,
}

impl<I> fmt::Debug for HttpClientBuilder<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClientBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpClientBuilder {
    /// Builder for a client rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            interceptors: NoInterceptors,
        }
    }
}

impl<I: Interceptors> HttpClientBuilder<I> {
    /// Client-wide timeout for every call
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Wire the caller's interceptor stages
    pub fn interceptors<J: Interceptors>(self, interceptors: J) -> HttpClientBuilder<J> {
        HttpClientBuilder {
            base_url: self.base_url,
            timeout: self.timeout,
            interceptors,
        }
    }

    /// Build the HTTP client
    pub fn build(self) -> Response<HttpClient<I>> {
        let base_url = Url::parse(&self.base_url)?;

        let inner = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(HttpError::from)?;

        Ok(HttpClient {
            inner,
            base_url,
            registry: InFlightRegistry::new(),
            interceptors: Arc::new(self.interceptors),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_new() {
        let client = HttpClient::new("http://localhost:8080/api").expect("Valid base URL");
        let _ = format!("{:?}", client);
        assert_eq!(client.in_flight(), 0);
    }

    #[test]
    fn test_builder_rejects_invalid_base_url() {
        let result = HttpClient::builder("not a url").build();
        assert!(matches!(result, Err(HttpError::Url(_))));
    }

    #[test]
    fn test_builder_chained_config() {
        let result = HttpClient::builder("http://localhost:8080")
            .timeout(Duration::from_secs(5))
            .interceptors(NoInterceptors)
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_resolve_relative_url() {
        let client = HttpClient::new("http://localhost:8080/api/").expect("Valid base URL");

        let url = client
            .resolve_url("/authority/user/page")
            .expect("Relative path resolves");
        assert_eq!(url.as_str(), "http://localhost:8080/api/authority/user/page");

        let url = client.resolve_url("menu").expect("Relative path resolves");
        assert_eq!(url.as_str(), "http://localhost:8080/api/menu");
    }

    #[test]
    fn test_resolve_absolute_url() {
        let client = HttpClient::new("http://localhost:8080/api").expect("Valid base URL");
        let url = client
            .resolve_url("https://cdn.example.com/version.json")
            .expect("Absolute URL passes through");
        assert_eq!(url.as_str(), "https://cdn.example.com/version.json");
    }

    #[test]
    fn test_resolve_relative_url_with_url_in_query() {
        let client = HttpClient::new("http://localhost:8080/api").expect("Valid base URL");
        let url = client
            .resolve_url("/proxy?target=http://cdn.example.com/v.json")
            .expect("Relative path resolves under the base");
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.path(), "/api/proxy");
        assert_eq!(url.query(), Some("target=http://cdn.example.com/v.json"));
    }

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("http://a.b/c"));
        assert!(has_scheme("svn+ssh://host/repo"));
        assert!(!has_scheme("/proxy?target=http://cdn.example.com"));
        assert!(!has_scheme("menu/list"));
        assert!(!has_scheme("://missing"));
        assert!(!has_scheme("1http://x"));
    }

    #[test]
    fn test_clones_share_registry() {
        let client = HttpClient::new("http://localhost:8080").expect("Valid base URL");
        let clone = client.clone();

        let _guard = client
            .registry()
            .register(Fingerprint::new("get^/a"), "/a");
        assert_eq!(clone.in_flight(), 1);

        clone.cancel_all_request();
        assert_eq!(client.in_flight(), 0);
    }

    #[test]
    fn test_separate_clients_do_not_share_registry() {
        let one = HttpClient::new("http://localhost:8080").expect("Valid base URL");
        let two = HttpClient::new("http://localhost:9090").expect("Valid base URL");

        let guard = one.registry().register(Fingerprint::new("get^/a"), "/a");
        two.cancel_all_request();

        assert!(!guard.signal().is_aborted());
        assert_eq!(one.in_flight(), 1);
    }
}
