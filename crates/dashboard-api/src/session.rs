//! Session interceptors
//!
//! Injects the stored credential into every request and applies the
//! dashboard's response policy:
//!
//! * business code 401: clear the credential, tell the user, go to the login page
//! * any other non-200 code: show the server's message
//! * transport failures: show a generic message, cancellations are silent

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use dashboard_http::{
    ApiRequest, HttpError, Interceptors, TransportResponse, SUCCESS_CODE, UNAUTHORIZED_CODE,
};
use serde::{Deserialize, Serialize};

use crate::notify::Notifier;
use crate::store::{TokenStore, TOKEN_KEY};

/// Header carrying the credential
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Notification key of the "login expired" message
pub const UNAUTHORIZED_NOTICE_KEY: &str = "unauthorized";

/// Notification key of the generic transport failure message
pub const TRANSPORT_ERROR_NOTICE_KEY: &str = "transport-error";

/// Default login route
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Default wait before a full navigation to the login page
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_secs(1);

/// Language of the messages shown by the session interceptors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English
    #[default]
    En,
    /// Simplified Chinese
    Zh,
}

impl Locale {
    /// Shown when the server reports the login as expired
    pub fn unauthorized_message(&self) -> &'static str {
        match self {
            Locale::En => "Login has expired, please log in again",
            Locale::Zh => "登录已过期，请重新登录",
        }
    }

    /// Shown when a request fails below the business layer
    pub fn transport_error_message(&self) -> &'static str {
        match self {
            Locale::En => "Server error, please try again later",
            Locale::Zh => "服务器错误，请稍后再试",
        }
    }

    /// Shown for a business failure without a server message
    pub fn request_failed_message(&self) -> &'static str {
        match self {
            Locale::En => "Request failed",
            Locale::Zh => "请求失败",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            "zh" | "zh-cn" | "zh_cn" => Ok(Locale::Zh),
            _ => Err(format!("Unknown locale: {}", s)),
        }
    }
}

/// How the login page is reached after a 401
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterMode {
    /// Hash routing: switch to `#<login path>` immediately
    Hash,
    /// Path routing: navigate to `<login path>` once `delay` has passed, so the
    /// notification can render first
    History {
        /// Wait before navigating
        delay: Duration,
    },
}

impl Default for RouterMode {
    fn default() -> Self {
        RouterMode::History {
            delay: DEFAULT_REDIRECT_DELAY,
        }
    }
}

/// Moves the application to another location
pub trait Redirector: Send + Sync {
    /// Navigate to `location`
    fn redirect(&self, location: &str);
}

/// [`Redirector`] that only logs the navigation
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRedirector;

impl Redirector for LogRedirector {
    fn redirect(&self, location: &str) {
        tracing::info!("Redirecting to {}", location);
    }
}

/// The dashboard's interceptor set
pub struct SessionInterceptors {
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
    redirector: Arc<dyn Redirector>,
    locale: Locale,
    login_path: String,
    router_mode: RouterMode,
}

impl fmt::Debug for SessionInterceptors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionInterceptors")
            .field("locale", &self.locale)
            .field("login_path", &self.login_path)
            .field("router_mode", &self.router_mode)
            .finish_non_exhaustive()
    }
}

impl SessionInterceptors {
    /// Interceptors over the given collaborators with default locale and routing
    pub fn new(
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
        redirector: Arc<dyn Redirector>,
    ) -> Self {
        Self {
            tokens,
            notifier,
            redirector,
            locale: Locale::default(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            router_mode: RouterMode::default(),
        }
    }

    /// Language of the messages
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Route of the login page
    pub fn login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    /// How the login page is reached
    pub fn router_mode(mut self, router_mode: RouterMode) -> Self {
        self.router_mode = router_mode;
        self
    }

    fn handle_unauthorized(&self) {
        tracing::info!("Session expired, clearing credential");
        self.tokens.remove(TOKEN_KEY);
        self.notifier.error(
            self.locale.unauthorized_message(),
            Some(UNAUTHORIZED_NOTICE_KEY),
        );

        match self.router_mode {
            RouterMode::Hash => {
                self.redirector.redirect(&format!("#{}", self.login_path));
            }
            RouterMode::History { delay } => {
                let redirector = Arc::clone(&self.redirector);
                let location = self.login_path.clone();
                match tokio::runtime::Handle::try_current() {
                    Ok(handle) => {
                        handle.spawn(async move {
                            tokio::time::sleep(delay).await;
                            redirector.redirect(&location);
                        });
                    }
                    Err(_) => redirector.redirect(&location),
                }
            }
        }
    }
}

impl Interceptors for SessionInterceptors {
    fn on_request(&self, mut request: ApiRequest) -> Result<ApiRequest, HttpError> {
        if let Some(token) = self.tokens.get(TOKEN_KEY).filter(|t| !t.is_empty()) {
            request.set_header(AUTHORIZATION_HEADER, &token)?;
        }
        Ok(request)
    }

    fn on_request_error(&self, error: HttpError) -> HttpError {
        tracing::warn!("Could not prepare request: {}", error);
        error
    }

    fn on_response(&self, response: TransportResponse) -> Result<TransportResponse, HttpError> {
        let body = response.body();

        match body.code {
            SUCCESS_CODE => {}
            UNAUTHORIZED_CODE => self.handle_unauthorized(),
            code => {
                let message = body
                    .message
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(self.locale.request_failed_message());
                tracing::warn!(code, "Business error: {}", message);
                self.notifier.error(message, None);
            }
        }

        Ok(response)
    }

    fn on_response_error(&self, error: HttpError) -> HttpError {
        if error.is_cancelled() {
            tracing::debug!("{}", error);
            return error;
        }

        self.notifier.error(
            self.locale.transport_error_message(),
            Some(TRANSPORT_ERROR_NOTICE_KEY),
        );
        error
    }
}
