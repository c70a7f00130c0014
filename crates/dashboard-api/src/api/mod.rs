//! Typed wrappers over the dashboard's authority endpoints
//!
//! Every call goes through the session interceptors, so business failures
//! have already been reported to the user when the [`ServerResult`] comes
//! back. Callers branch on `code` for UI behaviour.
//!
//! [`ServerResult`]: dashboard_http::ServerResult

use std::sync::Arc;

use dashboard_http::HttpClient;

use crate::error::Error;
use crate::notify::Notifier;
use crate::session::{Redirector, SessionInterceptors};
use crate::settings::Settings;
use crate::store::TokenStore;

mod auth;
mod menu;
pub mod types;
mod user;

pub use types::{
    LoginRequest, LoginResult, Menu, MenuForm, PageData, PageQuery, User, UserForm, UserInfo,
};

/// Dashboard backend client
#[derive(Clone)]
pub struct AdminApi {
    client: HttpClient<SessionInterceptors>,
    tokens: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for AdminApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminApi")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl AdminApi {
    /// Build the client described by `settings`
    pub fn new(
        settings: &Settings,
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
        redirector: Arc<dyn Redirector>,
    ) -> Result<Self, Error> {
        let interceptors = SessionInterceptors::new(tokens.clone(), notifier, redirector)
            .locale(settings.session.locale)
            .login_path(settings.session.login_path.clone())
            .router_mode(settings.session.router_mode());

        let client = HttpClient::builder(settings.api.base_url.clone())
            .timeout(settings.api.timeout())
            .interceptors(interceptors)
            .build()?;

        Ok(Self { client, tokens })
    }

    /// Wrap an already configured client
    pub fn from_client(client: HttpClient<SessionInterceptors>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { client, tokens }
    }

    /// Underlying request client, e.g. for cancellation
    pub fn client(&self) -> &HttpClient<SessionInterceptors> {
        &self.client
    }
}
