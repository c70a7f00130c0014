//! Login and profile endpoints

use dashboard_http::{RequestOptions, Response, ServerResult};
use tracing::instrument;

use super::types::{LoginRequest, LoginResult, UserInfo};
use super::AdminApi;
use crate::store::TOKEN_KEY;

const LOGIN_PATH: &str = "/user/login";
const USER_INFO_PATH: &str = "/user/info";

impl AdminApi {
    /// Log in and keep the returned token for later requests
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Response<ServerResult<LoginResult>> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let result: ServerResult<LoginResult> = self
            .client
            .post(LOGIN_PATH, &body, RequestOptions::new())
            .await?;

        if let Some(login) = result.data.as_ref().filter(|_| result.is_success()) {
            self.tokens.set(TOKEN_KEY, &login.token);
        }

        Ok(result)
    }

    /// Drop the stored token and abort everything still in flight
    pub fn logout(&self) {
        self.tokens.remove(TOKEN_KEY);
        self.client.cancel_all_request();
    }

    /// Whether a token is stored
    pub fn is_logged_in(&self) -> bool {
        self.tokens
            .get(TOKEN_KEY)
            .is_some_and(|token| !token.is_empty())
    }

    /// Profile and permissions of the logged in user
    pub async fn current_user(&self) -> Response<ServerResult<UserInfo>> {
        self.client.get(USER_INFO_PATH, RequestOptions::new()).await
    }
}
