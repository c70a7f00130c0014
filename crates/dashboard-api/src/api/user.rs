//! User management endpoints

use dashboard_http::{RequestOptions, Response, ServerResult};
use serde_json::Value;

use super::types::{PageData, PageQuery, User, UserForm, WithId};
use super::AdminApi;

const USER_PATH: &str = "/authority/user";
const USER_PAGE_PATH: &str = "/authority/user/page";
const USER_DETAIL_PATH: &str = "/authority/user/detail";

impl AdminApi {
    /// One page of users
    pub async fn user_page(&self, query: &PageQuery) -> Response<ServerResult<PageData<User>>> {
        self.client.get(USER_PAGE_PATH, query.to_options()).await
    }

    /// A single user
    pub async fn user_detail(&self, id: u64) -> Response<ServerResult<User>> {
        self.client
            .get(USER_DETAIL_PATH, RequestOptions::new().param("id", id))
            .await
    }

    /// Create a user, returning its id
    pub async fn create_user(&self, form: &UserForm) -> Response<ServerResult<u64>> {
        self.client.post(USER_PATH, form, RequestOptions::new()).await
    }

    /// Replace the editable fields of user `id`
    pub async fn update_user(&self, id: u64, form: &UserForm) -> Response<ServerResult<Value>> {
        self.client
            .put(USER_PATH, &WithId { id, form }, RequestOptions::new())
            .await
    }

    /// Delete user `id`
    pub async fn delete_user(&self, id: u64) -> Response<ServerResult<Value>> {
        self.client
            .delete(USER_PATH, RequestOptions::new().param("id", id))
            .await
    }
}
