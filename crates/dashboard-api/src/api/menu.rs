//! Menu management endpoints

use dashboard_http::{RequestOptions, Response, ServerResult};
use serde_json::Value;

use super::types::{Menu, MenuForm, PageData, PageQuery, WithId};
use super::AdminApi;

const MENU_PATH: &str = "/authority/menu";
const MENU_LIST_PATH: &str = "/authority/menu/list";
const MENU_PAGE_PATH: &str = "/authority/menu/page";

impl AdminApi {
    /// Full menu tree visible to the current user
    pub async fn menu_list(&self) -> Response<ServerResult<Vec<Menu>>> {
        self.client.get(MENU_LIST_PATH, RequestOptions::new()).await
    }

    /// One page of menus for the management table
    pub async fn menu_page(&self, query: &PageQuery) -> Response<ServerResult<PageData<Menu>>> {
        self.client.get(MENU_PAGE_PATH, query.to_options()).await
    }

    /// Create a menu, returning its id
    pub async fn create_menu(&self, form: &MenuForm) -> Response<ServerResult<u64>> {
        self.client.post(MENU_PATH, form, RequestOptions::new()).await
    }

    /// Replace the editable fields of menu `id`
    pub async fn update_menu(&self, id: u64, form: &MenuForm) -> Response<ServerResult<Value>> {
        self.client
            .put(MENU_PATH, &WithId { id, form }, RequestOptions::new())
            .await
    }

    /// Delete menu `id`
    pub async fn delete_menu(&self, id: u64) -> Response<ServerResult<Value>> {
        self.client
            .delete(MENU_PATH, RequestOptions::new().param("id", id))
            .await
    }
}
